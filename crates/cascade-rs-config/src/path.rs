//! Dot-separated path resolution over the config tree.

use crate::{ConfigError, Mapping, TreeValue};
use log::debug;
use std::fmt;

/// A non-empty, dot-separated config path such as `db.primary.host`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigPath {
    raw: String,
}

impl ConfigPath {
    /// Parse a path, rejecting the empty string.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        if raw.is_empty() {
            return Err(ConfigError::InvalidPath);
        }
        Ok(Self {
            raw: raw.to_string(),
        })
    }

    /// Path segments in traversal order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.raw.split('.')
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Walk `path` through nested mappings.
///
/// Returns `None` when a segment is missing or when a non-mapping value is
/// reached before the last segment. Sequences are not indexable.
pub fn resolve_path<'a>(root: &'a Mapping, path: &ConfigPath) -> Option<&'a TreeValue> {
    let mut segments = path.segments();
    let first = segments.next()?;
    let mut current = root.get(first)?;
    for segment in segments {
        current = match current {
            TreeValue::Object(map) => map.get(segment)?,
            TreeValue::Null
            | TreeValue::Bool(_)
            | TreeValue::Number(_)
            | TreeValue::String(_)
            | TreeValue::Array(_) => return None,
        };
    }
    Some(current)
}

/// Assign `value` at `path`, creating intermediate mappings as needed.
///
/// An intermediate segment that holds a non-mapping value is replaced by an
/// empty mapping. The final segment is overwritten unconditionally.
pub fn assign_path(root: &mut Mapping, path: &ConfigPath, value: TreeValue) {
    let (parents, last) = match path.raw.rsplit_once('.') {
        Some((parents, last)) => (Some(parents), last),
        None => (None, path.raw.as_str()),
    };
    let parents = parents.into_iter().flat_map(|parents| parents.split('.'));
    assign_segments(root, parents, last, value, path);
}

fn assign_segments<'a>(
    map: &mut Mapping,
    mut parents: impl Iterator<Item = &'a str>,
    last: &str,
    value: TreeValue,
    path: &ConfigPath,
) {
    let Some(segment) = parents.next() else {
        map.insert(last.to_string(), value);
        return;
    };
    let mut child = match map.remove(segment) {
        Some(TreeValue::Object(child)) => child,
        Some(
            TreeValue::Null
            | TreeValue::Bool(_)
            | TreeValue::Number(_)
            | TreeValue::String(_)
            | TreeValue::Array(_),
        ) => {
            debug!(
                "replacing non-object value while setting config (path={}, segment={})",
                path, segment
            );
            Mapping::new()
        }
        None => Mapping::new(),
    };
    assign_segments(&mut child, parents, last, value, path);
    map.insert(segment.to_string(), TreeValue::Object(child));
}
