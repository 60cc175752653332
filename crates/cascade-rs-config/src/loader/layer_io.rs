//! IO helpers for reading config sources from disk.

use super::sources::ConfigSource;
use crate::{ConfigError, Mapping, TreeValue};
use log::debug;
use std::fs;

/// Read and parse a single source into a mapping.
pub(super) fn load_source(source: &ConfigSource) -> Result<Mapping, ConfigError> {
    debug!(
        "loading config source (kind={:?}, path={})",
        source.kind,
        source.path.display()
    );
    let contents = fs::read_to_string(&source.path)?;
    parse_source(&source.file_name, &contents)
}

/// Parse source contents, requiring an object at the root.
pub(super) fn parse_source(name: &str, contents: &str) -> Result<Mapping, ConfigError> {
    match json5::from_str::<TreeValue>(contents)? {
        TreeValue::Object(map) => Ok(map),
        _ => Err(ConfigError::NotAMapping {
            name: name.to_string(),
        }),
    }
}
