//! Environment variable substitution for the custom-environment-variables source.

use crate::{Environment, Mapping, TreeValue};
use log::{debug, warn};

/// Replace every leaf of `tree` with the environment variable it names.
///
/// Leaves whose variable is unset are dropped, as are containers left empty
/// afterwards. Only string leaves can name a variable. Values are never logged.
pub fn substitute_env(tree: Mapping, env: &dyn Environment) -> Mapping {
    substitute_mapping(tree, env, "")
}

fn substitute_mapping(map: Mapping, env: &dyn Environment, prefix: &str) -> Mapping {
    let mut out = Mapping::new();
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        if let Some(value) = substitute_value(value, env, &path) {
            out.insert(key, value);
        }
    }
    out
}

fn substitute_value(value: TreeValue, env: &dyn Environment, path: &str) -> Option<TreeValue> {
    match value {
        TreeValue::String(name) => match env.var(&name) {
            Some(resolved) => Some(TreeValue::String(resolved)),
            None => {
                debug!(
                    "environment variable unset; omitting config (path={}, variable={})",
                    path, name
                );
                None
            }
        },
        TreeValue::Object(map) => {
            let map = substitute_mapping(map, env, path);
            (!map.is_empty()).then_some(TreeValue::Object(map))
        }
        TreeValue::Array(items) => {
            let items: Vec<TreeValue> = items
                .into_iter()
                .enumerate()
                .filter_map(|(index, item)| {
                    substitute_value(item, env, &format!("{path}[{index}]"))
                })
                .collect();
            (!items.is_empty()).then_some(TreeValue::Array(items))
        }
        TreeValue::Null | TreeValue::Bool(_) | TreeValue::Number(_) => {
            warn!(
                "ignoring non-string environment variable name (path={}, value={})",
                path, value
            );
            None
        }
    }
}
