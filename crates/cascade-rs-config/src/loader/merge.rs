//! Deep merge for config trees.

use crate::{Mapping, TreeValue};

/// Merge `overlay` into `base`, with `overlay` taking precedence.
///
/// Mappings present on both sides are merged recursively. Any other pairing
/// (scalars, sequences, mismatched types) is replaced wholesale by the overlay.
pub fn merge_mappings(base: &mut Mapping, overlay: Mapping) {
    for (key, value) in overlay {
        match value {
            TreeValue::Object(overlay_map) => match base.get_mut(&key) {
                Some(TreeValue::Object(base_map)) => merge_mappings(base_map, overlay_map),
                _ => {
                    base.insert(key, TreeValue::Object(overlay_map));
                }
            },
            value @ (TreeValue::Null
            | TreeValue::Bool(_)
            | TreeValue::Number(_)
            | TreeValue::String(_)
            | TreeValue::Array(_)) => {
                base.insert(key, value);
            }
        }
    }
}

/// Return `base` merged with `overlay`. See [`merge_mappings`].
pub fn deep_merge(mut base: Mapping, overlay: Mapping) -> Mapping {
    merge_mappings(&mut base, overlay);
    base
}
