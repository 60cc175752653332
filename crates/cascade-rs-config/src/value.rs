//! Tree value model shared by every stage of the pipeline.

/// A node in the config tree: null, bool, number, string, sequence, or mapping.
pub type TreeValue = serde_json::Value;

/// A keyed node in the config tree. Lookup is by key, never by position.
pub type Mapping = serde_json::Map<String, TreeValue>;
