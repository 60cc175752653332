//! Cascading configuration tree with a build-then-freeze lifecycle.
//!
//! Sources in a configs directory are merged in precedence order
//! (`default.json` < `<deployment>.json` < `custom-environment-variables.json`),
//! the tree can be adjusted with `set` until the first read, and every read
//! after that sees the same immutable snapshot.

mod environment;
mod error;
mod loader;
mod path;
mod store;
mod value;

/// Public error type returned by config loading and access APIs.
pub use error::ConfigError;
/// Variable lookup used during init.
pub use environment::{Environment, MapEnvironment, ProcessEnvironment};
/// Init options, diagnostics, and well-known names.
pub use loader::{
    CONFIGS_DIRECTORY_VAR, DEFAULT_CONFIGS_DIR, DEFAULT_DEPLOYMENT_KEY, DEPLOYMENT_KEY_VAR,
    InitOptions, InitReport,
};
/// Tree building blocks, usable without a store.
pub use loader::merge::{deep_merge, merge_mappings};
pub use loader::sources::{
    CUSTOM_ENV_SOURCE, ConfigSource, DEFAULT_SOURCE, SourceKind, list_available_sources,
    resolve_sources,
};
pub use loader::substitute::substitute_env;
pub use path::{ConfigPath, assign_path, resolve_path};
/// The config store and its lifecycle.
pub use store::{ConfigPhase, ConfigStore};
pub use value::{Mapping, TreeValue};
