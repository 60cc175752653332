//! Error types for config loading and access.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned while loading, mutating, or reading config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configs directory does not exist or cannot be listed.
    #[error("configs directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    /// The configs directory has no `default.json`.
    #[error("configs directory has no default source: {}", .0.display())]
    MissingDefaultSource(PathBuf),
    /// Reading a source file failed.
    #[error("failed to read config: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// Parsing a source file failed.
    #[error(transparent)]
    Parse(#[from] json5::Error),
    /// A source file parsed to something other than an object.
    #[error("config source {name} must contain an object at the root")]
    NotAMapping { name: String },
    /// An empty path was passed where a key is required.
    #[error("invalid config path: path must not be empty")]
    InvalidPath,
    /// A write was attempted after the config was frozen.
    #[error("config is immutable once it has been read")]
    Immutable,
    /// A read did not resolve the full path.
    #[error("no such config: {0}")]
    NoSuchConfig(String),
}
