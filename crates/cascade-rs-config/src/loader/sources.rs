//! Source discovery and precedence ordering.

use crate::ConfigError;
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Public base config; required.
pub const DEFAULT_SOURCE: &str = "default.json";
/// Maps config paths to environment variable names; optional.
pub const CUSTOM_ENV_SOURCE: &str = "custom-environment-variables.json";
/// File extension of deployment-specific sources.
const SOURCE_EXTENSION: &str = "json";

/// Role a source plays in the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// `default.json`.
    Default,
    /// `<deployment>.json`.
    Deployment,
    /// `custom-environment-variables.json`.
    CustomEnvironmentVariables,
}

/// A source file selected for loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigSource {
    pub kind: SourceKind,
    pub file_name: String,
    pub path: PathBuf,
}

/// Order the sources to load, lowest precedence first.
///
/// The candidate order is default, deployment, custom-environment-variables.
/// Candidates missing from `available` are skipped. A deployment whose file
/// name collides with `default.json` or `custom-environment-variables.json`
/// is ignored, so those files always keep their own role.
pub fn resolve_sources(
    directory: &Path,
    deployment: Option<&str>,
    available: &HashSet<String>,
) -> Vec<ConfigSource> {
    let mut candidates = vec![(SourceKind::Default, DEFAULT_SOURCE.to_string())];
    if let Some(deployment) = deployment.map(str::trim).filter(|name| !name.is_empty()) {
        let file_name = format!("{}.{SOURCE_EXTENSION}", deployment.to_lowercase());
        if file_name == DEFAULT_SOURCE || file_name == CUSTOM_ENV_SOURCE {
            warn!(
                "ignoring deployment that names a reserved source (deployment={}, file={})",
                deployment, file_name
            );
        } else {
            candidates.push((SourceKind::Deployment, file_name));
        }
    }
    candidates.push((
        SourceKind::CustomEnvironmentVariables,
        CUSTOM_ENV_SOURCE.to_string(),
    ));

    let mut sources = Vec::new();
    for (kind, file_name) in candidates {
        if !available.contains(&file_name) {
            debug!(
                "skipping missing source (kind={:?}, file={})",
                kind, file_name
            );
            continue;
        }
        sources.push(ConfigSource {
            kind,
            path: directory.join(&file_name),
            file_name,
        });
    }
    sources
}

/// List the regular files in `directory` by name.
pub fn list_available_sources(directory: &Path) -> Result<HashSet<String>, ConfigError> {
    let entries =
        fs::read_dir(directory).map_err(|_| ConfigError::DirectoryNotFound(directory.to_path_buf()))?;
    let mut names = HashSet::new();
    for entry in entries {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.insert(name.to_string());
        }
    }
    debug!(
        "listed configs directory (path={}, files={})",
        directory.display(),
        names.len()
    );
    Ok(names)
}
