//! Source loading for the config cascade.
//!
//! Resolves the configs directory and deployment, orders the sources, parses
//! each one, substitutes environment variables into the custom-environment-variables
//! source, and folds everything into a single tree.

mod layer_io;
pub(crate) mod merge;
pub(crate) mod sources;
pub(crate) mod substitute;
mod utils;

#[cfg(test)]
mod tests;

use crate::{ConfigError, Environment, Mapping};
use log::{debug, info};
use serde::Serialize;
use sources::{ConfigSource, DEFAULT_SOURCE, SourceKind};
use std::path::{Path, PathBuf};

/// Variable naming the variable that holds the deployment name.
pub const DEPLOYMENT_KEY_VAR: &str = "DEPLOYMENT_KEY";
/// Variable that holds the deployment name unless `DEPLOYMENT_KEY` says otherwise.
pub const DEFAULT_DEPLOYMENT_KEY: &str = "DEPLOYMENT";
/// Variable overriding the configs directory.
pub const CONFIGS_DIRECTORY_VAR: &str = "CONFIGS_DIRECTORY";
/// Configs directory under the project root.
pub const DEFAULT_CONFIGS_DIR: &str = "configs";
/// Marker files/dirs that identify a project root.
const PROJECT_ROOT_MARKERS: &[&str] = &["Cargo.toml", ".git"];

/// Options controlling where and how config sources are loaded.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Name of the variable holding the deployment name. Falls back to
    /// `DEPLOYMENT_KEY`, then `DEPLOYMENT`.
    pub deployment_key_name: Option<String>,
    /// Configs directory. Falls back to `CONFIGS_DIRECTORY`, then
    /// `<project_root>/configs`.
    pub configs_directory: Option<PathBuf>,
    /// Working directory for relative paths and project root discovery.
    /// Defaults to the process working directory.
    pub cwd: Option<PathBuf>,
}

impl InitOptions {
    /// Create options rooted at `cwd`.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: Some(cwd.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    /// Use an explicit configs directory.
    pub fn with_configs_directory(mut self, path: impl AsRef<Path>) -> Self {
        self.configs_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Read the deployment name from `name` instead of the default variable.
    pub fn with_deployment_key_name(mut self, name: impl Into<String>) -> Self {
        self.deployment_key_name = Some(name.into());
        self
    }
}

/// Diagnostics describing what `init` loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitReport {
    /// Directory the sources were read from.
    pub configs_directory: PathBuf,
    /// Variable consulted for the deployment name.
    pub deployment_key_name: String,
    /// Deployment name read from that variable, if any.
    pub deployment: Option<String>,
    /// Sources merged, lowest precedence first.
    pub source_order: Vec<ConfigSource>,
}

impl InitReport {
    /// File names of the merged sources, lowest precedence first.
    pub fn source_names(&self) -> Vec<&str> {
        self.source_order
            .iter()
            .map(|source| source.file_name.as_str())
            .collect()
    }
}

/// Assemble the config tree described by `options`.
pub(crate) fn load_tree(
    options: &InitOptions,
    env: &dyn Environment,
) -> Result<(Mapping, InitReport), ConfigError> {
    let cwd = match &options.cwd {
        Some(cwd) => cwd.clone(),
        None => std::env::current_dir()?,
    };
    let cwd = utils::normalize_path(&cwd)?;
    debug!("normalized cwd for config load: {}", cwd.display());

    let deployment_key_name = options
        .deployment_key_name
        .clone()
        .or_else(|| env.var(DEPLOYMENT_KEY_VAR).filter(|name| !name.is_empty()))
        .unwrap_or_else(|| DEFAULT_DEPLOYMENT_KEY.to_string());
    let configs_directory = resolve_configs_directory(options, env, &cwd);
    info!(
        "loading config (directory={}, deployment_key={})",
        configs_directory.display(),
        deployment_key_name
    );

    let available = sources::list_available_sources(&configs_directory)?;
    if !available.contains(DEFAULT_SOURCE) {
        return Err(ConfigError::MissingDefaultSource(configs_directory));
    }

    let deployment = env.var(&deployment_key_name);
    let source_order =
        sources::resolve_sources(&configs_directory, deployment.as_deref(), &available);

    let mut tree = Mapping::new();
    for source in &source_order {
        let mut layer = layer_io::load_source(source)?;
        if source.kind == SourceKind::CustomEnvironmentVariables {
            layer = substitute::substitute_env(layer, env);
        }
        merge::merge_mappings(&mut tree, layer);
        debug!(
            "merged config source (kind={:?}, file={})",
            source.kind, source.file_name
        );
    }

    info!(
        "config loaded (deployment={}, sources={})",
        deployment.as_deref().unwrap_or("<none>"),
        source_order.len()
    );
    Ok((
        tree,
        InitReport {
            configs_directory,
            deployment_key_name,
            deployment,
            source_order,
        },
    ))
}

fn resolve_configs_directory(options: &InitOptions, env: &dyn Environment, cwd: &Path) -> PathBuf {
    if let Some(path) = &options.configs_directory {
        return utils::absolutize(path, cwd);
    }
    if let Some(path) = env.var(CONFIGS_DIRECTORY_VAR).filter(|path| !path.is_empty()) {
        return utils::absolutize(Path::new(&path), cwd);
    }
    let project_root = utils::find_project_root(cwd, PROJECT_ROOT_MARKERS).unwrap_or_else(|| {
        debug!("project root not found; using cwd for configs directory");
        cwd.to_path_buf()
    });
    project_root.join(DEFAULT_CONFIGS_DIR)
}
