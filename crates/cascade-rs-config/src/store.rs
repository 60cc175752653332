//! Config store with a build-then-freeze lifecycle.
//!
//! The store starts `Uninitialized`, becomes `Building` on the first init
//! (explicit, or implicit on first access), and becomes `Frozen` on the first
//! read. Writes are only accepted while `Building`.

use crate::loader::{self, InitOptions, InitReport};
use crate::path::{ConfigPath, assign_path, resolve_path};
use crate::{ConfigError, Environment, Mapping, ProcessEnvironment, TreeValue};
use log::{debug, info, warn};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Lifecycle phase of a [`ConfigStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPhase {
    /// Nothing loaded yet.
    Uninitialized,
    /// Loaded and accepting writes.
    Building,
    /// Read at least once; read-only from now on.
    Frozen,
}

enum ConfigState {
    Uninitialized,
    Building(Mapping),
    Frozen(Arc<Mapping>),
}

impl ConfigState {
    fn phase(&self) -> ConfigPhase {
        match self {
            ConfigState::Uninitialized => ConfigPhase::Uninitialized,
            ConfigState::Building(_) => ConfigPhase::Building,
            ConfigState::Frozen(_) => ConfigPhase::Frozen,
        }
    }
}

/// Owner of a single config tree.
pub struct ConfigStore {
    state: RwLock<ConfigState>,
    /// Options used when access triggers an implicit init.
    options: InitOptions,
    env: Arc<dyn Environment>,
}

impl ConfigStore {
    /// Store reading the process environment, with default init options.
    pub fn new() -> Self {
        Self::with_options(InitOptions::default(), Arc::new(ProcessEnvironment))
    }

    /// Store reading variables from `env`, with default init options.
    pub fn with_environment(env: Arc<dyn Environment>) -> Self {
        Self::with_options(InitOptions::default(), env)
    }

    /// Store using `options` for implicit init and `env` for all variable reads.
    pub fn with_options(options: InitOptions, env: Arc<dyn Environment>) -> Self {
        Self {
            state: RwLock::new(ConfigState::Uninitialized),
            options,
            env,
        }
    }

    /// Store already `Building` on top of `tree`, skipping source loading.
    pub fn from_tree(tree: Mapping) -> Self {
        let store = Self::new();
        *store.state.write() = ConfigState::Building(tree);
        store
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> ConfigPhase {
        self.state.read().phase()
    }

    /// Load all sources and start a fresh `Building` tree.
    ///
    /// Permitted in any phase; a frozen store is thawed and rebuilt. On error
    /// the previous state is left untouched.
    pub fn init(&self, options: &InitOptions) -> Result<InitReport, ConfigError> {
        let (tree, report) = loader::load_tree(options, self.env.as_ref())?;
        let mut state = self.state.write();
        if state.phase() == ConfigPhase::Frozen {
            warn!("re-initializing frozen config");
        }
        *state = ConfigState::Building(tree);
        info!(
            "config initialized (directory={}, sources={})",
            report.configs_directory.display(),
            report.source_order.len()
        );
        Ok(report)
    }

    /// Set `value` at `path`, creating intermediate mappings as needed.
    pub fn set(&self, path: &str, value: TreeValue) -> Result<(), ConfigError> {
        let path = ConfigPath::parse(path)?;
        let mut state = self.state.write();
        let mut tree = match std::mem::replace(&mut *state, ConfigState::Uninitialized) {
            ConfigState::Uninitialized => self.load_implicit()?,
            ConfigState::Building(tree) => tree,
            frozen @ ConfigState::Frozen(_) => {
                *state = frozen;
                warn!("rejected write to frozen config (path={})", path);
                return Err(ConfigError::Immutable);
            }
        };
        assign_path(&mut tree, &path, value);
        *state = ConfigState::Building(tree);
        debug!("config value set (path={})", path);
        Ok(())
    }

    /// Read the value at `path`, freezing the store.
    ///
    /// An empty path returns the whole tree.
    pub fn get(&self, path: &str) -> Result<TreeValue, ConfigError> {
        let tree = self.snapshot()?;
        if path.is_empty() {
            return Ok(TreeValue::Object(Mapping::clone(&tree)));
        }
        let parsed = ConfigPath::parse(path)?;
        resolve_path(&tree, &parsed)
            .cloned()
            .ok_or_else(|| ConfigError::NoSuchConfig(path.to_string()))
    }

    /// Whether every segment of `path` resolves, freezing the store.
    pub fn has(&self, path: &str) -> Result<bool, ConfigError> {
        let path = ConfigPath::parse(path)?;
        let tree = self.snapshot()?;
        Ok(resolve_path(&tree, &path).is_some())
    }

    /// The frozen tree, freezing the store if needed.
    pub fn snapshot(&self) -> Result<Arc<Mapping>, ConfigError> {
        {
            let state = self.state.read();
            if let ConfigState::Frozen(tree) = &*state {
                return Ok(Arc::clone(tree));
            }
        }

        let mut state = self.state.write();
        let tree = match std::mem::replace(&mut *state, ConfigState::Uninitialized) {
            ConfigState::Frozen(tree) => tree,
            ConfigState::Building(tree) => Arc::new(tree),
            ConfigState::Uninitialized => Arc::new(self.load_implicit()?),
        };
        *state = ConfigState::Frozen(Arc::clone(&tree));
        debug!("config frozen (keys={})", tree.len());
        Ok(tree)
    }

    /// Drop all state, returning to `Uninitialized`. Intended for test isolation.
    pub fn reset(&self) {
        *self.state.write() = ConfigState::Uninitialized;
    }

    fn load_implicit(&self) -> Result<Mapping, ConfigError> {
        debug!("config accessed before init; loading with store defaults");
        let (tree, report) = loader::load_tree(&self.options, self.env.as_ref())?;
        info!(
            "config initialized implicitly (directory={}, sources={})",
            report.configs_directory.display(),
            report.source_order.len()
        );
        Ok(tree)
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("phase", &self.phase())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
