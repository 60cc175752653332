//! Public SDK surface for Cascade.
//!
//! This crate re-exports the config engine and provides a process-wide store
//! with free `init`/`get`/`set`/`has` functions, so services can read config
//! from anywhere without threading a store through every call.

/// Re-export for convenience.
pub use cascade_rs_config as config;
pub use cascade_rs_config::{
    ConfigError, ConfigPhase, ConfigStore, InitOptions, InitReport, Mapping, TreeValue,
};

use log::debug;
use std::sync::OnceLock;

static GLOBAL: OnceLock<ConfigStore> = OnceLock::new();

/// The process-wide store, created on first use with the process environment.
pub fn global() -> &'static ConfigStore {
    GLOBAL.get_or_init(|| {
        debug!("creating process-wide config store");
        ConfigStore::new()
    })
}

/// Load all sources into the process-wide store. See [`ConfigStore::init`].
pub fn init(options: &InitOptions) -> Result<InitReport, ConfigError> {
    global().init(options)
}

/// Read from the process-wide store, freezing it. See [`ConfigStore::get`].
pub fn get(path: &str) -> Result<TreeValue, ConfigError> {
    global().get(path)
}

/// Write to the process-wide store while it is still building. See [`ConfigStore::set`].
pub fn set(path: &str, value: TreeValue) -> Result<(), ConfigError> {
    global().set(path, value)
}

/// Check a path in the process-wide store, freezing it. See [`ConfigStore::has`].
pub fn has(path: &str) -> Result<bool, ConfigError> {
    global().has(path)
}

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}
