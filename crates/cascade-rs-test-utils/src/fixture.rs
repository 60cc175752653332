use cascade_rs_config::{CUSTOM_ENV_SOURCE, DEFAULT_CONFIGS_DIR, DEFAULT_SOURCE, InitOptions};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway project directory with a `configs/` subdirectory.
pub struct ConfigFixture {
    temp: TempDir,
}

impl ConfigFixture {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("tempdir");
        fs::create_dir_all(temp.path().join(".git")).expect("project marker");
        fs::create_dir_all(temp.path().join(DEFAULT_CONFIGS_DIR)).expect("configs dir");
        Self { temp }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn configs_dir(&self) -> PathBuf {
        self.temp.path().join(DEFAULT_CONFIGS_DIR)
    }

    /// Write `value` as pretty JSON to `configs/<file_name>`.
    pub fn write(&self, file_name: &str, value: Value) -> &Self {
        let contents = serde_json::to_string_pretty(&value).expect("serialize");
        self.write_raw(file_name, &contents)
    }

    /// Write raw text to `configs/<file_name>`.
    pub fn write_raw(&self, file_name: &str, contents: &str) -> &Self {
        fs::write(self.configs_dir().join(file_name), contents).expect("write source");
        self
    }

    pub fn write_default(&self, value: Value) -> &Self {
        self.write(DEFAULT_SOURCE, value)
    }

    pub fn write_env_map(&self, value: Value) -> &Self {
        self.write(CUSTOM_ENV_SOURCE, value)
    }

    /// Init options rooted at the fixture, relying on project-root discovery.
    pub fn options(&self) -> InitOptions {
        InitOptions::new(self.root())
    }
}

impl Default for ConfigFixture {
    fn default() -> Self {
        Self::new()
    }
}
