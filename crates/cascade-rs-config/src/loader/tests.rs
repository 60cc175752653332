//! Tests for source loading.

use super::*;
use crate::{MapEnvironment, TreeValue};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

/// Write contents to a path, creating parent directories if needed.
fn write_source(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

/// A project directory with a `configs/` subdirectory and a `.git` marker.
fn project() -> TempDir {
    let temp = TempDir::new().expect("tmp");
    fs::create_dir_all(temp.path().join(".git")).expect("git");
    fs::create_dir_all(temp.path().join(DEFAULT_CONFIGS_DIR)).expect("configs");
    temp
}

fn configs(temp: &TempDir) -> PathBuf {
    temp.path().join(DEFAULT_CONFIGS_DIR)
}

#[test]
fn defaults_to_configs_under_project_root() {
    let temp = project();
    write_source(&configs(&temp).join("default.json"), r#"{ "port": 80 }"#);
    let nested = temp.path().join("src").join("bin");
    fs::create_dir_all(&nested).expect("nested");

    let (tree, report) =
        load_tree(&InitOptions::new(&nested), &MapEnvironment::new()).expect("load");
    assert_eq!(TreeValue::Object(tree), json!({ "port": 80 }));
    assert_eq!(
        report.configs_directory,
        configs(&temp).canonicalize().expect("canonical")
    );
    assert_eq!(report.deployment_key_name, DEFAULT_DEPLOYMENT_KEY);
    assert_eq!(report.deployment, None);
    assert_eq!(report.source_names(), vec!["default.json"]);
}

#[test]
fn deployment_and_env_sources_cascade() {
    let temp = project();
    let dir = configs(&temp);
    write_source(
        &dir.join("default.json"),
        r#"{ "db": { "host": "localhost", "port": 5432, "pw": "dev" }, "name": "svc" }"#,
    );
    write_source(
        &dir.join("production.json"),
        r#"{ "db": { "host": "db.prod", "pw": "prod" } }"#,
    );
    write_source(
        &dir.join("custom-environment-variables.json"),
        r#"{ "db": { "pw": "DB_PW" } }"#,
    );
    let env = MapEnvironment::new()
        .with_var("DEPLOYMENT", "Production")
        .with_var("DB_PW", "secret");

    let (tree, report) = load_tree(&InitOptions::new(temp.path()), &env).expect("load");
    assert_eq!(
        TreeValue::Object(tree),
        json!({ "db": { "host": "db.prod", "port": 5432, "pw": "secret" }, "name": "svc" })
    );
    assert_eq!(report.deployment.as_deref(), Some("Production"));
    assert_eq!(
        report.source_names(),
        vec![
            "default.json",
            "production.json",
            "custom-environment-variables.json"
        ]
    );
}

#[test]
fn deployment_named_env_map_is_still_substituted() {
    let temp = project();
    let dir = configs(&temp);
    write_source(&dir.join("default.json"), r#"{ "db": { "pw": "dev" } }"#);
    write_source(
        &dir.join("custom-environment-variables.json"),
        r#"{ "db": { "pw": "DB_PW" } }"#,
    );
    let env = MapEnvironment::new()
        .with_var("DEPLOYMENT", "custom-environment-variables")
        .with_var("DB_PW", "s3cret");

    let (tree, report) = load_tree(&InitOptions::new(temp.path()), &env).expect("load");
    assert_eq!(TreeValue::Object(tree), json!({ "db": { "pw": "s3cret" } }));
    assert_eq!(
        report.source_order.last().map(|source| source.kind),
        Some(SourceKind::CustomEnvironmentVariables)
    );
}

#[test]
fn deployment_key_var_redirects_lookup() {
    let temp = project();
    let dir = configs(&temp);
    write_source(&dir.join("default.json"), r#"{ "tier": "default" }"#);
    write_source(&dir.join("staging.json"), r#"{ "tier": "staging" }"#);
    let env = MapEnvironment::new()
        .with_var("DEPLOYMENT_KEY", "APP_ENV")
        .with_var("APP_ENV", "staging")
        .with_var("DEPLOYMENT", "production");

    let (tree, report) = load_tree(&InitOptions::new(temp.path()), &env).expect("load");
    assert_eq!(tree.get("tier"), Some(&json!("staging")));
    assert_eq!(report.deployment_key_name, "APP_ENV");
}

#[test]
fn explicit_deployment_key_beats_env() {
    let temp = project();
    let dir = configs(&temp);
    write_source(&dir.join("default.json"), r#"{ "tier": "default" }"#);
    write_source(&dir.join("qa.json"), r#"{ "tier": "qa" }"#);
    let env = MapEnvironment::new()
        .with_var("DEPLOYMENT_KEY", "APP_ENV")
        .with_var("STAGE", "QA");

    let options = InitOptions::new(temp.path()).with_deployment_key_name("STAGE");
    let (tree, _) = load_tree(&options, &env).expect("load");
    assert_eq!(tree.get("tier"), Some(&json!("qa")));
}

#[test]
fn configs_directory_var_is_relative_to_cwd() {
    let temp = project();
    write_source(
        &temp.path().join("settings").join("default.json"),
        r#"{ "from": "settings" }"#,
    );
    let env = MapEnvironment::new().with_var("CONFIGS_DIRECTORY", "settings");

    let (tree, report) = load_tree(&InitOptions::new(temp.path()), &env).expect("load");
    assert_eq!(tree.get("from"), Some(&json!("settings")));
    assert!(report.configs_directory.ends_with("settings"));
}

#[test]
fn explicit_directory_beats_env_directory() {
    let temp = project();
    write_source(
        &temp.path().join("explicit").join("default.json"),
        r#"{ "from": "explicit" }"#,
    );
    write_source(
        &temp.path().join("settings").join("default.json"),
        r#"{ "from": "settings" }"#,
    );
    let env = MapEnvironment::new().with_var("CONFIGS_DIRECTORY", "settings");

    let options = InitOptions::new(temp.path()).with_configs_directory("explicit");
    let (tree, _) = load_tree(&options, &env).expect("load");
    assert_eq!(tree.get("from"), Some(&json!("explicit")));
}

#[test]
fn missing_directory_is_reported() {
    let temp = TempDir::new().expect("tmp");
    let options = InitOptions::new(temp.path()).with_configs_directory("nowhere");
    let err = load_tree(&options, &MapEnvironment::new()).unwrap_err();
    assert!(matches!(err, ConfigError::DirectoryNotFound(path) if path.ends_with("nowhere")));
}

#[test]
fn missing_default_source_is_reported() {
    let temp = project();
    write_source(&configs(&temp).join("production.json"), "{}");
    let err = load_tree(&InitOptions::new(temp.path()), &MapEnvironment::new()).unwrap_err();
    assert!(matches!(err, ConfigError::MissingDefaultSource(_)));
}

#[test]
fn parse_errors_surface_as_parse() {
    let temp = project();
    write_source(&configs(&temp).join("default.json"), "{ port: ");
    let err = load_tree(&InitOptions::new(temp.path()), &MapEnvironment::new()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn non_object_root_is_rejected() {
    let err = layer_io::parse_source("default.json", "[1, 2]").unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("default.json"));
    assert!(matches!(err, ConfigError::NotAMapping { .. }));
}

#[test]
fn json5_sources_are_accepted() {
    let map = layer_io::parse_source(
        "default.json",
        "{\n  // comment\n  port: 80,\n  hosts: ['a', 'b',],\n}",
    )
    .expect("parse");
    assert_eq!(
        TreeValue::Object(map),
        json!({ "port": 80, "hosts": ["a", "b"] })
    );
}
