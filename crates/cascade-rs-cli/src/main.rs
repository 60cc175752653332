//! Inspect the effective configuration of a configs directory.

use anyhow::{Context, anyhow};
use cascade_rs_config::{ConfigError, ConfigStore, InitOptions, TreeValue};
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Command-line options for the config inspector.
#[derive(Parser)]
#[command(name = "cascade", version)]
struct Cli {
    /// Configs directory (defaults to $CONFIGS_DIRECTORY or <project_root>/configs)
    #[arg(long)]
    configs_dir: Option<PathBuf>,
    /// Variable holding the deployment name (defaults to $DEPLOYMENT_KEY or DEPLOYMENT)
    #[arg(long)]
    deployment_key: Option<String>,
    /// Override applied before the first read, as PATH=VALUE (VALUE is JSON5 or a plain string)
    #[arg(long = "set", value_name = "PATH=VALUE")]
    overrides: Vec<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the value at PATH, or the whole tree
    Get {
        #[arg(default_value = "")]
        path: String,
    },
    /// Print whether PATH resolves; exits 1 when it does not
    Has { path: String },
    /// Print where config was loaded from
    Sources,
}

fn main() -> anyhow::Result<ExitCode> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    info!(
        "starting cascade (configs_dir_set={}, deployment_key_set={}, overrides={})",
        cli.configs_dir.is_some(),
        cli.deployment_key.is_some(),
        cli.overrides.len()
    );

    let store = ConfigStore::new();
    run(cli, &store, &mut io::stdout().lock())
}

/// Load config into `store`, apply overrides, and run the subcommand.
fn run(cli: Cli, store: &ConfigStore, out: &mut impl Write) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir().context("failed to resolve current working directory")?;
    let mut options = InitOptions::new(&cwd);
    options.configs_directory = cli.configs_dir;
    options.deployment_key_name = cli.deployment_key;

    let report = store
        .init(&options)
        .context("failed to load configuration")?;
    for raw in &cli.overrides {
        let (path, value) = parse_override(raw)?;
        debug!("applying override (path={})", path);
        store
            .set(path, value)
            .with_context(|| format!("failed to apply override {raw}"))?;
    }

    match cli.command {
        Command::Get { path } => match store.get(&path) {
            Ok(value) => {
                writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
                Ok(ExitCode::SUCCESS)
            }
            Err(err @ ConfigError::NoSuchConfig(_)) => {
                eprintln!("{err}");
                Ok(ExitCode::FAILURE)
            }
            Err(err) => Err(err.into()),
        },
        Command::Has { path } => {
            let present = store.has(&path)?;
            writeln!(out, "{present}")?;
            Ok(if present {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Sources => {
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Split `PATH=VALUE`, parsing VALUE as JSON5 and falling back to a string.
fn parse_override(raw: &str) -> anyhow::Result<(&str, TreeValue)> {
    let (path, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("override must be PATH=VALUE, got {raw}"))?;
    if path.is_empty() {
        return Err(anyhow!("override path must not be empty: {raw}"));
    }
    let value = json5::from_str::<TreeValue>(value)
        .unwrap_or_else(|_| TreeValue::String(value.to_string()));
    Ok((path, value))
}
