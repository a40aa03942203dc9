// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line front end for inspecting and editing configuration files.
//!
//! ```text
//! cfgstore [--format <tag>] [--log-level <lvl>] <file> <command>
//! ```
//!
//! Commands that modify the file (`set`, `remove`, `convert`) exit with an
//! error when the store reports a failed save.

use crate::adapters::registry;
use crate::domain::{ConfigError, ConfigValue};
use crate::store::ConfigStore;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Inspect and edit JSON or YAML configuration files.
#[derive(Parser, Debug)]
#[command(name = "cfgstore", version, about)]
pub struct Cli {
    /// Format of the input file; detected from the extension if omitted.
    #[arg(short, long, global = true)]
    pub format: Option<String>,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    /// Configuration file to operate on.
    pub file: PathBuf,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Commands understood by the `cfgstore` binary.
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Print the whole configuration in its own format.
    Show,

    /// Print the value stored under a top-level key.
    Get {
        /// Key to look up.
        key: String,
    },

    /// Set a top-level key and save the file.
    ///
    /// The value is read as a YAML scalar, so `42` is stored as an integer and
    /// `true` as a boolean.
    Set {
        /// Key to set.
        key: String,
        /// New value.
        value: String,
    },

    /// Remove a top-level key and save the file.
    Remove {
        /// Key to remove.
        key: String,
    },

    /// List the top-level keys.
    Keys,

    /// Write the configuration to another file, optionally in another format.
    Convert {
        /// Destination file.
        output: PathBuf,
        /// Output format; detected from the destination extension if omitted.
        #[arg(long)]
        to: Option<String>,
    },
}

/// Errors reported by the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    /// The store rejected the operation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The store could not write the file.
    #[error("Failed to save configuration to '{}'", .0.display())]
    SaveFailed(PathBuf),

    /// Writing command output failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// Installs a stderr `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `default_level`. Repeated calls are
/// ignored.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Runs the parsed command, writing its output to `out`.
pub fn execute<W: Write>(cli: &Cli, out: &mut W) -> Result<(), CliError> {
    let mut store = open_store(cli)?;

    match &cli.command {
        Commands::Show => show(&store, out)?,
        Commands::Get { key } => {
            let value = store.get(key).ok_or_else(|| ConfigError::ConfigKeyNotFound {
                key: key.clone(),
            })?;
            writeln!(out, "{}", value)?;
        }
        Commands::Set { key, value } => {
            store.set(key.clone(), parse_value(value));
            save(&mut store, None)?;
        }
        Commands::Remove { key } => {
            if store.remove(key).is_none() {
                return Err(ConfigError::ConfigKeyNotFound { key: key.clone() }.into());
            }
            save(&mut store, None)?;
        }
        Commands::Keys => {
            for key in store.keys() {
                writeln!(out, "{}", key)?;
            }
        }
        Commands::Convert { output, to } => {
            match to {
                Some(tag) => store.set_loader_by_tag(tag)?,
                None => store.set_loader(registry::builtin().for_path(output)?),
            }
            save(&mut store, Some(output.clone()))?;
        }
    }

    Ok(())
}

fn open_store(cli: &Cli) -> Result<ConfigStore, CliError> {
    let builder = ConfigStore::builder().path(cli.file.clone());
    let builder = match &cli.format {
        Some(tag) => builder.format(tag.clone()),
        None => builder.detect_format(),
    };

    let mut store = builder.build()?;
    store.load()?;
    Ok(store)
}

fn show<W: Write>(store: &ConfigStore, out: &mut W) -> Result<(), CliError> {
    let loader = store
        .loader()
        .ok_or_else(|| ConfigError::precondition("The config loader must be set"))?;
    writeln!(out, "{}", loader.render(store.to_mapping())?.trim_end())?;
    Ok(())
}

fn save(store: &mut ConfigStore, path: Option<PathBuf>) -> Result<(), CliError> {
    if store.save_to(path.as_deref())? {
        return Ok(());
    }
    let path = store.file_path().map(PathBuf::from).unwrap_or_default();
    Err(CliError::SaveFailed(path))
}

/// Reads a command-line value as YAML, falling back to a plain string.
fn parse_value(raw: &str) -> ConfigValue {
    if raw.trim().is_empty() {
        return ConfigValue::from(raw);
    }
    serde_yaml::from_str::<ConfigValue>(raw).unwrap_or_else(|_| ConfigValue::from(raw))
}
