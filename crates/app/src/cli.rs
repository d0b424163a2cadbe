//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Courier command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "courier", version, about = "Run HTTP shortcuts from the terminal")]
pub struct Cli {
    /// Settings file (defaults to the platform config directory).
    #[arg(long, global = true, env = "COURIER_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a shortcut.
    Run(RunArgs),
    /// Print the actions of a shortcut as scripts.
    Script {
        /// Shortcut definition (JSON).
        shortcut: PathBuf,
    },
    /// List the available action kinds and their script functions.
    Actions,
}

/// Arguments of `courier run`.
#[derive(Debug, clap::Args)]
pub struct RunArgs {
    /// Shortcut definition (JSON).
    pub shortcut: PathBuf,

    /// Variable store; overrides the settings file.
    #[arg(long)]
    pub variables: Option<PathBuf>,

    /// Directory for response files; overrides the settings file.
    #[arg(long)]
    pub response_dir: Option<PathBuf>,

    /// Request timeout in milliseconds when the shortcut declares none.
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Preset a variable for this run, as `key=value` or `id=value`.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub presets: Vec<(String, String)>,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing variable name in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
