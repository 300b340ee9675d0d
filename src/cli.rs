// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;

/// Command-line arguments for `leo`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "leo",
    version,
    about = "Run a graph of dependent shell commands with maximal parallelism.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the graph definition (TOML).
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Number of times to run the graph. Overrides `[config].runs`.
    #[arg(long, value_name = "N", value_parser = parse_runs)]
    pub runs: Option<usize>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `LEO_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Build the graph and print it, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Build the graph and print it in Graphviz DOT format.
    #[arg(long)]
    pub dot: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// `--runs` takes a positive count.
fn parse_runs(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be >= 1".to_string()),
        Ok(runs) => Ok(runs),
        Err(err) => Err(err.to_string()),
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
