//! CLI argument definitions for the medstat pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "medstat",
    version,
    about = "Monthly medication transport statistics pipeline",
    long_about = "Load the transport workbook, reconcile orders against the \
                  transport form for the previous calendar month, and load \
                  the result into the statistics database."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline and load the destination store.
    Run(RunArgs),

    /// Load and transform only; report counts without touching the store.
    Check(CheckArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Path to the TOML configuration file.
    #[arg(long = "config", value_name = "PATH", default_value = "medstat.toml")]
    pub config: PathBuf,

    /// Override the workbook path from the config file.
    #[arg(long = "workbook", value_name = "PATH")]
    pub workbook: Option<PathBuf>,

    /// Override the destination database URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,

    /// Transform and report, but skip all destination writes.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Path to the TOML configuration file.
    #[arg(long = "config", value_name = "PATH", default_value = "medstat.toml")]
    pub config: PathBuf,

    /// Override the workbook path from the config file.
    #[arg(long = "workbook", value_name = "PATH")]
    pub workbook: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
