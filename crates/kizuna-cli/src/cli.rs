//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use kizuna_tracker::{DatasetFormat, HistoryMode};
use std::path::PathBuf;

/// Kizuna CLI - Build an episode-by-episode relationship dataset.
#[derive(Debug, Parser)]
#[command(name = "kizuna")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Summary output format
    #[arg(long, value_enum, global = true)]
    pub summary_format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "KIZUNA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter (e.g. "info", "kizuna_tracker=debug"); overrides RUST_LOG
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Summary format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (output path only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process an episode dataset into relationship records
    Run(RunArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),

    /// Print the relationship tag vocabulary
    Taxonomy,
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Episode CSV with Episode (or #), Arc and Synopsis columns
    #[arg(short, long)]
    pub input: PathBuf,

    /// Where to write the records
    #[arg(short, long)]
    pub output: PathBuf,

    /// Output format; inferred from the output extension when omitted
    #[arg(long, value_enum)]
    pub format: Option<DatasetArg>,

    /// Baseline for the Network_Changes column
    #[arg(long, value_enum)]
    pub history_mode: Option<HistoryModeArg>,

    /// Process only the first N episodes
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Override the configured model
    #[arg(short, long)]
    pub model: Option<String>,

    /// Override the configured endpoint
    #[arg(long)]
    pub endpoint: Option<String>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

/// Dataset format argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum DatasetArg {
    /// Comma-separated values
    Csv,
    /// JSON array
    Json,
}

/// History mode argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum HistoryModeArg {
    /// Diff against the pair's previous tags
    Incremental,
    /// Diff every observation against an empty set
    EmptyBaseline,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<DatasetArg> for DatasetFormat {
    fn from(format: DatasetArg) -> Self {
        match format {
            DatasetArg::Csv => DatasetFormat::Csv,
            DatasetArg::Json => DatasetFormat::Json,
        }
    }
}

impl From<HistoryModeArg> for HistoryMode {
    fn from(mode: HistoryModeArg) -> Self {
        match mode {
            HistoryModeArg::Incremental => HistoryMode::Incremental,
            HistoryModeArg::EmptyBaseline => HistoryMode::EmptyBaseline,
        }
    }
}
