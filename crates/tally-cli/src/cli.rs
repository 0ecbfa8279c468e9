//! CLI command definitions and argument parsing.

use crate::config::{OutputFormat, StoreBackend};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Tally - extract transactions from bank statement PDFs into a store.
#[derive(Debug, Parser)]
#[command(name = "tally")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (defaults to ./tally.toml when present)
    #[arg(short, long, global = true, env = "TALLY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (status line only)
    Quiet,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => OutputFormat::Table,
            CliFormat::Json => OutputFormat::Json,
            CliFormat::Quiet => OutputFormat::Quiet,
        }
    }
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process every PDF in the input folder (default)
    Run(RunArgs),

    /// List provider models that support content generation
    Models,
}

/// Arguments for the run command.
#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// Input folder to scan for statements
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Number of files processed at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Store backend
    #[arg(long, value_enum)]
    pub store: Option<StoreArg>,

    /// SQLite database path (sqlite backend only)
    #[arg(long)]
    pub database: Option<PathBuf>,
}

/// Store backend options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum StoreArg {
    /// Hosted REST table
    Rest,
    /// Local SQLite file
    Sqlite,
}

impl From<StoreArg> for StoreBackend {
    fn from(arg: StoreArg) -> Self {
        match arg {
            StoreArg::Rest => StoreBackend::Rest,
            StoreArg::Sqlite => StoreBackend::Sqlite,
        }
    }
}
