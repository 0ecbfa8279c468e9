//! Tally CLI - batch ingestion of bank statement PDFs.
//!
//! This crate provides the `tally` binary: it loads settings and credentials,
//! wires the Gemini provider and the configured store into a
//! [`tally_pipeline::BatchOrchestrator`], and prints the batch report.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::{Credentials, Settings};
pub use error::{CliError, Result};
pub use output::Formatter;
