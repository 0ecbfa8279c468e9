//! Error types for batch runs

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a batch run
///
/// Per-file problems never surface here; they become terminal file states.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The input directory exists but could not be listed
    #[error("Failed to read input directory {path}: {source}")]
    Io {
        /// Directory being scanned
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
