//! Error types for the CLI application.

use crate::config::ConfigError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
///
/// Every variant is fatal for the whole run; per-file problems never surface here.
#[derive(Debug, Error)]
pub enum CliError {
    /// Settings or credentials are unusable
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Provider client could not be built or queried
    #[error("LLM error: {0}")]
    Llm(#[from] tally_llm::LlmError),

    /// Store client could not be built
    #[error("Store error: {0}")]
    Store(#[from] tally_store::StoreError),

    /// Batch-fatal pipeline error
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] tally_pipeline::PipelineError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
