//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// LLM provider error
    #[error("Model call failed: {0}")]
    Llm(String),

    /// The model call did not finish in time
    #[error("Model call timed out after {0}s")]
    Timeout(u64),

    /// Reply parsed as JSON but is not a transaction array
    #[error("Invalid reply format: {0}")]
    InvalidFormat(String),

    /// Reply is not JSON at all
    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}
