//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and infrastructure.
//! Implementations live in other crates (`tally-llm`, `tally-store`, `tally-pipeline`).

use crate::Transaction;
use async_trait::async_trait;
use std::path::Path;

/// Trait for generative model operations
///
/// Implemented by the infrastructure layer (tally-llm)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Error type for model calls
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send a prompt and return the model's text reply
    async fn generate(&self, prompt: &str) -> Result<String, Self::Error>;
}

/// Trait for persisting transaction batches
///
/// Implemented by the infrastructure layer (tally-store)
#[async_trait]
pub trait TransactionSink: Send + Sync {
    /// Error type for store operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Insert a non-empty batch of transactions in a single bulk write
    async fn insert_batch(&self, batch: &[Transaction]) -> Result<(), Self::Error>;
}

/// Trait for turning a document on disk into plain text
///
/// Implemented by the pipeline layer (tally-pipeline)
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Error type for unreadable documents
    type Error: std::error::Error + Send + Sync + 'static;

    /// Return the concatenated text of every page in the document
    async fn extract_text(&self, path: &Path) -> Result<String, Self::Error>;
}
