//! PDF text extraction backed by `pdf-extract`

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tally_domain::traits::TextExtractor;
use thiserror::Error;
use tracing::debug;

/// Errors raised while reading a PDF
#[derive(Error, Debug)]
pub enum PdfError {
    /// The file could not be read from disk
    #[error("Failed to read {path}: {source}")]
    Read {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not a PDF the parser understands
    #[error("PDF extraction failed: {0}")]
    Parse(String),

    /// The parser panicked on this document
    #[error("PDF parser aborted: {0}")]
    Aborted(String),
}

/// Extracts the text of every page of a PDF
///
/// Parsing runs on the blocking thread pool; a parser panic is contained and
/// reported as [`PdfError::Aborted`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    /// Create a new extractor
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    type Error = PdfError;

    async fn extract_text(&self, path: &Path) -> Result<String, Self::Error> {
        let bytes = tokio::fs::read(path).await.map_err(|source| PdfError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| PdfError::Aborted(e.to_string()))?
            .map_err(|e| PdfError::Parse(e.to_string()))?;

        // Pages are separated by form feeds; join them with newlines
        let text = text.replace('\x0C', "\n");
        debug!("Extracted {} chars from {}", text.len(), path.display());
        Ok(text)
    }
}
