//! Tally Pipeline
//!
//! Batch orchestration for statement ingestion: discovers PDFs in an input directory
//! and drives each one through text extraction, model extraction, normalization and
//! storage.
//!
//! # Overview
//!
//! Each file moves through
//!
//! ```text
//! Discovered → TextExtracted → CandidatesExtracted → Normalized → Stored
//! ```
//!
//! or leaves early as `Skipped` (no text, unreadable, model failure, no transactions)
//! or `Failed` (store error or timeout). Files share no state, so a failure in one
//! never affects another, and every discovered file ends in exactly one terminal
//! state.
//!
//! A missing input directory, or one without `.pdf` files, is reported as a no-op
//! run rather than an error.
//!
//! # Usage
//!
//! ```no_run
//! use tally_extractor::{ExtractionAgent, ExtractorConfig};
//! use tally_llm::MockProvider;
//! use tally_pipeline::{BatchOrchestrator, BatchRun, PdfTextExtractor, PipelineConfig};
//! use tally_store::MemorySink;
//!
//! # async fn example() -> Result<(), tally_pipeline::PipelineError> {
//! let agent = ExtractionAgent::new(MockProvider::new("[]"), ExtractorConfig::default());
//! let orchestrator = BatchOrchestrator::new(
//!     PdfTextExtractor::new(),
//!     agent,
//!     MemorySink::new(),
//!     PipelineConfig::default(),
//! );
//!
//! match orchestrator.run().await? {
//!     BatchRun::InputAbsent { reason } => println!("Nothing to do: {}", reason),
//!     BatchRun::Completed(summary) => println!("{}", summary.status_line()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! input_dir = "uploads"
//! concurrency = 1
//! store_timeout_secs = 60
//! ```

#![warn(missing_docs)]

mod config;
mod discovery;
mod error;
mod orchestrator;
mod pdf;
mod summary;

pub use config::PipelineConfig;
pub use discovery::{discover_pdfs, Discovery, PDF_EXTENSION};
pub use error::PipelineError;
pub use orchestrator::BatchOrchestrator;
pub use pdf::{PdfError, PdfTextExtractor};
pub use summary::{BatchRun, BatchSummary, FileOutcome, FileReport, InputAbsence, SkipReason};
