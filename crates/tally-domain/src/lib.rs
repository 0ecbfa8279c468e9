//! Tally Domain Layer
//!
//! Core data model and trait seams for the statement ingestion pipeline.
//! Infrastructure (model providers, stores, PDF readers) lives in other crates
//! and plugs in through the traits defined here.
//!
//! ## Key Concepts
//!
//! - **TransactionCandidate**: a record as returned by the model, before enrichment
//! - **Transaction**: a candidate stamped with its source file and a processing status
//! - **Normalization**: the pure step that turns candidates into transactions
//!
//! ## Data Flow
//!
//! ```text
//! file → text → candidates → transactions → store
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod normalize;
pub mod traits;
pub mod transaction;

// Re-exports for convenience
pub use normalize::normalize;
pub use transaction::{RecordStatus, Transaction, TransactionCandidate, UNKNOWN_SOURCE};
