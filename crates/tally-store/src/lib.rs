//! Tally Storage Layer
//!
//! Implements the `TransactionSink` trait for the stores a batch run can write to.
//!
//! # Sinks
//!
//! - `RestSink`: bulk insert into a hosted PostgREST table (e.g. Supabase)
//! - `SqliteSink`: local SQLite database, one SQL transaction per batch
//! - `MemorySink`: in-process sink for tests, with failure injection
//!
//! Every sink writes a whole batch in one call and never retries. Writing the same
//! batch twice stores it twice.
//!
//! # Examples
//!
//! ```no_run
//! use tally_store::SqliteSink;
//!
//! let sink = SqliteSink::new("tally.db").unwrap();
//! // Sink is now ready for batch inserts
//! ```

#![warn(missing_docs)]

mod memory;
mod rest;
mod sqlite;

use thiserror::Error;

pub use memory::MemorySink;
pub use rest::RestSink;
pub use sqlite::SqliteSink;

/// Name of the table every sink writes to
pub const TRANSACTIONS_TABLE: &str = "transactions";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The store could not be reached
    #[error("Connection error: {0}")]
    Connection(String),

    /// The store answered with a non-success status
    #[error("Insert rejected (HTTP {status}): {body}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body, usually a PostgREST error object
        body: String,
    },

    /// Batch could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Empty batches are never written
    #[error("Refusing to insert an empty batch")]
    EmptyBatch,

    /// Shared connection state was poisoned by a panicking writer
    #[error("Store lock error: {0}")]
    Lock(String),

    /// The background write task did not complete
    #[error("Store task error: {0}")]
    Task(String),

    /// Invalid store configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
