//! Tally Extractor
//!
//! Turns bank-statement text into transaction candidates using a generative model.
//!
//! # Overview
//!
//! The agent embeds a bounded prefix of the document text in a fixed instruction
//! template, makes exactly one model call, and parses the reply as a JSON array of
//! transactions. The reply is treated as untrusted: markdown code fences are
//! stripped before parsing, and elements that do not look like transactions are
//! dropped.
//!
//! # Architecture
//!
//! ```text
//! Text → truncate → Prompt → LLM → strip fences → JSON array → Candidates
//! ```
//!
//! # Failure Policy
//!
//! [`ExtractionAgent::extract`] never fails: a provider error, a timeout, or an
//! unparseable reply all degrade to an empty sequence so one bad document cannot
//! abort a batch. [`ExtractionAgent::try_extract`] exposes the underlying cause for
//! callers that want to report it.
//!
//! # Example Usage
//!
//! ```no_run
//! use tally_extractor::{ExtractionAgent, ExtractorConfig};
//! use tally_llm::MockProvider;
//!
//! # async fn example() {
//! let llm = MockProvider::new("[]");
//! let agent = ExtractionAgent::new(llm, ExtractorConfig::default());
//!
//! let candidates = agent.extract("01-Jan-2024 Coffee Co 4.50 DR").await;
//! println!("Found {} transactions", candidates.len());
//! # }
//! ```

#![warn(missing_docs)]

mod agent;
mod config;
mod error;
mod parser;
mod prompt;


pub use agent::ExtractionAgent;
pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use parser::{parse_reply, strip_code_fences};
pub use prompt::{truncate_chars, PromptBuilder};
