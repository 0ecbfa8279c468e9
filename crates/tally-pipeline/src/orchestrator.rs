//! Batch orchestration over the input directory

use crate::config::PipelineConfig;
use crate::discovery::{discover_pdfs, Discovery};
use crate::error::PipelineError;
use crate::summary::{BatchRun, BatchSummary, FileOutcome, FileReport, InputAbsence, SkipReason};
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::time::Instant;
use tally_domain::normalize;
use tally_domain::traits::{LlmProvider, TextExtractor, TransactionSink};
use tally_extractor::ExtractionAgent;
use tokio::time::timeout;
use tracing::{error, info, info_span, warn, Instrument};

/// Drives every discovered file through extraction, normalization and storage
///
/// Collaborators are injected so a run can use real clients or test doubles.
///
/// # Examples
///
/// ```no_run
/// use tally_extractor::{ExtractionAgent, ExtractorConfig};
/// use tally_llm::MockProvider;
/// use tally_pipeline::{BatchOrchestrator, PdfTextExtractor, PipelineConfig};
/// use tally_store::SqliteSink;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let agent = ExtractionAgent::new(MockProvider::new("[]"), ExtractorConfig::default());
///     let orchestrator = BatchOrchestrator::new(
///         PdfTextExtractor::new(),
///         agent,
///         SqliteSink::new("tally.db")?,
///         PipelineConfig::default(),
///     );
///
///     let run = orchestrator.run().await?;
///     println!("{:?}", run);
///     Ok(())
/// }
/// ```
pub struct BatchOrchestrator<T, L, S>
where
    T: TextExtractor,
    L: LlmProvider,
    S: TransactionSink,
{
    text_extractor: T,
    agent: ExtractionAgent<L>,
    sink: S,
    config: PipelineConfig,
}

impl<T, L, S> BatchOrchestrator<T, L, S>
where
    T: TextExtractor,
    L: LlmProvider,
    S: TransactionSink,
{
    /// Create a new orchestrator
    pub fn new(text_extractor: T, agent: ExtractionAgent<L>, sink: S, config: PipelineConfig) -> Self {
        Self {
            text_extractor,
            agent,
            sink,
            config,
        }
    }

    /// Process every `.pdf` file in the input directory
    ///
    /// # Errors
    ///
    /// Only an unreadable input directory or an invalid configuration is an error.
    /// A missing or empty directory yields [`BatchRun::InputAbsent`], and per-file
    /// failures are recorded in the summary.
    pub async fn run(&self) -> Result<BatchRun, PipelineError> {
        self.config.validate().map_err(PipelineError::Config)?;

        let started = Instant::now();
        let input_dir = &self.config.input_dir;

        let files = match discover_pdfs(input_dir)? {
            Discovery::MissingDirectory => {
                let reason = InputAbsence::MissingDirectory(input_dir.clone());
                warn!("{}", reason);
                return Ok(BatchRun::InputAbsent { reason });
            }
            Discovery::Files(files) if files.is_empty() => {
                let reason = InputAbsence::NoEligibleFiles(input_dir.clone());
                warn!("{}", reason);
                return Ok(BatchRun::InputAbsent { reason });
            }
            Discovery::Files(files) => files,
        };

        info!(
            "Found {} files in '{}' (concurrency: {})",
            files.len(),
            input_dir.display(),
            self.config.concurrency
        );

        let mut reports: Vec<(usize, FileReport)> = stream::iter(files.iter().enumerate())
            .map(|(idx, path)| async move { (idx, self.process_file(path).await) })
            .buffer_unordered(self.config.concurrency)
            .collect()
            .await;
        reports.sort_by_key(|(idx, _)| *idx);

        let summary = BatchSummary {
            input_dir: input_dir.clone(),
            files: reports.into_iter().map(|(_, report)| report).collect(),
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        info!("{}", summary.status_line());

        Ok(BatchRun::Completed(summary))
    }

    /// Drive one file to its terminal state
    ///
    /// Never fails: every error is converted into a skipped or failed outcome.
    pub async fn process_file(&self, path: &Path) -> FileReport {
        let file_id = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let span = info_span!("file", file = %file_id);
        let outcome = self.file_outcome(path, &file_id).instrument(span).await;

        FileReport::new(file_id, outcome)
    }

    async fn file_outcome(&self, path: &Path, file_id: &str) -> FileOutcome {
        info!("Reading {}", file_id);
        let text = match self.text_extractor.extract_text(path).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Unreadable PDF: {}", e);
                return FileOutcome::Skipped {
                    reason: SkipReason::Unreadable(e.to_string()),
                };
            }
        };

        if text.trim().is_empty() {
            warn!("Empty PDF or unreadable");
            return FileOutcome::Skipped {
                reason: SkipReason::EmptyText,
            };
        }

        info!("Sending {} chars to the model for analysis", text.chars().count());
        let candidates = match self.agent.try_extract(&text).await {
            Ok(candidates) if candidates.is_empty() => {
                warn!("AI could not find transaction data");
                return FileOutcome::Skipped {
                    reason: SkipReason::NoTransactions,
                };
            }
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("AI error: {}", e);
                return FileOutcome::Skipped {
                    reason: SkipReason::ModelFailure(e.to_string()),
                };
            }
        };
        info!("AI identified {} transactions", candidates.len());

        let batch = normalize(candidates, file_id);

        match timeout(self.config.store_timeout(), self.sink.insert_batch(&batch)).await {
            Ok(Ok(())) => {
                info!("Saved {} transactions to the store", batch.len());
                FileOutcome::Stored {
                    records: batch.len(),
                }
            }
            Ok(Err(e)) => {
                error!("Database error: {}", e);
                FileOutcome::Failed {
                    error: e.to_string(),
                }
            }
            Err(_) => {
                let message = format!(
                    "store write timed out after {}s",
                    self.config.store_timeout_secs
                );
                error!("Database error: {}", message);
                FileOutcome::Failed { error: message }
            }
        }
    }
}
