//! Per-file outcomes and batch summaries

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Why a file was skipped without touching the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The document produced no text
    EmptyText,
    /// The document could not be read or parsed
    Unreadable(String),
    /// The model call failed or its reply could not be parsed
    ModelFailure(String),
    /// The model replied with no usable transactions
    NoTransactions,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptyText => write!(f, "empty or unreadable PDF"),
            SkipReason::Unreadable(cause) => write!(f, "unreadable PDF: {}", cause),
            SkipReason::ModelFailure(cause) => write!(f, "AI error: {}", cause),
            SkipReason::NoTransactions => write!(f, "AI could not find transaction data"),
        }
    }
}

/// Terminal state of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FileOutcome {
    /// All transactions were written in one batch
    Stored {
        /// Transactions written
        records: usize,
    },
    /// Nothing was written
    Skipped {
        /// Why the file was skipped
        reason: SkipReason,
    },
    /// The store rejected the batch or timed out
    Failed {
        /// Store error message
        error: String,
    },
}

impl FileOutcome {
    /// Short state label
    pub fn label(&self) -> &'static str {
        match self {
            FileOutcome::Stored { .. } => "stored",
            FileOutcome::Skipped { .. } => "skipped",
            FileOutcome::Failed { .. } => "failed",
        }
    }
}

/// Outcome of one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// File identifier (the file name)
    pub file: String,

    /// Terminal state reached
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

impl FileReport {
    /// Create a report
    pub fn new(file: impl Into<String>, outcome: FileOutcome) -> Self {
        Self {
            file: file.into(),
            outcome,
        }
    }
}

/// Why a run did no work
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputAbsence {
    /// The input directory does not exist
    MissingDirectory(PathBuf),
    /// The input directory holds no `.pdf` files
    NoEligibleFiles(PathBuf),
}

impl fmt::Display for InputAbsence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputAbsence::MissingDirectory(dir) => {
                write!(f, "input folder '{}' is missing", dir.display())
            }
            InputAbsence::NoEligibleFiles(dir) => {
                write!(f, "no PDFs found, add a bank statement to '{}'", dir.display())
            }
        }
    }
}

/// Result of a batch run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "run", rename_all = "snake_case")]
pub enum BatchRun {
    /// Nothing was processed
    InputAbsent {
        /// What was missing
        reason: InputAbsence,
    },
    /// Every discovered file reached a terminal state
    Completed(BatchSummary),
}

/// Outcomes of every file in a completed run
///
/// Reports are kept in discovery order. Serialized output also carries the
/// per-state counts and the status line.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(into = "SummaryRecord")]
pub struct BatchSummary {
    /// Directory that was scanned
    pub input_dir: PathBuf,

    /// One report per discovered file
    pub files: Vec<FileReport>,

    /// Wall-clock duration of the run in milliseconds
    pub elapsed_ms: u64,
}

impl BatchSummary {
    /// Files whose transactions were stored
    pub fn stored(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Stored { .. }))
    }

    /// Files skipped before the store
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped { .. }))
    }

    /// Files whose store write failed
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed { .. }))
    }

    /// Total transactions written across all files
    pub fn records_stored(&self) -> usize {
        self.files
            .iter()
            .map(|r| match r.outcome {
                FileOutcome::Stored { records } => records,
                _ => 0,
            })
            .sum()
    }

    /// Report for a given file, if it was part of the run
    pub fn report(&self, file: &str) -> Option<&FileReport> {
        self.files.iter().find(|r| r.file == file)
    }

    /// One-line final status
    pub fn status_line(&self) -> String {
        format!(
            "Batch complete: {} stored ({} transactions), {} skipped, {} failed",
            self.stored(),
            self.records_stored(),
            self.skipped(),
            self.failed()
        )
    }

    fn count(&self, predicate: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|r| predicate(&r.outcome)).count()
    }
}

/// Serialized form of a [`BatchSummary`]
#[derive(Serialize)]
struct SummaryRecord {
    input_dir: PathBuf,
    stored: usize,
    skipped: usize,
    failed: usize,
    records_stored: usize,
    status_line: String,
    elapsed_ms: u64,
    files: Vec<FileReport>,
}

impl From<BatchSummary> for SummaryRecord {
    fn from(summary: BatchSummary) -> Self {
        Self {
            stored: summary.stored(),
            skipped: summary.skipped(),
            failed: summary.failed(),
            records_stored: summary.records_stored(),
            status_line: summary.status_line(),
            input_dir: summary.input_dir,
            elapsed_ms: summary.elapsed_ms,
            files: summary.files,
        }
    }
}
