//! Transaction records extracted from bank statements

use serde::{Deserialize, Serialize};

/// Bank name used when the model cannot tell which bank issued a statement
pub const UNKNOWN_SOURCE: &str = "Unknown";

/// A transaction as reported by the model, before enrichment
///
/// Field values are kept exactly as the model produced them. Dates are not
/// checked against a calendar and `kind` is not restricted to credit/debit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionCandidate {
    /// Transaction date, expected as "DD-MMM-YYYY"
    pub date_time: String,

    /// Merchant or counterparty name
    pub vendor: String,

    /// Transaction amount, expected positive
    pub amount: f64,

    /// Direction of the transaction ("credit" or "debit" by convention)
    #[serde(rename = "type")]
    pub kind: String,

    /// Free-text category label (e.g. "Food", "Travel", "Bills", "Transfer")
    pub category: String,

    /// Issuing bank as guessed by the model
    #[serde(default = "unknown_source")]
    pub source: String,
}

fn unknown_source() -> String {
    UNKNOWN_SOURCE.to_string()
}

/// Processing marker carried by persisted transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// Parsed and enriched successfully
    Ok,
}

impl RecordStatus {
    /// Wire representation of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Ok => "ok",
        }
    }
}

/// A transaction ready to be written to the store
///
/// Serializes as a flat row: the candidate fields followed by `account` and `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The extracted fields
    #[serde(flatten)]
    pub candidate: TransactionCandidate,

    /// Identifier of the file this transaction was extracted from
    pub account: String,

    /// Processing marker
    pub status: RecordStatus,
}
