//! Candidate enrichment

use crate::transaction::{RecordStatus, Transaction, TransactionCandidate};

/// Stamp every candidate with its source file and the `ok` status
///
/// Pure and deterministic: no I/O, and every candidate field is carried over unchanged.
///
/// # Examples
///
/// ```
/// use tally_domain::{normalize, RecordStatus, TransactionCandidate};
///
/// let candidate = TransactionCandidate {
///     date_time: "01-Jan-2024".to_string(),
///     vendor: "Coffee Co".to_string(),
///     amount: 4.5,
///     kind: "debit".to_string(),
///     category: "Food".to_string(),
///     source: "Unknown".to_string(),
/// };
///
/// let transactions = normalize(vec![candidate], "statement1.pdf");
/// assert_eq!(transactions[0].account, "statement1.pdf");
/// assert_eq!(transactions[0].status, RecordStatus::Ok);
/// ```
pub fn normalize(candidates: Vec<TransactionCandidate>, source_file_id: &str) -> Vec<Transaction> {
    candidates
        .into_iter()
        .map(|candidate| Transaction {
            candidate,
            account: source_file_id.to_string(),
            status: RecordStatus::Ok,
        })
        .collect()
}
