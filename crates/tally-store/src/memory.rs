//! In-memory sink for tests

use crate::StoreError;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tally_domain::traits::TransactionSink;
use tally_domain::Transaction;

/// Sink that keeps every inserted batch in memory
///
/// Clones share state, so a test can hand one clone to the pipeline and inspect
/// the other afterwards.
///
/// # Examples
///
/// ```
/// use tally_store::MemorySink;
///
/// let sink = MemorySink::new();
/// sink.fail_for_account("broken.pdf");
/// assert_eq!(sink.insert_calls(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    batches: Arc<Mutex<Vec<Vec<Transaction>>>>,
    failing_accounts: Arc<Mutex<HashSet<String>>>,
    calls: Arc<Mutex<usize>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every batch whose transactions belong to `account`
    pub fn fail_for_account(&self, account: impl Into<String>) {
        self.failing_accounts.lock().unwrap().insert(account.into());
    }

    /// Batches stored so far, in insertion order
    pub fn batches(&self) -> Vec<Vec<Transaction>> {
        self.batches.lock().unwrap().clone()
    }

    /// Every stored transaction, flattened
    pub fn transactions(&self) -> Vec<Transaction> {
        self.batches.lock().unwrap().iter().flatten().cloned().collect()
    }

    /// Number of insert attempts, including rejected ones
    pub fn insert_calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl TransactionSink for MemorySink {
    type Error = StoreError;

    async fn insert_batch(&self, batch: &[Transaction]) -> Result<(), Self::Error> {
        *self.calls.lock().unwrap() += 1;

        if batch.is_empty() {
            return Err(StoreError::EmptyBatch);
        }

        let failing = self.failing_accounts.lock().unwrap();
        if let Some(t) = batch.iter().find(|t| failing.contains(&t.account)) {
            return Err(StoreError::Connection(format!(
                "simulated outage while writing {}",
                t.account
            )));
        }
        drop(failing);

        self.batches.lock().unwrap().push(batch.to_vec());
        Ok(())
    }
}
