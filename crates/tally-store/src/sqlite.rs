//! Local SQLite store

use crate::StoreError;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tally_domain::traits::TransactionSink;
use tally_domain::{RecordStatus, Transaction, TransactionCandidate};
use tracing::debug;

/// SQLite-based implementation of TransactionSink
///
/// Each batch is written inside one SQL transaction, so a batch is either fully
/// stored or not stored at all.
///
/// # Thread Safety
///
/// The connection is guarded by a mutex; concurrent batches are serialized.
/// Writes run on the blocking thread pool so a busy database never stalls the
/// async workers.
pub struct SqliteSink {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSink {
    /// Open (or create) the database at `path`
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Number of stored transactions
    pub fn count(&self) -> Result<usize, StoreError> {
        let conn = lock(&self.conn)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Stored transactions for one account, in insertion order
    pub fn transactions_for_account(&self, account: &str) -> Result<Vec<Transaction>, StoreError> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT date_time, vendor, amount, type, category, source, account, status
             FROM transactions WHERE account = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![account], |row| {
            Ok((
                TransactionCandidate {
                    date_time: row.get(0)?,
                    vendor: row.get(1)?,
                    amount: row.get(2)?,
                    kind: row.get(3)?,
                    category: row.get(4)?,
                    source: row.get(5)?,
                },
                row.get::<_, String>(6)?,
                row.get::<_, String>(7)?,
            ))
        })?;

        let mut transactions = Vec::new();
        for row in rows {
            let (candidate, account, status) = row?;
            if status != RecordStatus::Ok.as_str() {
                return Err(StoreError::Config(format!("Unknown record status '{}'", status)));
            }
            transactions.push(Transaction {
                candidate,
                account,
                status: RecordStatus::Ok,
            });
        }
        Ok(transactions)
    }
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, StoreError> {
    conn.lock().map_err(|e| StoreError::Lock(e.to_string()))
}

/// Insert the whole batch inside one SQL transaction
fn write_batch(conn: &Mutex<Connection>, batch: &[Transaction]) -> Result<(), StoreError> {
    let mut conn = lock(conn)?;
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO transactions (date_time, vendor, amount, type, category, source, account, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for t in batch {
            stmt.execute(params![
                t.candidate.date_time,
                t.candidate.vendor,
                t.candidate.amount,
                t.candidate.kind,
                t.candidate.category,
                t.candidate.source,
                t.account,
                t.status.as_str(),
            ])?;
        }
    }
    tx.commit()?;
    debug!("Committed {} rows", batch.len());
    Ok(())
}

#[async_trait]
impl TransactionSink for SqliteSink {
    type Error = StoreError;

    async fn insert_batch(&self, batch: &[Transaction]) -> Result<(), Self::Error> {
        if batch.is_empty() {
            return Err(StoreError::EmptyBatch);
        }

        let conn = Arc::clone(&self.conn);
        let batch = batch.to_vec();
        tokio::task::spawn_blocking(move || write_batch(&conn, &batch))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;
    use tally_domain::normalize;

    fn candidate() -> TransactionCandidate {
        TransactionCandidate {
            date_time: "01-Jan-2024".to_string(),
            vendor: "Coffee Co".to_string(),
            amount: 4.5,
            kind: "debit".to_string(),
            category: "Food".to_string(),
            source: "Unknown".to_string(),
        }
    }

    #[tokio::test]
    async fn test_busy_database_does_not_block_the_runtime() {
        let sink = SqliteSink::new(":memory:").unwrap();

        let (locked_tx, locked_rx) = mpsc::channel();
        let conn = Arc::clone(&sink.conn);
        let holder = std::thread::spawn(move || {
            let _guard = conn.lock().unwrap();
            locked_tx.send(()).unwrap();
            std::thread::sleep(Duration::from_secs(2));
        });
        locked_rx.recv().unwrap();

        // A write stuck on the lock must still let the timer fire
        let batch = normalize(vec![candidate()], "s1.pdf");
        let result = tokio::time::timeout(Duration::from_millis(200), sink.insert_batch(&batch)).await;
        assert!(result.is_err());

        holder.join().unwrap();
        sink.insert_batch(&batch).await.unwrap();
        assert!(sink.count().unwrap() >= 1);
    }
}
