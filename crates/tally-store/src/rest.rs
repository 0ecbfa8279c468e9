//! Hosted store over PostgREST (Supabase)

use crate::{StoreError, TRANSACTIONS_TABLE};
use async_trait::async_trait;
use std::time::Duration;
use tally_domain::traits::TransactionSink;
use tally_domain::Transaction;
use tracing::debug;

/// Time allowed to establish a connection to the store
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Sink that bulk-inserts into a PostgREST table
///
/// Each batch is a single `POST {url}/rest/v1/transactions` with the whole batch as
/// a JSON array, so PostgREST inserts it in one statement. Requests have no overall
/// deadline of their own; the batch orchestrator bounds each write.
pub struct RestSink {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl RestSink {
    /// Create a sink for the project at `url`, authenticated with `api_key`
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tally_store::RestSink;
    ///
    /// let sink = RestSink::new("https://project.supabase.co", "service-key").unwrap();
    /// assert!(sink.endpoint().ends_with("/rest/v1/transactions"));
    /// ```
    pub fn new(url: &str, api_key: impl Into<String>) -> Result<Self, StoreError> {
        let base = url.trim().trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(StoreError::Config(format!(
                "store URL must start with http:// or https://, got '{}'",
                url
            )));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| StoreError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: format!("{}/rest/v1/{}", base, TRANSACTIONS_TABLE),
            api_key: api_key.into(),
            client,
        })
    }

    /// Full URL batches are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TransactionSink for RestSink {
    type Error = StoreError;

    async fn insert_batch(&self, batch: &[Transaction]) -> Result<(), Self::Error> {
        if batch.is_empty() {
            return Err(StoreError::EmptyBatch);
        }

        let body = serde_json::to_vec(batch)?;
        debug!("Posting {} rows ({} bytes) to {}", batch.len(), body.len(), self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header("Prefer", "return=minimal")
            .body(body)
            .send()
            .await
            .map_err(|e| StoreError::Connection(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_targets_transactions_table() {
        let sink = RestSink::new("https://example.supabase.co/", "key").unwrap();
        assert_eq!(sink.endpoint(), "https://example.supabase.co/rest/v1/transactions");
    }

    #[test]
    fn test_rejects_url_without_scheme() {
        let result = RestSink::new("example.supabase.co", "key");
        assert!(matches!(result, Err(StoreError::Config(_))));
    }

    #[tokio::test]
    async fn test_rejects_empty_batch_without_network() {
        let sink = RestSink::new("http://localhost:99999", "key").unwrap();
        let result = sink.insert_batch(&[]).await;
        assert!(matches!(result, Err(StoreError::EmptyBatch)));
    }
}
