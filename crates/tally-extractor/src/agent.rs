//! Core extraction agent

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_reply;
use crate::prompt::{truncate_chars, PromptBuilder};
use tally_domain::traits::LlmProvider;
use tally_domain::TransactionCandidate;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Extracts transaction candidates from statement text with one model call
pub struct ExtractionAgent<L>
where
    L: LlmProvider,
{
    llm_provider: L,
    config: ExtractorConfig,
}

impl<L> ExtractionAgent<L>
where
    L: LlmProvider,
{
    /// Create a new agent around a model provider
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Self {
        Self {
            llm_provider,
            config,
        }
    }

    /// Extract candidates, degrading every failure to an empty sequence
    ///
    /// The failure is logged at `warn` level; use [`try_extract`](Self::try_extract) to
    /// inspect it instead.
    pub async fn extract(&self, document_text: &str) -> Vec<TransactionCandidate> {
        match self.try_extract(document_text).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Extraction failed, treating document as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Extract candidates, reporting why the model call or reply was unusable
    ///
    /// An `Ok` result may still be empty when the model found no transactions.
    pub async fn try_extract(
        &self,
        document_text: &str,
    ) -> Result<Vec<TransactionCandidate>, ExtractorError> {
        let (text, truncated) = truncate_chars(document_text, self.config.max_text_chars);
        if truncated {
            info!(
                "Document text truncated to the first {} characters",
                self.config.max_text_chars
            );
        }

        let prompt = PromptBuilder::new(text).build();
        debug!("Prompt length: {} chars", prompt.len());

        let reply = timeout(self.config.call_timeout(), self.llm_provider.generate(&prompt))
            .await
            .map_err(|_| ExtractorError::Timeout(self.config.call_timeout_secs))?
            .map_err(|e| ExtractorError::Llm(e.to_string()))?;

        debug!("LLM reply length: {} chars", reply.len());

        let candidates = parse_reply(&reply)?;
        info!("Parsed {} transaction candidates", candidates.len());

        Ok(candidates)
    }
}
