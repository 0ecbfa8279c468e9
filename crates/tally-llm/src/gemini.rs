//! Gemini Provider Implementation
//!
//! Talks to Google's Generative Language REST API.
//!
//! # Features
//!
//! - Async HTTP communication via `generateContent`
//! - Configurable endpoint and model
//! - Model listing for diagnosing which models an API key can use
//!
//! No retries are performed here: a failed call is reported once and the caller decides
//! what to do with the document.
//!
//! # Examples
//!
//! ```no_run
//! use tally_llm::GeminiProvider;
//!
//! # fn main() -> Result<(), tally_llm::LlmError> {
//! let provider = GeminiProvider::new("my-api-key", "gemini-flash-latest")?;
//! # Ok(())
//! # }
//! ```

use crate::LlmError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tally_domain::traits::LlmProvider;
use tracing::debug;

/// Default Generative Language API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default model used for statement extraction
pub const DEFAULT_MODEL: &str = "gemini-flash-latest";

/// Time allowed to establish a connection to the API
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Generation method a model must support to be usable for extraction
pub const GENERATE_CONTENT: &str = "generateContent";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini API provider
///
/// Requests carry no overall deadline unless [`with_timeout`](Self::with_timeout) sets
/// one; callers such as the extraction agent bound each call themselves.
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Option<Duration>,
    client: reqwest::Client,
}

/// Request body for the generateContent API
#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Response from the generateContent API
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseCandidate {
    content: Option<ResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Response from the models listing API
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
    next_page_token: Option<String>,
}

/// A model visible to the configured API key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Resource name, e.g. "models/gemini-flash-latest"
    pub name: String,

    /// Human-readable name
    #[serde(default)]
    pub display_name: Option<String>,

    /// Generation methods the model supports
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    /// Whether the model can be used for text generation
    pub fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|method| method == GENERATE_CONTENT)
    }
}

impl GeminiProvider {
    /// Create a new Gemini provider against the public endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key: api_key.into(),
            timeout: None,
            client: build_client(None)?,
        })
    }

    /// Cap every request at `timeout`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be rebuilt.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = build_client(Some(timeout))?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    /// Request deadline, if one was set
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Point the provider at a different API endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Name of the model used for generation
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Model path segment, accepting both "gemini-x" and "models/gemini-x"
    fn model_path(&self) -> &str {
        self.model.strip_prefix("models/").unwrap_or(&self.model)
    }

    /// Generate text with a single generateContent call
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The network request fails
    /// - The API key is rejected or the model does not exist
    /// - The reply carries no text (e.g. the prompt was blocked)
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint,
            self.model_path()
        );

        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(self.status_error(status, body));
        }

        let reply = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let text = reply_text(reply)?;
        debug!(model = %self.model, "Gemini reply: {} chars", text.len());
        Ok(text)
    }

    /// List every model the API key can see, following pagination
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, LlmError> {
        let url = format!("{}/v1beta/models", self.endpoint);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .header(API_KEY_HEADER, &self.api_key)
                .query(&[("pageSize", "100")]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

            let status = response.status();
            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(self.status_error(status, body));
            }

            let page = response
                .json::<ListModelsResponse>()
                .await
                .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse model list: {}", e)))?;

            models.extend(page.models);
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(models)
    }

    fn status_error(&self, status: StatusCode, body: String) -> LlmError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                LlmError::Unauthorized(format!("HTTP {}: {}", status, body))
            }
            StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(self.model.clone()),
            StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
            _ => LlmError::Communication(format!("HTTP {}: {}", status, body)),
        }
    }
}

fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client, LlmError> {
    let mut builder =
        reqwest::Client::builder().connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))
}

/// Concatenate the text parts of the first candidate
fn reply_text(reply: GenerateContentResponse) -> Result<String, LlmError> {
    if let Some(reason) = reply.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(LlmError::InvalidResponse(format!("Prompt blocked: {}", reason)));
    }

    let candidate = reply
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("No candidates in response".to_string()))?;

    let text: String = candidate
        .content
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
        return Err(LlmError::InvalidResponse(format!(
            "Empty reply (finish reason: {})",
            reason
        )));
    }

    Ok(text)
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        GeminiProvider::generate(self, prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<String, LlmError> {
        reply_text(serde_json::from_str(body).unwrap())
    }

    #[test]
    fn test_gemini_provider_creation() {
        let provider = GeminiProvider::new("key", DEFAULT_MODEL).unwrap();
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.model(), "gemini-flash-latest");
        assert_eq!(provider.timeout(), None);
    }

    #[test]
    fn test_gemini_provider_with_timeout() {
        let provider = GeminiProvider::new("key", DEFAULT_MODEL)
            .unwrap()
            .with_timeout(Duration::from_secs(300))
            .unwrap();
        assert_eq!(provider.timeout(), Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_gemini_provider_with_endpoint_trims_slash() {
        let provider = GeminiProvider::new("key", "gemini-pro")
            .unwrap()
            .with_endpoint("http://localhost:8080/");
        assert_eq!(provider.endpoint, "http://localhost:8080");
    }

    #[test]
    fn test_model_path_accepts_resource_names() {
        let provider = GeminiProvider::new("key", "models/gemini-pro").unwrap();
        assert_eq!(provider.model_path(), "gemini-pro");
    }

    #[test]
    fn test_reply_text_joins_parts() {
        let text = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"[{\"a\":"},{"text":"1}]"}]},"finishReason":"STOP"}]}"#,
        )
        .unwrap();
        assert_eq!(text, r#"[{"a":1}]"#);
    }

    #[test]
    fn test_reply_text_no_candidates() {
        let result = parse(r#"{"candidates":[]}"#);
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
    }

    #[test]
    fn test_reply_text_blocked_prompt() {
        let result = parse(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#);
        match result {
            Err(LlmError::InvalidResponse(msg)) => assert!(msg.contains("SAFETY")),
            _ => panic!("Expected InvalidResponse error"),
        }
    }

    #[test]
    fn test_reply_text_empty_content() {
        let result = parse(r#"{"candidates":[{"finishReason":"MAX_TOKENS"}]}"#);
        match result {
            Err(LlmError::InvalidResponse(msg)) => assert!(msg.contains("MAX_TOKENS")),
            _ => panic!("Expected InvalidResponse error"),
        }
    }

    #[test]
    fn test_status_error_mapping() {
        let provider = GeminiProvider::new("key", "gemini-pro").unwrap();
        assert!(matches!(
            provider.status_error(StatusCode::FORBIDDEN, String::new()),
            LlmError::Unauthorized(_)
        ));
        assert!(matches!(
            provider.status_error(StatusCode::NOT_FOUND, String::new()),
            LlmError::ModelNotAvailable(m) if m == "gemini-pro"
        ));
        assert!(matches!(
            provider.status_error(StatusCode::TOO_MANY_REQUESTS, String::new()),
            LlmError::RateLimitExceeded
        ));
        assert!(matches!(
            provider.status_error(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string()),
            LlmError::Communication(m) if m.contains("boom")
        ));
    }

    #[test]
    fn test_model_info_generate_content_support() {
        let models: ListModelsResponse = serde_json::from_str(
            r#"{"models":[
                {"name":"models/gemini-flash-latest","displayName":"Gemini Flash","supportedGenerationMethods":["generateContent","countTokens"]},
                {"name":"models/embedding-001","supportedGenerationMethods":["embedContent"]}
            ],"nextPageToken":""}"#,
        )
        .unwrap();

        assert_eq!(models.models.len(), 2);
        assert!(models.models[0].supports_generate_content());
        assert!(!models.models[1].supports_generate_content());
        assert_eq!(models.models[0].display_name.as_deref(), Some("Gemini Flash"));
    }

    #[tokio::test]
    async fn test_gemini_error_handling() {
        // Invalid port to trigger a transport error
        let provider = GeminiProvider::new("key", "gemini-pro")
            .unwrap()
            .with_endpoint("http://localhost:99999");

        let result = provider.generate("test").await;
        match result {
            Err(LlmError::Communication(_)) => {}
            _ => panic!("Expected Communication error"),
        }
    }

    // Requires GOOGLE_API_KEY and network access
    #[tokio::test]
    #[ignore]
    async fn test_gemini_generate_integration() {
        let key = std::env::var("GOOGLE_API_KEY").unwrap();
        let provider = GeminiProvider::new(key, DEFAULT_MODEL).unwrap();
        let response = provider.generate("Reply with the JSON array [] and nothing else").await;
        assert!(response.is_ok());
    }
}
