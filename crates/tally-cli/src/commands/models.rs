//! Models command implementation.

use crate::config::{Credentials, Settings};
use crate::error::Result;
use crate::output::Formatter;
use tally_llm::{GeminiProvider, ModelInfo};
use tracing::info;

/// Execute the models command.
///
/// Only the provider API key is required.
pub async fn execute_models(settings: Settings, formatter: &Formatter) -> Result<()> {
    settings.validate()?;
    let api_key = Credentials::api_key_from_env()?;
    let provider = listing_provider(api_key, &settings)?;

    let models = provider.list_models().await?;
    info!("Provider returned {} models", models.len());

    println!("{}", formatter.format_models(&generation_models(models))?);

    Ok(())
}

/// Provider for model listing; each page request is capped at the model call timeout.
pub fn listing_provider(api_key: String, settings: &Settings) -> Result<GeminiProvider> {
    let provider = GeminiProvider::new(api_key, settings.llm.model.clone())?
        .with_endpoint(settings.llm.endpoint.clone())
        .with_timeout(settings.extractor.call_timeout())?;
    Ok(provider)
}

/// Keep only models that support content generation.
pub fn generation_models(models: Vec<ModelInfo>) -> Vec<ModelInfo> {
    models
        .into_iter()
        .filter(ModelInfo::supports_generate_content)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(name: &str, methods: &[&str]) -> ModelInfo {
        ModelInfo {
            name: name.to_string(),
            display_name: None,
            supported_generation_methods: methods.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn test_listing_provider_uses_configured_timeout() {
        let mut settings = Settings::default();
        settings.extractor.call_timeout_secs = 300;

        let provider = listing_provider("key".to_string(), &settings).unwrap();

        assert_eq!(provider.timeout(), Some(std::time::Duration::from_secs(300)));
        assert_eq!(provider.model(), settings.llm.model);
    }

    #[test]
    fn test_generation_models_filter() {
        let models = vec![
            model("models/gemini-flash-latest", &["generateContent", "countTokens"]),
            model("models/text-embedding-004", &["embedContent"]),
        ];
        let kept = generation_models(models);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "models/gemini-flash-latest");
    }

    #[test]
    fn test_generation_models_empty() {
        assert!(generation_models(vec![model("models/x", &[])]).is_empty());
    }
}
