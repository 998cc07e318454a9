use std::sync::Arc;
use crate::config::ProveConfig;
use crate::errors::ProveError;
use super::provider::LLMProvider;
use super::anthropic::AnthropicProvider;
use super::openai::OpenAIProvider;
use super::gemini::GeminiProvider;
use super::catalog;

/// Build the single active provider for this deployment. Provider choice is
/// static; the model list is walked separately by the hypothesis generator.
pub fn create_provider(config: &ProveConfig) -> Result<Arc<dyn LLMProvider>, ProveError> {
    let info = catalog::get_provider(&config.provider)
        .ok_or_else(|| ProveError::Config(format!("Unknown LLM provider: {}", config.provider)))?;
    let api_key = config.api_key.as_deref();

    match info.backend {
        "anthropic" => Ok(Arc::new(AnthropicProvider::new(api_key))),
        "gemini" => Ok(Arc::new(GeminiProvider::new(api_key))),
        "openai" => {
            let url = config.base_url.as_deref().or(info.base_url).unwrap_or("https://api.openai.com/v1");
            Ok(Arc::new(OpenAIProvider::with_base_url(info.id, api_key, url, true)))
        }
        "openai_compatible" => {
            // Use explicit base_url override, or the one from the catalog
            let url = config.base_url.as_deref()
                .or(info.base_url)
                .ok_or_else(|| ProveError::Config(format!("{} needs a base_url", info.name)))?;
            let provider = OpenAIProvider::with_base_url(info.id, api_key, url, info.requires_key());
            let provider = if info.id == "openrouter" {
                provider.with_header("X-Title", "provebot")
            } else {
                provider
            };
            Ok(Arc::new(provider))
        }
        other => Err(ProveError::Config(format!("Unsupported provider backend: {}", other))),
    }
}

/// Pre-flight: fail before any network call when a keyed provider has no key.
pub fn ensure_configured(provider: &dyn LLMProvider) -> Result<(), ProveError> {
    if provider.is_configured() {
        return Ok(());
    }
    let env_var = catalog::get_provider(provider.provider_name())
        .map(|p| p.env_var)
        .unwrap_or("the provider API key");
    Err(ProveError::ProviderNotConfigured(format!(
        "{} is selected but {} is not set",
        provider.provider_name(),
        env_var
    )))
}
