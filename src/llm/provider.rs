use async_trait::async_trait;
use reqwest::StatusCode;
use crate::errors::ProveError;
use super::types::{CompletionRequest, LLMResponse};

#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// One chat completion against `model`. The model is chosen per call so
    /// the fallback chain can walk a list without rebuilding the provider.
    async fn complete(
        &self,
        model: &str,
        request: &CompletionRequest,
    ) -> Result<LLMResponse, ProveError>;

    /// Provider name for logging
    fn provider_name(&self) -> &str;

    /// Whether the provider can run at all. Keyless providers are always
    /// configured; the rest need a non-empty key.
    fn is_configured(&self) -> bool;
}

/// Map a non-success HTTP status onto the error taxonomy.
pub(crate) fn status_error(provider: &str, status: StatusCode, body: &str) -> ProveError {
    let snippet: String = body.chars().take(300).collect();
    match status.as_u16() {
        401 | 403 => ProveError::Authentication(format!("{} rejected the API key", provider)),
        429 => ProveError::RateLimit(format!("{} rate limit", provider)),
        _ => ProveError::LLMApi(format!("{} returned HTTP {}: {}", provider, status.as_u16(), snippet)),
    }
}

/// Reject blank completions so the fallback chain moves on.
pub(crate) fn non_empty(provider: &str, content: Option<&str>) -> Result<String, ProveError> {
    match content.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(ProveError::LLMApi(format!("Empty response from {}", provider))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(status_error("openai", StatusCode::UNAUTHORIZED, ""), ProveError::Authentication(_)));
        assert!(matches!(status_error("openai", StatusCode::TOO_MANY_REQUESTS, ""), ProveError::RateLimit(_)));
        let err = status_error("gemini", StatusCode::BAD_GATEWAY, "upstream down");
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("upstream down"));
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("x", Some("  {}  ")).unwrap(), "{}");
        assert!(non_empty("x", Some("   ")).is_err());
        assert!(non_empty("x", None).is_err());
    }
}
