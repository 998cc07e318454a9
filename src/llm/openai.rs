use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use crate::errors::ProveError;
use super::provider::{non_empty, status_error, LLMProvider};
use super::types::{CompletionRequest, LLMResponse};
use tracing::debug;

/// Chat-completions client shared by OpenAI, OpenRouter and local
/// OpenAI-compatible servers such as Ollama.
pub struct OpenAIProvider {
    client: Client,
    name: String,
    api_key: Option<String>,
    base_url: String,
    requires_key: bool,
    extra_headers: Vec<(&'static str, String)>,
}

impl OpenAIProvider {
    pub fn new(api_key: Option<&str>) -> Self {
        Self::with_base_url("openai", api_key, "https://api.openai.com/v1", true)
    }

    pub fn with_base_url(name: &str, api_key: Option<&str>, base_url: &str, requires_key: bool) -> Self {
        Self {
            client: Client::new(),
            name: name.to_string(),
            api_key: api_key.filter(|k| !k.is_empty()).map(str::to_string),
            base_url: base_url.trim_end_matches('/').to_string(),
            requires_key,
            extra_headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        self.extra_headers.push((name, value.to_string()));
        self
    }

    fn request_body(model: &str, request: &CompletionRequest) -> Value {
        json!({
            "model": model,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.user},
            ],
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        })
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn complete(&self, model: &str, request: &CompletionRequest) -> Result<LLMResponse, ProveError> {
        if !self.is_configured() {
            return Err(ProveError::ProviderNotConfigured(format!("{} requires an API key", self.name)));
        }

        let body = Self::request_body(model, request);
        debug!(provider = %self.name, model, "Sending chat completion");

        let mut builder = self.client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }
        for (name, value) in &self.extra_headers {
            builder = builder.header(*name, value);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| ProveError::Network(format!("{} request failed: {}", self.name, e)))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(status_error(&self.name, status, &text));
        }

        let data: Value = resp.json().await
            .map_err(|e| ProveError::LLMApi(format!("Failed to parse {} response: {}", self.name, e)))?;

        if let Some(error) = data.get("error") {
            return Err(ProveError::LLMApi(error["message"].as_str().unwrap_or("Unknown").to_string()));
        }

        let content = non_empty(&self.name, data["choices"][0]["message"]["content"].as_str())?;
        let input_tokens = data["usage"]["prompt_tokens"].as_u64();
        let output_tokens = data["usage"]["completion_tokens"].as_u64();

        Ok(LLMResponse {
            content,
            input_tokens,
            output_tokens,
            model: model.to_string(),
        })
    }

    fn provider_name(&self) -> &str { &self.name }

    fn is_configured(&self) -> bool {
        !self.requires_key || self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            system: "sys".into(),
            user: "usr".into(),
            temperature: 0.1,
            max_tokens: 512,
        }
    }

    #[test]
    fn test_request_body_shape() {
        let body = OpenAIProvider::request_body("gpt-4o-mini", &request());
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "usr");
        assert_eq!(body["max_tokens"], 512);
    }

    #[test]
    fn test_keyless_local_is_configured() {
        let local = OpenAIProvider::with_base_url("local", None, "http://localhost:11434/v1/", false);
        assert!(local.is_configured());
        assert_eq!(local.base_url, "http://localhost:11434/v1");
    }

    #[test]
    fn test_missing_key_unconfigured() {
        assert!(!OpenAIProvider::new(None).is_configured());
        assert!(!OpenAIProvider::new(Some("")).is_configured());
        assert!(OpenAIProvider::new(Some("sk-test")).is_configured());
    }

    #[tokio::test]
    async fn test_unconfigured_fails_before_network() {
        let err = OpenAIProvider::new(None).complete("gpt-4o", &request()).await.unwrap_err();
        assert!(matches!(err, ProveError::ProviderNotConfigured(_)));
    }
}
