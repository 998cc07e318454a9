use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use crate::errors::ProveError;
use super::provider::{non_empty, status_error, LLMProvider};
use super::types::{CompletionRequest, LLMResponse};
use tracing::debug;

pub struct AnthropicProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl AnthropicProvider {
    pub fn new(api_key: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.filter(|k| !k.is_empty()).map(str::to_string),
            base_url: "https://api.anthropic.com".to_string(),
        }
    }
}

#[async_trait]
impl LLMProvider for AnthropicProvider {
    async fn complete(&self, model: &str, request: &CompletionRequest) -> Result<LLMResponse, ProveError> {
        let api_key = self.api_key.as_deref()
            .ok_or_else(|| ProveError::ProviderNotConfigured("anthropic requires ANTHROPIC_API_KEY".into()))?;

        let body = json!({
            "model": model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "system": request.system,
            "messages": [{"role": "user", "content": request.user}]
        });
        debug!(model, "Sending Anthropic message");

        let resp = self.client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProveError::Network(format!("Anthropic API request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(status_error("anthropic", status, &text));
        }

        let data: Value = resp.json().await
            .map_err(|e| ProveError::LLMApi(format!("Failed to parse Anthropic response: {}", e)))?;

        if let Some(error) = data.get("error") {
            let msg = error["message"].as_str().unwrap_or("Unknown error");
            return Err(ProveError::LLMApi(msg.to_string()));
        }

        let content = non_empty("anthropic", data["content"][0]["text"].as_str())?;

        Ok(LLMResponse {
            content,
            input_tokens: data["usage"]["input_tokens"].as_u64(),
            output_tokens: data["usage"]["output_tokens"].as_u64(),
            model: model.to_string(),
        })
    }

    fn provider_name(&self) -> &str { "anthropic" }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
