use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use crate::errors::ProveError;
use super::provider::{non_empty, status_error, LLMProvider};
use super::types::{CompletionRequest, LLMResponse};
use tracing::debug;

pub struct GeminiProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.filter(|k| !k.is_empty()).map(str::to_string),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }

    fn request_body(request: &CompletionRequest) -> Value {
        json!({
            "systemInstruction": {"parts": [{"text": request.system}]},
            "contents": [{"role": "user", "parts": [{"text": request.user}]}],
            "generationConfig": {
                "maxOutputTokens": request.max_tokens,
                "temperature": request.temperature,
                "responseMimeType": "application/json",
            }
        })
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    async fn complete(&self, model: &str, request: &CompletionRequest) -> Result<LLMResponse, ProveError> {
        let api_key = self.api_key.as_deref()
            .ok_or_else(|| ProveError::ProviderNotConfigured("gemini requires GEMINI_API_KEY".into()))?;

        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        debug!(model, "Sending Gemini generateContent");

        let resp = self.client.post(&url)
            .header("x-goog-api-key", api_key)
            .json(&Self::request_body(request))
            .send()
            .await
            .map_err(|e| ProveError::Network(format!("Gemini request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(status_error("gemini", status, &text));
        }

        let data: Value = resp.json().await
            .map_err(|e| ProveError::LLMApi(format!("Parse error: {}", e)))?;

        if let Some(error) = data.get("error") {
            return Err(ProveError::LLMApi(error["message"].as_str().unwrap_or("Unknown").to_string()));
        }

        let content = non_empty("gemini", data["candidates"][0]["content"]["parts"][0]["text"].as_str())?;

        Ok(LLMResponse {
            content,
            input_tokens: data["usageMetadata"]["promptTokenCount"].as_u64(),
            output_tokens: data["usageMetadata"]["candidatesTokenCount"].as_u64(),
            model: model.to_string(),
        })
    }

    fn provider_name(&self) -> &str { "gemini" }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
