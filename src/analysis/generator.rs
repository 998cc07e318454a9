use std::sync::Arc;
use crate::config::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::errors::ProveError;
use crate::llm::LLMProvider;
use crate::models::{AnalysisResponse, ModelAttempt, VulnerabilityHypothesis};
use super::{extract, prompt, schema};
use tracing::{info, warn};

/// Asks one provider for ranked hypotheses, walking an ordered model list
/// until a model returns a schema-valid reply.
pub struct HypothesisGenerator {
    provider: Arc<dyn LLMProvider>,
    models: Vec<String>,
    temperature: f32,
    max_tokens: u32,
}

impl HypothesisGenerator {
    pub fn new(provider: Arc<dyn LLMProvider>, models: Vec<String>) -> Self {
        Self {
            provider,
            models,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Attempts are strictly sequential: at most one request is in flight.
    pub async fn analyze(&self, source_code: &str) -> AnalysisResponse {
        if self.models.is_empty() {
            return AnalysisResponse {
                error: Some(format!("No models configured for {}", self.provider_name())),
                ..Default::default()
            };
        }

        let request = prompt::build_request(source_code, self.temperature, self.max_tokens);
        let mut attempts = Vec::with_capacity(self.models.len());
        let mut last_error = None;

        for (idx, model) in self.models.iter().enumerate() {
            info!(provider = self.provider_name(), model = %model, attempt = idx + 1, "Requesting hypotheses");

            match self.attempt(model, &request).await {
                Ok(hypotheses) => {
                    info!(model = %model, count = hypotheses.len(), "Hypotheses accepted");
                    attempts.push(ModelAttempt { model: model.clone(), error: None });
                    return AnalysisResponse {
                        hypotheses,
                        success: true,
                        error: None,
                        attempts,
                    };
                }
                Err(e) => {
                    let classification = e.classify();
                    warn!(
                        model = %model,
                        error_type = classification.error_type,
                        error = %e,
                        "Model attempt failed"
                    );
                    attempts.push(ModelAttempt { model: model.clone(), error: Some(e.to_string()) });
                    let stop = !classification.falls_back;
                    last_error = Some(e);
                    if stop {
                        break;
                    }
                }
            }
        }

        let error = match last_error {
            Some(e) => format!("All {} model attempt(s) failed; last error: {}", attempts.len(), e),
            None => "No model attempt was made".to_string(),
        };
        AnalysisResponse {
            hypotheses: Vec::new(),
            success: false,
            error: Some(error),
            attempts,
        }
    }

    async fn attempt(
        &self,
        model: &str,
        request: &crate::llm::CompletionRequest,
    ) -> Result<Vec<VulnerabilityHypothesis>, ProveError> {
        let response = self.provider.complete(model, request).await?;
        let value = extract::extract_json_object(&response.content)?;
        schema::parse_hypotheses(value)
    }
}
