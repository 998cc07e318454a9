pub mod parser;
pub mod schema;
pub mod types;

pub use types::*;
pub use parser::{parse_config, parse_config_str};

use std::path::{Path, PathBuf};
use crate::errors::ProveError;
use crate::llm::catalog;
use tracing::debug;

/// Resolve a credential value. If the value starts with '$', treat it as an
/// environment variable reference and resolve from the environment.
pub fn resolve_credential(value: &str) -> String {
    if let Some(var_name) = value.strip_prefix('$') {
        match std::env::var(var_name) {
            Ok(resolved) => {
                debug!(var = %var_name, "Resolved credential from environment");
                resolved
            }
            Err(_) => {
                debug!(var = %var_name, "Environment variable not set, using literal");
                value.to_string()
            }
        }
    } else {
        value.to_string()
    }
}

/// Redact sensitive values in a string. Replaces known credential patterns
/// with [REDACTED].
pub fn redact_credentials(text: &str, secrets: &[&str]) -> String {
    let mut result = text.to_string();
    for secret in secrets {
        if !secret.is_empty() && secret.len() >= 4 {
            result = result.replace(secret, "[REDACTED]");
        }
    }
    result
}

impl ProveConfig {
    /// Load the optional YAML file and overlay the process environment.
    pub async fn load(path: Option<&Path>) -> Result<Self, ProveError> {
        let file = match path {
            Some(p) => parse_config(p).await?,
            None => FileConfig::default(),
        };
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Precedence: environment, then file, then defaults. `env` is injected
    /// so resolution can be tested without touching the process environment.
    pub fn resolve<F>(file: FileConfig, env: F) -> Result<Self, ProveError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ProveConfig::default();
        let llm = file.llm.unwrap_or_default();
        let toolchain = file.toolchain.unwrap_or_default();
        let sandbox = file.sandbox.unwrap_or_default();
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let provider = env("PROVEBOT_PROVIDER")
            .or(llm.provider)
            .unwrap_or(defaults.provider)
            .to_lowercase();
        let info = catalog::get_provider(&provider)
            .ok_or_else(|| ProveError::Config(format!("Unknown LLM provider: {}", provider)))?;

        let models = match env("PROVEBOT_MODELS") {
            Some(list) => list
                .split(',')
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect(),
            None => llm.models.unwrap_or_default(),
        };

        let api_key = llm
            .api_key
            .map(|k| resolve_credential(&k))
            .filter(|k| !k.starts_with('$'))
            .or_else(|| (!info.env_var.is_empty()).then(|| env(info.env_var)).flatten());

        let parse_ms = |key: &str, fallback: u64| -> Result<u64, ProveError> {
            match env(key) {
                Some(v) => v.trim().parse::<u64>()
                    .map_err(|_| ProveError::Config(format!("{} must be an integer, got '{}'", key, v))),
                None => Ok(fallback),
            }
        };

        Ok(Self {
            provider,
            models,
            api_key,
            base_url: env("PROVEBOT_BASE_URL").or(llm.base_url),
            temperature: llm.temperature.unwrap_or(defaults.temperature),
            max_tokens: llm.max_tokens.unwrap_or(defaults.max_tokens),
            sandbox_root: env("PROVEBOT_SANDBOX").or(sandbox.root).map(PathBuf::from).unwrap_or(defaults.sandbox_root),
            assets_dir: env("PROVEBOT_ASSETS").or(sandbox.assets).map(PathBuf::from).unwrap_or(defaults.assets_dir),
            forge_binary: env("PROVEBOT_FORGE").or(toolchain.binary),
            build_timeout_ms: parse_ms(
                "PROVEBOT_BUILD_TIMEOUT_MS",
                toolchain.build_timeout_ms.unwrap_or(defaults.build_timeout_ms),
            )?,
            test_timeout_ms: parse_ms(
                "PROVEBOT_TEST_TIMEOUT_MS",
                toolchain.test_timeout_ms.unwrap_or(defaults.test_timeout_ms),
            )?,
            clean_build: toolchain.clean.unwrap_or(defaults.clean_build),
        })
    }

    /// Ordered model list for the configured provider.
    pub fn model_chain(&self) -> Vec<String> {
        if !self.models.is_empty() {
            return self.models.clone();
        }
        catalog::get_provider(&self.provider)
            .map(|p| p.models.iter().map(|m| m.id.to_string()).collect())
            .unwrap_or_default()
    }

    /// Secrets that must never appear in a transcript.
    pub fn secrets(&self) -> Vec<&str> {
        self.api_key.as_deref().into_iter().collect()
    }
}
