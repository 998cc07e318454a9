use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProveError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Toolchain not found: {0}")]
    ToolchainNotFound(String),

    #[error("Toolchain error: {0}")]
    Toolchain(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: {0}")]
    RateLimit(String),

    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Response schema error: {0}")]
    Schema(String),

    #[error("Sanitization error: {0}")]
    Sanitization(String),

    #[error("Harness injection error: {0}")]
    Injection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
