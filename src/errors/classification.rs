use super::types::ProveError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    /// Whether the model-fallback chain should move on to the next model.
    pub falls_back: bool,
}

impl ProveError {
    /// Classify this error to determine its type and whether the next model
    /// in the fallback chain should be tried.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Per-model failures: another model may succeed
            ProveError::LLMApi(_) => ErrorClassification {
                error_type: "LLMApiError",
                falls_back: true,
            },
            ProveError::Schema(_) => ErrorClassification {
                error_type: "SchemaError",
                falls_back: true,
            },
            ProveError::RateLimit(_) => ErrorClassification {
                error_type: "RateLimitError",
                falls_back: true,
            },
            ProveError::Network(_) => ErrorClassification {
                error_type: "NetworkError",
                falls_back: true,
            },
            ProveError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                falls_back: true,
            },
            ProveError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                falls_back: true,
            },
            ProveError::Authentication(_) => ErrorClassification {
                error_type: "AuthenticationError",
                falls_back: true,
            },

            // Deployment problems: identical for every model
            ProveError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                falls_back: false,
            },
            ProveError::ProviderNotConfigured(_) => ErrorClassification {
                error_type: "ProviderNotConfiguredError",
                falls_back: false,
            },

            // Not produced by providers, never retried
            ProveError::InvalidInput(_) => ErrorClassification {
                error_type: "InvalidInputError",
                falls_back: false,
            },
            ProveError::ToolchainNotFound(_) => ErrorClassification {
                error_type: "ToolchainNotFoundError",
                falls_back: false,
            },
            ProveError::Toolchain(_) => ErrorClassification {
                error_type: "ToolchainError",
                falls_back: false,
            },
            ProveError::Sanitization(_) => ErrorClassification {
                error_type: "SanitizationError",
                falls_back: false,
            },
            ProveError::Injection(_) => ErrorClassification {
                error_type: "InjectionError",
                falls_back: false,
            },
            ProveError::Io(_) => ErrorClassification {
                error_type: "IoError",
                falls_back: false,
            },
            ProveError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                falls_back: false,
            },
            ProveError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                falls_back: false,
            },
        }
    }

    /// Input errors are rejected before any external call is made.
    pub fn is_input_error(&self) -> bool {
        matches!(self, ProveError::InvalidInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_falls_back() {
        let err = ProveError::Schema("missing hypotheses".into());
        let class = err.classify();
        assert!(class.falls_back);
        assert_eq!(class.error_type, "SchemaError");
    }

    #[test]
    fn test_empty_response_falls_back() {
        let err = ProveError::LLMApi("empty response".into());
        assert!(err.classify().falls_back);
    }

    #[test]
    fn test_rate_limit_falls_back() {
        let err = ProveError::RateLimit("too many requests".into());
        assert!(err.classify().falls_back);
    }

    #[test]
    fn test_unconfigured_provider_does_not_fall_back() {
        let err = ProveError::ProviderNotConfigured("OPENAI_API_KEY not set".into());
        let class = err.classify();
        assert!(!class.falls_back);
        assert_eq!(class.error_type, "ProviderNotConfiguredError");
    }

    #[test]
    fn test_config_error_does_not_fall_back() {
        let err = ProveError::Config("unknown provider".into());
        assert!(!err.classify().falls_back);
    }

    #[test]
    fn test_input_error_detection() {
        assert!(ProveError::InvalidInput("missing code".into()).is_input_error());
        assert!(!ProveError::Internal("boom".into()).is_input_error());
    }
}
