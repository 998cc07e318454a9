pub struct ProviderInfo {
    pub id: &'static str,
    pub name: &'static str,
    /// Empty for keyless providers.
    pub env_var: &'static str,
    pub backend: &'static str,
    pub base_url: Option<&'static str>,
    /// Default fallback order, best first.
    pub models: &'static [ModelInfo],
}

pub struct ModelInfo {
    pub id: &'static str,
    pub label: &'static str,
}

impl ProviderInfo {
    pub fn requires_key(&self) -> bool {
        !self.env_var.is_empty()
    }
}

pub static PROVIDERS: &[ProviderInfo] = &[
    ProviderInfo {
        id: "gemini",
        name: "Google Gemini",
        env_var: "GEMINI_API_KEY",
        backend: "gemini",
        base_url: None,
        models: &[
            ModelInfo { id: "gemini-2.5-flash", label: "Gemini 2.5 Flash" },
            ModelInfo { id: "gemini-2.0-flash", label: "Gemini 2.0 Flash" },
            ModelInfo { id: "gemini-2.5-pro", label: "Gemini 2.5 Pro" },
        ],
    },
    ProviderInfo {
        id: "openai",
        name: "OpenAI",
        env_var: "OPENAI_API_KEY",
        backend: "openai",
        base_url: Some("https://api.openai.com/v1"),
        models: &[
            ModelInfo { id: "gpt-4o-mini", label: "GPT-4o Mini" },
            ModelInfo { id: "gpt-4o", label: "GPT-4o" },
        ],
    },
    ProviderInfo {
        id: "anthropic",
        name: "Anthropic",
        env_var: "ANTHROPIC_API_KEY",
        backend: "anthropic",
        base_url: None,
        models: &[
            ModelInfo { id: "claude-sonnet-4-5-20250929", label: "Claude 4.5 Sonnet" },
            ModelInfo { id: "claude-3-5-haiku-20241022", label: "Claude 3.5 Haiku" },
        ],
    },
    ProviderInfo {
        id: "openrouter",
        name: "OpenRouter",
        env_var: "OPENROUTER_API_KEY",
        backend: "openai_compatible",
        base_url: Some("https://openrouter.ai/api/v1"),
        models: &[
            ModelInfo { id: "deepseek/deepseek-chat-v3-0324:free", label: "DeepSeek V3 (free)" },
            ModelInfo { id: "meta-llama/llama-3.3-70b-instruct:free", label: "Llama 3.3 70B (free)" },
            ModelInfo { id: "google/gemini-2.5-flash", label: "Gemini 2.5 Flash" },
        ],
    },
    ProviderInfo {
        id: "local",
        name: "Local / Ollama",
        env_var: "",
        backend: "openai_compatible",
        base_url: Some("http://localhost:11434/v1"),
        models: &[
            ModelInfo { id: "qwen2.5-coder:7b", label: "Qwen 2.5 Coder 7B" },
            ModelInfo { id: "llama3.1:8b", label: "Llama 3.1 8B" },
        ],
    },
];

pub fn get_provider(id: &str) -> Option<&'static ProviderInfo> {
    PROVIDERS.iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_provider_has_models() {
        for p in PROVIDERS {
            assert!(!p.models.is_empty(), "{} has no models", p.id);
        }
    }

    #[test]
    fn test_local_is_keyless() {
        assert!(!get_provider("local").unwrap().requires_key());
        assert!(get_provider("openai").unwrap().requires_key());
    }

    #[test]
    fn test_unknown_provider() {
        assert!(get_provider("skynet").is_none());
    }
}
