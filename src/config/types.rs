use std::path::PathBuf;
use serde::{Deserialize, Serialize};

/// On-disk YAML configuration. Every field is optional; anything left out
/// falls back to the environment, then to the built-in default.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct FileConfig {
    pub llm: Option<LLMConfig>,
    pub toolchain: Option<ToolchainConfig>,
    pub sandbox: Option<SandboxConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LLMConfig {
    pub provider: Option<String>,
    /// Ordered fallback list; the first entry is tried first.
    pub models: Option<Vec<String>>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ToolchainConfig {
    /// Explicit toolchain binary, probed before the platform candidates.
    pub binary: Option<String>,
    pub build_timeout_ms: Option<u64>,
    pub test_timeout_ms: Option<u64>,
    pub clean: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SandboxConfig {
    pub root: Option<String>,
    pub assets: Option<String>,
}

pub const DEFAULT_PROVIDER: &str = "gemini";
pub const DEFAULT_BUILD_TIMEOUT_MS: u64 = 120_000;
pub const DEFAULT_TEST_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Fully resolved settings for one audit.
#[derive(Debug, Clone)]
pub struct ProveConfig {
    pub provider: String,
    /// Empty means "use the provider catalog's model order".
    pub models: Vec<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub sandbox_root: PathBuf,
    pub assets_dir: PathBuf,
    pub forge_binary: Option<String>,
    pub build_timeout_ms: u64,
    pub test_timeout_ms: u64,
    pub clean_build: bool,
}

impl Default for ProveConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            models: Vec::new(),
            api_key: None,
            base_url: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            sandbox_root: PathBuf::from("./sandbox"),
            assets_dir: PathBuf::from("./assets"),
            forge_binary: None,
            build_timeout_ms: DEFAULT_BUILD_TIMEOUT_MS,
            test_timeout_ms: DEFAULT_TEST_TIMEOUT_MS,
            clean_build: true,
        }
    }
}

impl ProveConfig {
    pub fn mocks_dir(&self) -> PathBuf {
        self.assets_dir.join("mocks")
    }

    pub fn harness_template(&self) -> PathBuf {
        self.assets_dir.join("harness").join("Exploit.t.sol.tmpl")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prove_config_defaults() {
        let config = ProveConfig::default();
        assert_eq!(config.provider, "gemini");
        assert_eq!(config.test_timeout_ms, 60_000);
        assert!(config.models.is_empty());
        assert_eq!(config.harness_template(), PathBuf::from("./assets/harness/Exploit.t.sol.tmpl"));
    }

    #[test]
    fn test_file_config_partial_yaml() {
        let parsed: FileConfig = serde_yaml::from_str("llm:\n  provider: openai\n").unwrap();
        assert_eq!(parsed.llm.unwrap().provider.as_deref(), Some("openai"));
        assert!(parsed.toolchain.is_none());
    }
}
