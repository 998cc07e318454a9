use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::verdict::{AuditVerdict, VerificationVerdict};

/// One resolved import substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportMapping {
    pub original: String,
    pub mocked: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizationResult {
    pub code: String,
    pub remapped_imports: Vec<ImportMapping>,
    pub removed_imports: Vec<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilationResult {
    pub success: bool,
    pub logs: String,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
    #[serde(default)]
    pub timed_out: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exploit_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InjectionResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self { success: false, error: Some(error.into()), ..Default::default() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub verdict: VerificationVerdict,
    pub target_function: String,
    pub exploit_succeeded: bool,
    pub test_output: String,
    pub duration_ms: u64,
}

/// The only entity exposed across the system boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditResult {
    pub logs: String,
    pub verdict: AuditVerdict,
}
