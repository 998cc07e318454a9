use serde::{Deserialize, Serialize};

/// Closed set of vulnerability classes a hypothesis can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VulnerabilityType {
    AccessControl,
    Reentrancy,
    Overflow,
    Other,
}

impl VulnerabilityType {
    /// Map free text from a model onto the closed set. Matching ignores case
    /// and every non-alphanumeric character; anything unrecognised is `Other`.
    pub fn normalize(raw: &str) -> Self {
        let key: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        match key.as_str() {
            "ACCESSCONTROL" | "MISSINGACCESSCONTROL" | "BROKENACCESSCONTROL" => Self::AccessControl,
            "REENTRANCY" | "REENTRANT" => Self::Reentrancy,
            "OVERFLOW" | "UNDERFLOW" | "INTEGEROVERFLOW" | "INTEGERUNDERFLOW" => Self::Overflow,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessControl => "ACCESS_CONTROL",
            Self::Reentrancy => "REENTRANCY",
            Self::Overflow => "OVERFLOW",
            Self::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for VulnerabilityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An AI-proposed target function, unverified until run through the verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VulnerabilityHypothesis {
    pub target: String,
    pub vulnerability_type: VulnerabilityType,
    /// 0..=100
    pub confidence: u8,
    pub reasoning: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    /// Index 0 is the primary hypothesis.
    pub hypotheses: Vec<VulnerabilityHypothesis>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Models tried, in order, with the outcome of each attempt.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attempts: Vec<ModelAttempt>,
}

impl AnalysisResponse {
    pub fn primary(&self) -> Option<&VulnerabilityHypothesis> {
        self.hypotheses.first()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelAttempt {
    pub model: String,
    /// `None` when the attempt produced a valid response.
    pub error: Option<String>,
}
