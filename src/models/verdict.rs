use serde::{Deserialize, Serialize};

/// Outcome of running the exploit harness against the toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationVerdict {
    /// The unprivileged call was accepted and the trailing assertion was reached.
    VulnerabilityConfirmed,
    /// The call reverted before the trailing assertion: access control held.
    FalsePositive,
    Inconclusive,
    /// The harness (or the contract it imports) did not compile.
    CompilationFailed,
}

/// Terminal classification of one audit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditVerdict {
    Secure,
    Critical,
    Unknown,
    Error,
}

impl From<VerificationVerdict> for AuditVerdict {
    fn from(v: VerificationVerdict) -> Self {
        match v {
            VerificationVerdict::VulnerabilityConfirmed => AuditVerdict::Critical,
            VerificationVerdict::FalsePositive => AuditVerdict::Secure,
            VerificationVerdict::Inconclusive | VerificationVerdict::CompilationFailed => AuditVerdict::Unknown,
        }
    }
}

impl std::fmt::Display for AuditVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Secure => write!(f, "SECURE"),
            Self::Critical => write!(f, "CRITICAL"),
            Self::Unknown => write!(f, "UNKNOWN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

impl std::fmt::Display for VerificationVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VulnerabilityConfirmed => write!(f, "VULNERABILITY_CONFIRMED"),
            Self::FalsePositive => write!(f, "FALSE_POSITIVE"),
            Self::Inconclusive => write!(f, "INCONCLUSIVE"),
            Self::CompilationFailed => write!(f, "COMPILATION_FAILED"),
        }
    }
}
