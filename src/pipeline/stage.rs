use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Sanitize,
    Compile,
    Analyze,
    Verify,
    Verdict,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sanitize => "SANITIZE",
            Self::Compile => "COMPILE",
            Self::Analyze => "ANALYZE",
            Self::Verify => "VERIFY",
            Self::Verdict => "VERDICT",
        }
    }

    /// 1-based position in [`STAGES`].
    pub fn ordinal(&self) -> usize {
        STAGES.iter().position(|s| s.stage == *self).map(|i| i + 1).unwrap_or(0)
    }

    pub fn definition(&self) -> &'static StageDefinition {
        &STAGES[self.ordinal() - 1]
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct StageDefinition {
    pub stage: Stage,
    pub display_name: &'static str,
}

pub static STAGES: &[StageDefinition] = &[
    StageDefinition {
        stage: Stage::Sanitize,
        display_name: "Import Sanitization",
    },
    StageDefinition {
        stage: Stage::Compile,
        display_name: "Compilation",
    },
    StageDefinition {
        stage: Stage::Analyze,
        display_name: "Hypothesis Generation",
    },
    StageDefinition {
        stage: Stage::Verify,
        display_name: "Exploit Verification",
    },
    StageDefinition {
        stage: Stage::Verdict,
        display_name: "Verdict",
    },
];
