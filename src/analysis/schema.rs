use std::sync::LazyLock;
use jsonschema::JSONSchema;
use serde::Deserialize;
use serde_json::{json, Value};
use crate::errors::ProveError;
use crate::models::{VulnerabilityHypothesis, VulnerabilityType};

pub static HYPOTHESIS_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "required": ["hypotheses"],
        "properties": {
            "hypotheses": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["target", "vulnerabilityType", "confidence", "reasoning"],
                    "properties": {
                        "target": { "type": "string", "minLength": 1, "pattern": "\\S" },
                        "vulnerabilityType": { "type": "string" },
                        "confidence": { "type": "number", "minimum": 0, "maximum": 100 },
                        "reasoning": { "type": "string" }
                    }
                }
            }
        }
    })
});

static COMPILED: LazyLock<Result<JSONSchema, String>> = LazyLock::new(|| {
    JSONSchema::compile(&HYPOTHESIS_SCHEMA).map_err(|e| e.to_string())
});

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResponse {
    hypotheses: Vec<RawHypothesis>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHypothesis {
    target: String,
    vulnerability_type: String,
    confidence: f64,
    reasoning: String,
}

/// Validate a parsed reply against the hypothesis schema. The whole reply is
/// rejected on any violation; nothing is partially accepted.
pub fn validate(value: &Value) -> Result<(), ProveError> {
    let compiled = COMPILED.as_ref()
        .map_err(|e| ProveError::Internal(format!("Hypothesis schema failed to compile: {}", e)))?;

    if let Err(errors) = compiled.validate(value) {
        let messages: Vec<String> = errors
            .map(|e| format!("{} at {}", e, e.instance_path))
            .collect();
        return Err(ProveError::Schema(messages.join("; ")));
    }
    Ok(())
}

/// Validate, then normalize into typed hypotheses. The model's ranking is
/// kept as is: index 0 is the hypothesis it put first, whatever its
/// confidence number says.
pub fn parse_hypotheses(value: Value) -> Result<Vec<VulnerabilityHypothesis>, ProveError> {
    validate(&value)?;
    let raw: RawResponse = serde_json::from_value(value)
        .map_err(|e| ProveError::Schema(format!("Hypothesis shape mismatch: {}", e)))?;

    let hypotheses: Vec<VulnerabilityHypothesis> = raw.hypotheses
        .into_iter()
        .map(|h| VulnerabilityHypothesis {
            target: normalize_target(&h.target),
            vulnerability_type: VulnerabilityType::normalize(&h.vulnerability_type),
            confidence: h.confidence.round().clamp(0.0, 100.0) as u8,
            reasoning: h.reasoning,
        })
        .collect();

    Ok(hypotheses)
}

/// Models often write `withdraw()` or `Vault.withdraw`; keep only the bare
/// name. Whatever remains is still checked as an identifier by the verifier.
fn normalize_target(raw: &str) -> String {
    let name = raw.trim();
    let name = name.split('(').next().unwrap_or(name);
    let name = name.rsplit('.').next().unwrap_or(name);
    name.trim().to_string()
}
