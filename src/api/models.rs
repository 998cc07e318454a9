use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::errors::ProveError;

#[derive(Debug, Deserialize)]
pub struct AuditRequest {
    pub code: String,
}

impl AuditRequest {
    /// Field-level validation with messages that name what is wrong, instead
    /// of a generic deserialisation failure.
    pub fn from_value(body: &Value) -> Result<Self, ProveError> {
        let code = match body.get("code") {
            None | Some(Value::Null) => return Err(ProveError::InvalidInput("missing required field 'code'".into())),
            Some(Value::String(s)) => s,
            Some(_) => return Err(ProveError::InvalidInput("'code' must be a string".into())),
        };
        if code.trim().is_empty() {
            return Err(ProveError::InvalidInput("'code' must not be empty".into()));
        }
        Ok(Self { code: code.clone() })
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}
