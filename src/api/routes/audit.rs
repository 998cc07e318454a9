use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use crate::api::models::AuditRequest;
use crate::api::AppState;
use crate::errors::ProveError;
use crate::models::{AuditResult, AuditVerdict};
use tracing::{info, warn};

/// Pipeline failures are reported in the body as `ERROR`, not as an HTTP error.
pub async fn run_audit(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AuditResult>, ProveError> {
    let Json(body) = body.map_err(|e| ProveError::InvalidInput(format!("request body must be JSON: {}", e.body_text())))?;
    let request = AuditRequest::from_value(&body)?;

    let _guard = state.audit_lock.lock().await;
    info!(bytes = request.code.len(), "Audit started");

    let orchestrator = match state.orchestrator() {
        Ok(o) => o,
        Err(e) => {
            warn!(error = %e, "Pipeline could not be assembled");
            return Ok(Json(AuditResult {
                logs: format!("Pipeline could not be assembled: {}", e),
                verdict: AuditVerdict::Error,
            }));
        }
    };

    Ok(Json(orchestrator.run(&request.code).await))
}
