use axum::Json;
use crate::api::models::HealthResponse;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "provebot",
        version: env!("CARGO_PKG_VERSION"),
    })
}
