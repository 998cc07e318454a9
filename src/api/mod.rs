pub mod errors;
pub mod models;
pub mod routes;

use std::sync::Arc;
use axum::Router;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::compiler::Toolchain;
use crate::config::ProveConfig;
use crate::errors::ProveError;
use crate::llm::{self, LLMProvider};
use crate::pipeline::PipelineOrchestrator;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProveConfig>,
    pub toolchain: Arc<Toolchain>,
    /// Overrides the provider normally built from `config` on each request.
    pub provider: Option<Arc<dyn LLMProvider>>,
    /// Every audit writes the same sandbox; one runs at a time.
    pub audit_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(config: ProveConfig) -> Self {
        let toolchain = Toolchain::shared(config.forge_binary.as_deref());
        Self {
            config: Arc::new(config),
            toolchain,
            provider: None,
            audit_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn with_toolchain(mut self, toolchain: Arc<Toolchain>) -> Self {
        self.toolchain = toolchain;
        self
    }

    pub fn with_provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Provider selection is resolved per audit, never mid-call.
    pub fn orchestrator(&self) -> Result<PipelineOrchestrator, ProveError> {
        let provider = match &self.provider {
            Some(p) => p.clone(),
            None => llm::create_provider(&self.config)?,
        };
        Ok(PipelineOrchestrator::new(&self.config, provider, self.toolchain.clone()))
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", axum::routing::get(routes::health::health_check))
        .route("/api/audit", axum::routing::post(routes::audit::run_audit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
