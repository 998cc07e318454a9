pub mod analysis;
pub mod api;
pub mod audit;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod errors;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod sanitizer;
pub mod verifier;

pub use errors::ProveError;
pub use models::{AuditResult, AuditVerdict};
pub use pipeline::PipelineOrchestrator;
