pub mod orchestrator;
pub mod stage;

pub use orchestrator::PipelineOrchestrator;
pub use stage::{Stage, STAGES};
