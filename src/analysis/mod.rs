//! AI hypothesis generation: prompt construction, reply extraction, schema
//! validation and the model-fallback chain.

pub mod extract;
pub mod generator;
pub mod prompt;
pub mod schema;

pub use generator::HypothesisGenerator;
