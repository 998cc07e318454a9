pub mod types;
pub mod classification;

pub use types::ProveError;
pub use classification::ErrorClassification;
