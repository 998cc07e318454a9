pub mod audit;
pub mod commands;
pub mod doctor;
pub mod serve;

pub use commands::{Cli, Commands};
