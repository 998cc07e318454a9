use std::path::PathBuf;
use clap::{Args, Parser, Subcommand};

pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

#[derive(Parser)]
#[command(
    name = "provebot",
    version,
    long_version = LONG_VERSION,
    about = "Prove missing access control in smart contracts by exploiting it"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP audit API
    Serve(ServeArgs),
    /// Audit one contract file
    Audit(AuditArgs),
    /// Print the sanitized source of a contract file
    Sanitize(SanitizeArgs),
    /// Check that the toolchain and provider are usable
    Doctor,
    /// List supported LLM providers
    Providers,
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(long, default_value = "8080")]
    pub port: u16,

    /// Listen address
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,
}

#[derive(Args, Clone)]
pub struct AuditArgs {
    /// Solidity source file
    pub file: PathBuf,

    /// Print the AuditResult as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct SanitizeArgs {
    /// Solidity source file
    pub file: PathBuf,

    /// Print the full SanitizationResult as JSON
    #[arg(long)]
    pub json: bool,
}
