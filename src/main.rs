use clap::Parser;
use provebot::cli::{self, audit::verdict_exit_code};
use provebot::errors::ProveError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let config = cli.config.as_deref();
    let result: Result<i32, ProveError> = match cli.command {
        cli::Commands::Serve(args) => cli::serve::handle_serve(args, config).await.map(|_| 0),
        cli::Commands::Audit(args) => cli::audit::handle_audit(args, config).await.map(verdict_exit_code),
        cli::Commands::Sanitize(args) => cli::audit::handle_sanitize(args).await.map(|_| 0),
        cli::Commands::Doctor => cli::doctor::handle_doctor(config).await.map(|_| 0),
        cli::Commands::Providers => {
            cli::doctor::handle_providers(config).await;
            Ok(0)
        }
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            let exit_code = match &e {
                ProveError::Config(_) | ProveError::Yaml(_) => 2,
                ProveError::ToolchainNotFound(_) | ProveError::Toolchain(_) => 3,
                ProveError::ProviderNotConfigured(_) | ProveError::Authentication(_) => 4,
                ProveError::InvalidInput(_) | ProveError::Sanitization(_) => 5,
                _ => 1,
            };
            std::process::exit(exit_code);
        }
    }
}
