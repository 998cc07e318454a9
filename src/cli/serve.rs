use std::path::Path;
use crate::cli::commands::ServeArgs;
use crate::config::ProveConfig;
use crate::errors::ProveError;
use crate::api;
use tracing::info;

pub async fn handle_serve(args: ServeArgs, config_path: Option<&Path>) -> Result<(), ProveError> {
    let config = ProveConfig::load(config_path).await?;
    info!(
        host = %args.host,
        port = args.port,
        provider = %config.provider,
        sandbox = %config.sandbox_root.display(),
        "Starting API server"
    );

    let state = api::AppState::new(config);
    let app = api::build_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| ProveError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
