//! Server configuration and startup.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::routes;
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(routes::health::health_check))
        // Portfolios
        .route(
            "/portfolios",
            get(routes::portfolios::list).post(routes::portfolios::create),
        )
        .route("/portfolios/{name}", get(routes::portfolios::get))
        // Risk
        .route("/risk/latest", get(routes::risk::latest))
        .route("/risk/calc", post(routes::risk::calculate))
        // Middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Log filter: `--verbose` forces debug, otherwise `RUST_LOG`, otherwise info.
pub fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug,tower_http=debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"))
}

/// Run the server.
pub async fn run_server(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("RiskOps API Server listening on http://{}", addr);
    tracing::info!("API endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  GET  /portfolios");
    tracing::info!("  POST /portfolios");
    tracing::info!("  GET  /portfolios/{{name}}");
    tracing::info!("  GET  /risk/latest?portfolio=");
    tracing::info!("  POST /risk/calc");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Shutdown signal handler.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down...");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_log_filter() {
        assert!(log_filter(true).to_string().contains("debug"));
    }
}
