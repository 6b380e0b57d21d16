//! Router assembly and the server entry point.

use axum::Router;
use sea_orm::DatabaseConnection;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::settings::AppConfig;
use crate::errors::{Error, Result};
use crate::http::AppState;
use crate::http::routes::create_router;

/// Builds the application router with tracing and permissive CORS.
///
/// The API is for an internal single-page client, so CORS is wide open
/// rather than origin-pinned.
pub fn build_app(state: AppState) -> Router {
    create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Binds the configured address and serves requests until shutdown.
///
/// # Errors
/// Returns an error if the bind address is malformed, the socket cannot be
/// bound, or the server loop fails.
pub async fn run_server(config: &AppConfig, db: DatabaseConnection) -> Result<()> {
    let state = AppState::new(db, &config.jwt_secret);
    let app = build_app(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| Error::Config {
            message: format!("Invalid bind address: {e}"),
        })?;

    tracing::info!("API server listening on {addr}");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
