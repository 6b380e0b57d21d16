//! HTTP transport: routing, handlers, middleware, and wire types.
//!
//! This layer stays thin. Handlers parse input, run the access gate, call
//! into [`crate::core`], and wrap the result in the response envelope;
//! business decisions all live below.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Wire payload types and the response envelope
pub mod dto;
/// Token-checking middleware for protected routes
pub mod middleware;
/// Route handlers grouped by resource
pub mod routes;
/// Router assembly and the server entry point
pub mod server;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Database handle, cheap to clone.
    pub db: DatabaseConnection,
    /// Secret used to verify access tokens.
    pub jwt_secret: Arc<String>,
}

impl AppState {
    /// Bundles the database and token secret into shared state.
    #[must_use]
    pub fn new(db: DatabaseConnection, jwt_secret: &str) -> Self {
        Self {
            db,
            jwt_secret: Arc::new(jwt_secret.to_string()),
        }
    }
}
