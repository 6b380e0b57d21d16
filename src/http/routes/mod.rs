//! Route handlers grouped by resource.

pub mod auth;
pub mod budget;
pub mod health;
pub mod requests;
pub mod transactions;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::http::AppState;
use crate::http::middleware::require_auth;

/// Assembles the full API router.
///
/// Everything except the login and health endpoints sits behind the bearer
/// token middleware.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        // Funding requests
        .route(
            "/api/requests",
            get(requests::list).post(requests::create),
        )
        .route("/api/requests/user/:user_id", get(requests::list_for_user))
        .route(
            "/api/requests/:id",
            get(requests::get)
                .put(requests::update)
                .delete(requests::remove),
        )
        .route("/api/requests/:id/submit", put(requests::submit))
        .route("/api/requests/:id/status", put(requests::update_status))
        // Budget ledger
        .route("/api/budget/current", get(budget::current))
        .route("/api/budget/history", get(budget::history))
        .route(
            "/api/budget/:year",
            get(budget::by_year).put(budget::update),
        )
        .route("/api/budget/:year/check/:amount", get(budget::check))
        .route("/api/budget/:year/initialize", post(budget::initialize))
        // Payment history
        .route("/api/transactions", get(transactions::list))
        .route("/api/transactions/:id", get(transactions::get))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/auth/login", post(auth::login))
        .merge(protected)
        .with_state(state)
}
