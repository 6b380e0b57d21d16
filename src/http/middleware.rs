//! Token-checking middleware for protected routes.
//!
//! Verifies the `Authorization: Bearer` token and stores the decoded
//! [`Claims`] in the request extensions, where handlers pick them up with
//! the `Extension` extractor.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::core::auth::{self, Claims};
use crate::errors::{Error, Result};
use crate::http::AppState;

/// Rejects requests without a valid bearer token.
///
/// # Errors
/// Returns [`Error::Unauthorized`] when the header is missing, not a bearer
/// token, or carries an expired or tampered token.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| Error::Unauthorized {
            message: "Missing authorization header".to_string(),
        })?;

    let token = header.strip_prefix("Bearer ").ok_or_else(|| Error::Unauthorized {
        message: "Authorization header must be a Bearer token".to_string(),
    })?;

    let claims: Claims = auth::decode_token(token, &state.jwt_secret)?;
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
