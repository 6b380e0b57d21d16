//! Authentication endpoint.

use axum::{Json, extract::State};
use tracing::info;

use crate::core::auth;
use crate::errors::Result;
use crate::http::AppState;
use crate::http::dto::{ApiResponse, LoginData, LoginPayload};

/// `POST /api/auth/login`: exchange credentials for an access token.
///
/// Unknown emails and wrong passwords both produce the same 401 so the
/// endpoint cannot be used to enumerate accounts.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<ApiResponse<LoginData>>> {
    let (token, user) =
        auth::login(&state.db, &payload.email, &payload.password, &state.jwt_secret).await?;

    info!("login for {} ({})", user.email, user.role);
    Ok(Json(ApiResponse::new(LoginData { token, user })))
}
