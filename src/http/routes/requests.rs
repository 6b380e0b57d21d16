//! Funding request endpoints.
//!
//! Handlers parse path and body input, run the access gate, delegate to
//! [`crate::core::request`], and append to the audit trail. Lifecycle rules
//! live in the core; nothing here decides whether a transition is legal.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{Datelike, Utc};
use serde_json::json;

use crate::core::access::{self, Ownership};
use crate::core::auth::Claims;
use crate::core::{audit, request as request_logic};
use crate::entities::{RequestStatus, Role, request};
use crate::errors::{Error, Result};
use crate::http::AppState;
use crate::http::dto::{
    ApiResponse, CreateRequestPayload, UpdateRequestPayload, UpdateStatusPayload,
};

/// `GET /api/requests`: the caller's own requests, or all of them for
/// managers and admins.
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<request::Model>>>> {
    let requests = if matches!(claims.role, Role::Admin | Role::Manager) {
        request_logic::list_all(&state.db).await?
    } else {
        request_logic::list_for_user(&state.db, claims.sub).await?
    };
    Ok(Json(ApiResponse::new(requests)))
}

/// `GET /api/requests/user/{user_id}`: one user's requests, for reviewers.
pub async fn list_for_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<request::Model>>>> {
    access::require_role(&claims, &[Role::Admin, Role::Manager])?;
    let user_id = access::parse_id(&user_id)?;

    let requests = request_logic::list_for_user(&state.db, user_id).await?;
    Ok(Json(ApiResponse::new(requests)))
}

/// `POST /api/requests`: create a DRAFT owned by the caller.
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateRequestPayload>,
) -> Result<(StatusCode, Json<ApiResponse<request::Model>>)> {
    access::require_role(&claims, &[Role::Beneficiary])?;

    let created = request_logic::create_request(
        &state.db,
        &claims,
        &payload.request_type,
        payload.amount,
        payload.description,
    )
    .await?;

    audit::record(
        &state.db,
        claims.sub,
        audit::CREATE_REQUEST,
        "Request",
        Some(created.id),
        None,
        None,
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(created, "Request created")),
    ))
}

/// `GET /api/requests/{id}`: request detail.
///
/// A beneficiary peeking at someone else's request gets a 403, and the
/// attempt itself lands in the audit trail.
pub async fn get(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<request::Model>>> {
    let id = access::parse_id(&id)?;
    let found = access::authorize_request(&state.db, &claims, id, &[], Ownership::Any, &[]).await?;

    if !access::can_view(&claims, &found) {
        audit::record(
            &state.db,
            claims.sub,
            audit::UNAUTHORIZED_ACCESS,
            "Request",
            Some(id),
            None,
            None,
        )
        .await;
        return Err(Error::Forbidden {
            message: "You do not have access to this request".to_string(),
        });
    }

    Ok(Json(ApiResponse::new(found)))
}

/// `PUT /api/requests/{id}`: edit a DRAFT's fields.
pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateRequestPayload>,
) -> Result<Json<ApiResponse<request::Model>>> {
    let id = access::parse_id(&id)?;
    let found = access::authorize_request(
        &state.db,
        &claims,
        id,
        &[Role::Beneficiary],
        Ownership::Owner,
        &[RequestStatus::Draft],
    )
    .await?;

    let updated = request_logic::update_fields(
        &state.db,
        found,
        payload.request_type,
        payload.amount,
        payload.description,
    )
    .await?;

    audit::record(
        &state.db,
        claims.sub,
        audit::UPDATE_REQUEST,
        "Request",
        Some(id),
        None,
        None,
    )
    .await;

    Ok(Json(ApiResponse::with_message(updated, "Request updated")))
}

/// `DELETE /api/requests/{id}`: remove a DRAFT.
///
/// The owner may delete their own draft; an admin may delete anyone's.
pub async fn remove(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    let id = access::parse_id(&id)?;
    let found = access::authorize_request(
        &state.db,
        &claims,
        id,
        &[],
        Ownership::OwnerOrAdmin,
        &[RequestStatus::Draft],
    )
    .await?;

    request_logic::delete_request(&state.db, found).await?;

    audit::record(
        &state.db,
        claims.sub,
        audit::DELETE_REQUEST,
        "Request",
        Some(id),
        None,
        None,
    )
    .await;

    Ok(Json(ApiResponse::with_message((), "Request deleted")))
}

/// `PUT /api/requests/{id}/submit`: hand a DRAFT over for review.
pub async fn submit(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<request::Model>>> {
    let id = access::parse_id(&id)?;
    access::authorize_request(
        &state.db,
        &claims,
        id,
        &[Role::Beneficiary],
        Ownership::Owner,
        &[RequestStatus::Draft],
    )
    .await?;

    let submitted = request_logic::transition_status(
        &state.db,
        id,
        RequestStatus::Submitted,
        &claims,
        Utc::now().year(),
    )
    .await?;

    audit::record(
        &state.db,
        claims.sub,
        audit::SUBMIT_REQUEST,
        "Request",
        Some(id),
        None,
        None,
    )
    .await;

    Ok(Json(ApiResponse::with_message(submitted, "Request submitted")))
}

/// `PUT /api/requests/{id}/status`: walk one lifecycle edge.
///
/// The body names the target status; payments may also name the fiscal year
/// to settle against, defaulting to the current one.
pub async fn update_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<Json<ApiResponse<request::Model>>> {
    let id = access::parse_id(&id)?;
    let new_status: RequestStatus = payload.status.parse()?;

    let before = access::authorize_request(
        &state.db,
        &claims,
        id,
        &[Role::Manager, Role::Admin],
        Ownership::Any,
        &[],
    )
    .await?;

    let fiscal_year = payload.year.unwrap_or_else(|| Utc::now().year());
    let updated =
        request_logic::transition_status(&state.db, id, new_status, &claims, fiscal_year).await?;

    audit::record(
        &state.db,
        claims.sub,
        audit::UPDATE_STATUS,
        "Request",
        Some(id),
        Some(json!({
            "old_status": before.status,
            "new_status": new_status,
        })),
        None,
    )
    .await;

    Ok(Json(ApiResponse::with_message(updated, "Status updated")))
}
