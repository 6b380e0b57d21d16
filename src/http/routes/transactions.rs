//! Payment history endpoints. Admin-only.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};

use crate::core::auth::Claims;
use crate::core::{access, transaction as transaction_logic};
use crate::entities::{Role, transaction};
use crate::errors::{Error, Result};
use crate::http::AppState;
use crate::http::dto::{ApiResponse, TransactionListData, TransactionsQuery};

/// `GET /api/transactions[?year=]`: payment history, newest first.
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Json<ApiResponse<TransactionListData>>> {
    access::require_role(&claims, &[Role::Admin])?;

    let items = transaction_logic::list(&state.db, query.year).await?;
    let count = items.len();
    Ok(Json(ApiResponse::new(TransactionListData { items, count })))
}

/// `GET /api/transactions/{id}`: one payment record.
pub async fn get(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<transaction::Model>>> {
    access::require_role(&claims, &[Role::Admin])?;
    let id = access::parse_id(&id)?;

    let found = transaction_logic::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Transaction".to_string(),
        })?;
    Ok(Json(ApiResponse::new(found)))
}
