//! Budget ledger endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::{Datelike, Utc};

use crate::core::auth::Claims;
use crate::core::{access, budget as budget_logic};
use crate::entities::{Role, budget};
use crate::errors::{Error, Result};
use crate::http::AppState;
use crate::http::dto::{
    ApiResponse, BudgetCheckData, InitializeBudgetPayload, UpdateBudgetPayload,
};

fn parse_year(raw: &str) -> Result<i32> {
    let year = raw.parse::<i32>().map_err(|_| Error::Validation {
        message: format!("Invalid year: {raw}"),
    })?;
    budget_logic::validate_year(year)?;
    Ok(year)
}

fn parse_amount(raw: &str) -> Result<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
        .ok_or_else(|| Error::Validation {
            message: format!("Invalid amount: {raw}"),
        })
}

/// `GET /api/budget/current`: this year's ledger, created on first touch.
pub async fn current(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<budget::Model>>> {
    access::require_role(&claims, &[Role::Admin, Role::Manager])?;

    let ledger = budget_logic::ensure_for_year(&state.db, Utc::now().year(), None).await?;
    Ok(Json(ApiResponse::new(ledger)))
}

/// `GET /api/budget/history`: every year's ledger, newest first.
pub async fn history(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<budget::Model>>>> {
    access::require_role(&claims, &[Role::Admin])?;

    let ledgers = budget_logic::history(&state.db).await?;
    Ok(Json(ApiResponse::new(ledgers)))
}

/// `GET /api/budget/{year}`: one year's ledger, 404 when absent.
pub async fn by_year(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(year): Path<String>,
) -> Result<Json<ApiResponse<budget::Model>>> {
    access::require_role(&claims, &[Role::Admin, Role::Manager])?;
    let year = parse_year(&year)?;

    let ledger = budget_logic::find_by_year(&state.db, year)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Budget".to_string(),
        })?;
    Ok(Json(ApiResponse::new(ledger)))
}

/// `GET /api/budget/{year}/check/{amount}`: can the year cover the amount?
///
/// Pure read: reports remaining funds and any shortfall without touching
/// the ledger.
pub async fn check(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((year, amount)): Path<(String, String)>,
) -> Result<Json<ApiResponse<BudgetCheckData>>> {
    access::require_role(&claims, &[Role::Admin, Role::Manager])?;
    let year = parse_year(&year)?;
    let amount = parse_amount(&amount)?;

    let ledger = budget_logic::find_by_year(&state.db, year).await?;
    Ok(Json(ApiResponse::new(BudgetCheckData::evaluate(
        year,
        amount,
        ledger.as_ref(),
    ))))
}

/// `PUT /api/budget/{year}`: admin set of total and/or remaining amounts.
pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(year): Path<String>,
    Json(payload): Json<UpdateBudgetPayload>,
) -> Result<Json<ApiResponse<budget::Model>>> {
    access::require_role(&claims, &[Role::Admin])?;
    let year = parse_year(&year)?;

    let ledger = budget_logic::update_amounts(
        &state.db,
        year,
        payload.total_amount,
        payload.remaining_amount,
    )
    .await?;
    Ok(Json(ApiResponse::with_message(ledger, "Budget updated")))
}

/// `POST /api/budget/{year}/initialize`: create the year's ledger if it
/// does not exist yet. An existing ledger is returned untouched.
pub async fn initialize(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(year): Path<String>,
    Json(payload): Json<InitializeBudgetPayload>,
) -> Result<Json<ApiResponse<budget::Model>>> {
    access::require_role(&claims, &[Role::Admin])?;
    let year = parse_year(&year)?;

    let ledger = budget_logic::ensure_for_year(&state.db, year, payload.amount).await?;
    Ok(Json(ApiResponse::with_message(ledger, "Budget initialized")))
}
