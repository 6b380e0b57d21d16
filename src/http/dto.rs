//! Wire payload types and the response envelope.
//!
//! Every successful response is wrapped in [`ApiResponse`]; failures use
//! [`crate::errors::ErrorBody`] via the error type's `IntoResponse`.
//! Request payloads mirror the entity field names, with the `type` column
//! surfacing as `type` on the wire.

use crate::entities::{budget, transaction, user};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Envelope around every successful response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// The payload.
    pub data: T,
    /// Optional human-readable note about what happened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// RFC 3339 timestamp of when the response was produced.
    pub timestamp: String,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wraps a payload with no message.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Wraps a payload with a note for the client.
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    /// Login email.
    pub email: String,
    /// Plaintext password, verified against the stored hash.
    pub password: String,
}

/// Payload returned by a successful login.
#[derive(Debug, Serialize)]
pub struct LoginData {
    /// Signed access token for the `Authorization: Bearer` header.
    pub token: String,
    /// The authenticated user's profile (password hash omitted).
    pub user: user::Model,
}

/// Body of `POST /api/requests`.
#[derive(Debug, Deserialize)]
pub struct CreateRequestPayload {
    /// Category label.
    #[serde(rename = "type")]
    pub request_type: String,
    /// Requested amount.
    pub amount: f64,
    /// Optional justification text.
    pub description: Option<String>,
}

/// Body of `PUT /api/requests/{id}`. Absent fields stay unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRequestPayload {
    /// New category label, if changing.
    #[serde(rename = "type")]
    pub request_type: Option<String>,
    /// New amount, if changing.
    pub amount: Option<f64>,
    /// New description, if changing.
    pub description: Option<String>,
}

/// Body of `PUT /api/requests/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusPayload {
    /// Target status in uppercase wire form, e.g. `"APPROVED"`.
    pub status: String,
    /// Fiscal year to settle a payment against; defaults to the current
    /// year. Ignored for non-payment transitions.
    pub year: Option<i32>,
}

/// Body of `PUT /api/budget/{year}`. Absent fields stay unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBudgetPayload {
    /// New total allocation.
    pub total_amount: Option<f64>,
    /// New remaining amount.
    pub remaining_amount: Option<f64>,
}

/// Body of `POST /api/budget/{year}/initialize`.
#[derive(Debug, Default, Deserialize)]
pub struct InitializeBudgetPayload {
    /// Ceiling for a newly created ledger; defaults to the system ceiling.
    pub amount: Option<f64>,
}

/// Query string of `GET /api/transactions`.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsQuery {
    /// Limit results to payments made in this fiscal year.
    pub year: Option<i32>,
}

/// Payload of the budget sufficiency check.
#[derive(Debug, Serialize)]
pub struct BudgetCheckData {
    /// The year that was checked.
    pub year: i32,
    /// The amount that was checked.
    pub amount: f64,
    /// Whether the remaining funds cover the amount.
    pub has_enough: bool,
    /// Funds currently remaining for the year; zero when no ledger exists.
    pub remaining: f64,
    /// How much is missing when `has_enough` is false, zero otherwise.
    pub shortfall: f64,
}

impl BudgetCheckData {
    /// Builds the check result from a ledger row (or its absence).
    #[must_use]
    pub fn evaluate(year: i32, amount: f64, ledger: Option<&budget::Model>) -> Self {
        let remaining = ledger.map_or(0.0, |b| b.remaining_amount);
        let has_enough = remaining >= amount;
        Self {
            year,
            amount,
            has_enough,
            remaining,
            shortfall: if has_enough { 0.0 } else { amount - remaining },
        }
    }
}

/// Payload of the transaction listing: rows plus a convenience count.
#[derive(Debug, Serialize)]
pub struct TransactionListData {
    /// The matching transactions, most recent payment first.
    pub items: Vec<transaction::Model>,
    /// Number of items returned.
    pub count: usize,
}

/// Payload of the liveness probe.
#[derive(Debug, Serialize)]
pub struct HealthData {
    /// Fixed `"healthy"` marker.
    pub status: &'static str,
    /// Crate version serving the request.
    pub version: &'static str,
}
