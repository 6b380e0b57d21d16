//! Unified error types and result handling.
//!
//! Every fallible operation in the crate returns [`Result`]. The HTTP layer
//! converts [`Error`] values into JSON error envelopes via [`IntoResponse`],
//! so handlers can propagate failures with `?` and still produce a
//! well-formed wire response.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use crate::entities::request::RequestStatus;
use crate::entities::user::Role;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All error conditions the service can surface.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration is missing or malformed (startup only).
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong with the configuration.
        message: String,
    },

    /// Request payload or path parameter failed validation.
    #[error("{message}")]
    Validation {
        /// Human-readable description of the failed check.
        message: String,
    },

    /// Missing or unusable credentials.
    #[error("{message}")]
    Unauthorized {
        /// Why authentication failed.
        message: String,
    },

    /// Authenticated, but not allowed to touch this resource.
    #[error("{message}")]
    Forbidden {
        /// Why access was denied.
        message: String,
    },

    /// Authenticated, but the caller's role is not in the allow-set.
    #[error("Role {role} is not permitted to perform this operation")]
    Role {
        /// The caller's role.
        role: Role,
    },

    /// The target resource does not exist.
    #[error("{resource} not found")]
    NotFound {
        /// Name of the missing resource kind, e.g. "Request".
        resource: String,
    },

    /// The request is not in a status that permits the operation.
    #[error("Request is {current}; operation requires status {required}")]
    InvalidStatus {
        /// Status the request is currently in.
        current: RequestStatus,
        /// Statuses that would have permitted the operation.
        required: String,
    },

    /// The requested status change is not an edge of the lifecycle.
    #[error("Cannot change status from {from} to {to}")]
    InvalidTransition {
        /// Status the request is currently in.
        from: RequestStatus,
        /// Status the caller asked for.
        to: RequestStatus,
    },

    /// The yearly budget cannot cover the payment.
    #[error("Insufficient budget: {remaining:.2} remaining, {requested:.2} requested")]
    InsufficientBudget {
        /// Funds left in the ledger for the year.
        remaining: f64,
        /// Amount the payment would have debited.
        requested: f64,
    },

    /// Underlying `SeaORM` / database failure.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure (socket bind, file access).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unexpected internal failure that is not the caller's fault.
    #[error("Internal error: {message}")]
    Internal {
        /// Diagnostic detail, logged but never sent to clients.
        message: String,
    },
}

/// Wire shape of a failed response.
///
/// Mirrors the success envelope in [`crate::http::dto`] with `success: false`
/// and a stable machine-readable `code` alongside the human message.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Human-readable description, safe to show to end users.
    pub error: String,
    /// Stable machine-readable error code.
    pub code: &'static str,
    /// RFC 3339 timestamp of when the error was produced.
    pub timestamp: String,
}

impl Error {
    /// Stable machine-readable code for the wire envelope.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::Role { .. } => "ROLE_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidStatus { .. } => "INVALID_STATUS",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::InsufficientBudget { .. } => "INSUFFICIENT_BUDGET",
            Self::Config { .. } | Self::Database(_) | Self::Io(_) | Self::Internal { .. } => {
                "INTERNAL_ERROR"
            }
        }
    }

    /// HTTP status the error maps to.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. }
            | Self::InvalidStatus { .. }
            | Self::InvalidTransition { .. }
            | Self::InsufficientBudget { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } | Self::Role { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal failures get logged with full detail but surface a
        // generic message, so database errors never leak to clients.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("internal error: {self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            success: false,
            error: message,
            code: self.code(),
            timestamp: Utc::now().to_rfc3339(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        let err = Error::Validation {
            message: "amount must be positive".to_string(),
        };
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = Error::InsufficientBudget {
            remaining: 100.0,
            requested: 250.0,
        };
        assert_eq!(err.code(), "INSUFFICIENT_BUDGET");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = Error::Role {
            role: Role::Beneficiary,
        };
        assert_eq!(err.code(), "ROLE_ERROR");
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_internal_errors_hide_detail_from_clients() {
        let err = Error::Database(sea_orm::DbErr::Custom("connection refused".to_string()));
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_transition_error_names_both_statuses() {
        let err = Error::InvalidTransition {
            from: RequestStatus::Draft,
            to: RequestStatus::Paid,
        };
        assert_eq!(err.to_string(), "Cannot change status from DRAFT to PAID");
    }
}
