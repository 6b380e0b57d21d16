//! Audit trail business logic.
//!
//! Recording is fire-and-forget: a failed audit write is logged and
//! swallowed so the operation being audited never fails because of it. The
//! trail is append-only and nothing in the service reads it back.

use crate::entities::audit_log;
use sea_orm::{ConnectionTrait, Set, prelude::*};

/// A request was created as a draft.
pub const CREATE_REQUEST: &str = "CREATE_REQUEST";
/// A draft's fields were edited.
pub const UPDATE_REQUEST: &str = "UPDATE_REQUEST";
/// A draft was handed over for review.
pub const SUBMIT_REQUEST: &str = "SUBMIT_REQUEST";
/// A request moved to a new lifecycle status.
pub const UPDATE_STATUS: &str = "UPDATE_STATUS";
/// A draft was deleted.
pub const DELETE_REQUEST: &str = "DELETE_REQUEST";
/// Someone tried to read a request they are not allowed to see.
pub const UNAUTHORIZED_ACCESS: &str = "UNAUTHORIZED_ACCESS";

/// Appends one entry to the audit trail.
///
/// Failures are logged at `warn` and otherwise ignored; by contract this
/// never propagates an error into the operation it documents.
pub async fn record<C>(
    conn: &C,
    user_id: i64,
    action: &str,
    resource: &str,
    resource_id: Option<i64>,
    details: Option<serde_json::Value>,
    ip_address: Option<String>,
) where
    C: ConnectionTrait,
{
    let entry = audit_log::ActiveModel {
        user_id: Set(user_id),
        action: Set(action.to_string()),
        resource: Set(resource.to_string()),
        resource_id: Set(resource_id),
        details: Set(details),
        ip_address: Set(ip_address),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    if let Err(err) = entry.insert(conn).await {
        tracing::warn!("audit write failed for {action} on {resource}: {err}");
    }
}
