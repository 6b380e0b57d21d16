//! Authorization gate for request-targeted operations.
//!
//! Every endpoint that operates on a single funding request runs the same
//! checks in the same order: the id must be well-formed, the request must
//! exist, the caller's role must be in the allow-set, ownership must hold,
//! and the request must be in an allowed status. The first failing check
//! wins, so a caller probing someone else's request learns it exists before
//! learning they cannot touch it, and never learns its status.

use crate::{
    core::auth::Claims,
    entities::{Request, RequestStatus, Role, request},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, prelude::*};

/// Who must own the request for the operation to proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Anyone passing the role check may act.
    Any,
    /// Only the request's owner may act.
    Owner,
    /// The owner may act, and admins may act on anyone's request.
    OwnerOrAdmin,
}

/// Parses a path parameter into a positive id.
///
/// # Errors
/// Returns [`Error::Validation`] for non-numeric or non-positive input.
pub fn parse_id(raw: &str) -> Result<i64> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| Error::Validation {
            message: format!("Invalid id: {raw}"),
        })
}

/// Checks that the caller's role is in the allow-set.
///
/// # Errors
/// Returns [`Error::Role`] naming the caller's role when it is not.
pub fn require_role(claims: &Claims, allowed: &[Role]) -> Result<()> {
    if allowed.contains(&claims.role) {
        Ok(())
    } else {
        Err(Error::Role { role: claims.role })
    }
}

/// Whether the caller may read this request at all.
///
/// Managers and admins see every request; beneficiaries only their own.
#[must_use]
pub fn can_view(claims: &Claims, request: &request::Model) -> bool {
    matches!(claims.role, Role::Admin | Role::Manager) || request.user_id == claims.sub
}

/// Loads a request and authorizes an operation against it.
///
/// An empty `allowed_roles` slice means any authenticated role; an empty
/// `allowed_statuses` slice means any status. Checks run in a fixed order
/// (existence, role, ownership, status) and the request is returned only
/// when all of them pass.
///
/// # Errors
/// Returns [`Error::NotFound`], [`Error::Role`], [`Error::Forbidden`], or
/// [`Error::InvalidStatus`] for the first check that fails.
pub async fn authorize_request<C>(
    conn: &C,
    claims: &Claims,
    request_id: i64,
    allowed_roles: &[Role],
    ownership: Ownership,
    allowed_statuses: &[RequestStatus],
) -> Result<request::Model>
where
    C: ConnectionTrait,
{
    let request = Request::find_by_id(request_id)
        .one(conn)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Request".to_string(),
        })?;

    if !allowed_roles.is_empty() {
        require_role(claims, allowed_roles)?;
    }

    let owns = request.user_id == claims.sub;
    let allowed = match ownership {
        Ownership::Any => true,
        Ownership::Owner => owns,
        Ownership::OwnerOrAdmin => owns || claims.role == Role::Admin,
    };
    if !allowed {
        return Err(Error::Forbidden {
            message: "You do not have access to this request".to_string(),
        });
    }

    if !allowed_statuses.is_empty() && !allowed_statuses.contains(&request.status) {
        let required = allowed_statuses
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" or ");
        return Err(Error::InvalidStatus {
            current: request.status,
            required,
        });
    }

    Ok(request)
}
