//! Funding request lifecycle business logic.
//!
//! A request moves DRAFT -> SUBMITTED -> APPROVED -> PAID, with REJECTED as
//! the refusal branch. The whole edge set lives in [`is_valid_transition`];
//! [`transition_status`] is the one place that walks an edge, so role rules,
//! identity stamps, ledger debits, and the transaction snapshot cannot drift
//! apart. Paying is settled inside a database transaction: the ledger debit,
//! the status change, and the history row all land together or not at all.
//!
//! A PAID request can be moved back to any other status by an admin, which
//! credits the debited amount back to the ledger of the year the payment
//! happened in. The transaction row is deliberately left in place; the
//! history records that the payment happened, not that it stayed.

use crate::{
    core::{access, auth::Claims, budget, user as user_logic},
    entities::{Request, RequestStatus, Role, User, request, transaction},
    errors::{Error, Result},
};
use chrono::Datelike;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Smallest amount a request may ask for.
pub const MIN_AMOUNT: f64 = 0.01;
/// Largest amount a request may ask for.
pub const MAX_AMOUNT: f64 = 100_000.0;

const TYPE_MIN_LEN: usize = 2;
const TYPE_MAX_LEN: usize = 100;
const DESCRIPTION_MAX_LEN: usize = 1000;

fn validate_request_type(value: &str) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.len() < TYPE_MIN_LEN || trimmed.len() > TYPE_MAX_LEN {
        return Err(Error::Validation {
            message: format!(
                "Type must be between {TYPE_MIN_LEN} and {TYPE_MAX_LEN} characters"
            ),
        });
    }
    Ok(())
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < MIN_AMOUNT || amount > MAX_AMOUNT {
        return Err(Error::Validation {
            message: format!("Amount must be between {MIN_AMOUNT} and {MAX_AMOUNT}"),
        });
    }
    Ok(())
}

fn validate_description(value: &str) -> Result<()> {
    if value.len() > DESCRIPTION_MAX_LEN {
        return Err(Error::Validation {
            message: format!("Description must be at most {DESCRIPTION_MAX_LEN} characters"),
        });
    }
    Ok(())
}

/// Whether `from -> to` is an edge of the request lifecycle.
///
/// REJECTED is terminal. PAID has no forward edges, but every move off PAID
/// is legal because it is the payment-reversal path.
#[must_use]
pub const fn is_valid_transition(from: RequestStatus, to: RequestStatus) -> bool {
    match from {
        RequestStatus::Draft => matches!(to, RequestStatus::Submitted),
        RequestStatus::Submitted => {
            matches!(to, RequestStatus::Approved | RequestStatus::Rejected)
        }
        RequestStatus::Approved => matches!(to, RequestStatus::Paid),
        RequestStatus::Rejected => false,
        RequestStatus::Paid => !matches!(to, RequestStatus::Paid),
    }
}

/// Role and ownership rules for one lifecycle edge.
///
/// The edge must already be valid. Submitting is reserved to the request's
/// owner; review decisions need a manager or admin; anything touching money
/// (paying, reversing a payment) needs an admin.
fn authorize_transition(
    request: &request::Model,
    actor: &Claims,
    to: RequestStatus,
) -> Result<()> {
    match (request.status, to) {
        (RequestStatus::Draft, RequestStatus::Submitted) => {
            if request.user_id == actor.sub {
                Ok(())
            } else {
                Err(Error::Forbidden {
                    message: "Only the request owner can submit it".to_string(),
                })
            }
        }
        (RequestStatus::Submitted, RequestStatus::Approved | RequestStatus::Rejected) => {
            access::require_role(actor, &[Role::Manager, Role::Admin])
        }
        (RequestStatus::Approved, RequestStatus::Paid) | (RequestStatus::Paid, _) => {
            access::require_role(actor, &[Role::Admin])
        }
        (from, to) => Err(Error::InvalidTransition { from, to }),
    }
}

/// Looks up a request by id.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<request::Model>> {
    Request::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Every request in the system, newest first.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<request::Model>> {
    Request::find()
        .order_by_desc(request::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// One user's requests, newest first.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_for_user(db: &DatabaseConnection, user_id: i64) -> Result<Vec<request::Model>> {
    Request::find()
        .filter(request::Column::UserId.eq(user_id))
        .order_by_desc(request::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a new DRAFT request owned by the caller.
///
/// # Errors
/// Returns a validation error for an out-of-bounds type, amount, or
/// description.
pub async fn create_request(
    db: &DatabaseConnection,
    owner: &Claims,
    request_type: &str,
    amount: f64,
    description: Option<String>,
) -> Result<request::Model> {
    validate_request_type(request_type)?;
    validate_amount(amount)?;
    let description = description.unwrap_or_default();
    validate_description(&description)?;

    let now = chrono::Utc::now();
    let model = request::ActiveModel {
        user_id: Set(owner.sub),
        request_type: Set(request_type.trim().to_string()),
        amount: Set(amount),
        description: Set(description),
        status: Set(RequestStatus::Draft),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

/// Edits the fields of a DRAFT request. Only provided fields change.
///
/// The caller is expected to have run the access gate already; this function
/// validates values, not permissions.
///
/// # Errors
/// Returns a validation error for out-of-bounds values.
pub async fn update_fields(
    db: &DatabaseConnection,
    request: request::Model,
    request_type: Option<String>,
    amount: Option<f64>,
    description: Option<String>,
) -> Result<request::Model> {
    let mut model: request::ActiveModel = request.into();

    if let Some(request_type) = request_type {
        validate_request_type(&request_type)?;
        model.request_type = Set(request_type.trim().to_string());
    }
    if let Some(amount) = amount {
        validate_amount(amount)?;
        model.amount = Set(amount);
    }
    if let Some(description) = description {
        validate_description(&description)?;
        model.description = Set(description);
    }
    model.updated_at = Set(chrono::Utc::now());

    model.update(db).await.map_err(Into::into)
}

/// Deletes a request row.
///
/// Only DRAFT requests may be deleted; the access gate enforces that before
/// this is called.
///
/// # Errors
/// Returns an error if the delete fails.
pub async fn delete_request(db: &DatabaseConnection, request: request::Model) -> Result<()> {
    request.delete(db).await?;
    Ok(())
}

/// Walks one edge of the request lifecycle.
///
/// The request is re-read inside a database transaction so a concurrent
/// change cannot slip between the check and the write. What happens besides
/// the status change depends on the edge:
///
/// * into APPROVED: the actor's email and the current time are stamped as
///   the approval.
/// * into PAID: the ledger for `fiscal_year` is created if absent, debited
///   by the request amount (failing the whole transition when funds are
///   short), payer and approver stamps are written (approver backfilled to
///   the payer when the request skipped a recorded approval), and one
///   transaction row snapshots the payment.
/// * off PAID: the ledger of the year the request was last updated in, which
///   is when it was paid, is credited back. The transaction row stays.
///
/// # Errors
/// Returns [`Error::InvalidTransition`] for a non-edge, a role or ownership
/// error per the edge's actor rules, or [`Error::InsufficientBudget`] when
/// paying more than the ledger holds.
pub async fn transition_status(
    db: &DatabaseConnection,
    request_id: i64,
    new_status: RequestStatus,
    actor: &Claims,
    fiscal_year: i32,
) -> Result<request::Model> {
    let txn = db.begin().await?;

    let request = Request::find_by_id(request_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Request".to_string(),
        })?;

    let from = request.status;
    if !is_valid_transition(from, new_status) {
        return Err(Error::InvalidTransition {
            from,
            to: new_status,
        });
    }
    authorize_transition(&request, actor, new_status)?;

    let now = chrono::Utc::now();
    let mut model: request::ActiveModel = request.clone().into();
    model.status = Set(new_status);
    model.updated_at = Set(now);

    match new_status {
        RequestStatus::Approved => {
            model.approved_by = Set(Some(actor.email.clone()));
            model.approved_at = Set(Some(now));
        }
        RequestStatus::Paid => {
            budget::validate_year(fiscal_year)?;
            budget::ensure_for_year(&txn, fiscal_year, None).await?;
            budget::debit(&txn, fiscal_year, request.amount).await?;

            let approver = request
                .approved_by
                .clone()
                .unwrap_or_else(|| actor.email.clone());
            let approved_at = request.approved_at.unwrap_or(now);
            model.approved_by = Set(Some(approver.clone()));
            model.approved_at = Set(Some(approved_at));
            model.paid_by = Set(Some(actor.email.clone()));
            model.paid_at = Set(Some(now));

            let beneficiary = User::find_by_id(request.user_id)
                .one(&txn)
                .await?
                .ok_or_else(|| Error::NotFound {
                    resource: "User".to_string(),
                })?;

            let snapshot = transaction::ActiveModel {
                request_id: Set(request.id),
                amount: Set(request.amount),
                request_type: Set(request.request_type.clone()),
                beneficiary_name: Set(user_logic::display_name(&beneficiary)),
                beneficiary_email: Set(beneficiary.email),
                approved_by: Set(approver),
                paid_by: Set(actor.email.clone()),
                approved_at: Set(Some(approved_at)),
                paid_at: Set(now),
                ..Default::default()
            };
            snapshot.insert(&txn).await?;
        }
        _ => {}
    }

    // Reversal path: the last update of a PAID request is its payment
    if from == RequestStatus::Paid {
        budget::credit(&txn, request.updated_at.year(), request.amount).await?;
    }

    let updated = model.update(&txn).await?;
    txn.commit().await?;

    Ok(updated)
}
