//! Request entity - Represents a funding request moving through the approval
//! lifecycle.
//!
//! A request starts as a private `DRAFT`, is submitted for review, gets
//! approved or rejected by a manager, and is finally paid by an admin against
//! the yearly budget. Approval and payment stamp the acting user's email and
//! a timestamp onto the row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Funding request database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "requests")]
pub struct Model {
    /// Unique identifier for the request
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning beneficiary's user id
    pub user_id: i64,
    /// Free-form category label, e.g. "TRAVEL" or "EQUIPMENT"
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub request_type: String,
    /// Requested amount in the ledger currency
    pub amount: f64,
    /// Free-form justification text
    pub description: String,
    /// Position in the approval lifecycle
    pub status: RequestStatus,
    /// Email of the manager or admin who approved, once approved
    pub approved_by: Option<String>,
    /// When the request was approved
    pub approved_at: Option<DateTimeUtc>,
    /// Email of the admin who paid, once paid
    pub paid_by: Option<String>,
    /// When the request was paid
    pub paid_at: Option<DateTimeUtc>,
    /// When the request was created
    pub created_at: DateTimeUtc,
    /// Bumped on every mutation, including status changes
    pub updated_at: DateTimeUtc,
}

/// The closed set of lifecycle statuses.
///
/// Stored as uppercase strings in the database and on the wire. Which
/// status-to-status edges are legal is decided by the lifecycle logic in
/// [`crate::core::request`], not here.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    /// Private to the owner, freely editable
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    /// Waiting for a manager's decision
    #[sea_orm(string_value = "SUBMITTED")]
    Submitted,
    /// Cleared for payment
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    /// Terminal refusal
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
    /// Settled against the yearly budget
    #[sea_orm(string_value = "PAID")]
    Paid,
}

impl RequestStatus {
    /// Uppercase wire form of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Paid => "PAID",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = crate::errors::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(Self::Draft),
            "SUBMITTED" => Ok(Self::Submitted),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            "PAID" => Ok(Self::Paid),
            other => Err(crate::errors::Error::Validation {
                message: format!("Unknown status: {other}"),
            }),
        }
    }
}

/// Defines relationships between Request and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each request belongs to the user who created it
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
