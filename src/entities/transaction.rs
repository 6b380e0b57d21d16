//! Transaction entity - Immutable record of a completed payment.
//!
//! A row is written at the moment a request is paid and is never updated or
//! deleted afterwards, even if the payment is later reversed. Beneficiary and
//! approver details are snapshotted as plain values rather than foreign keys,
//! so the history stays readable no matter what happens to the source rows.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Id of the request that was paid; a weak reference, not a foreign key
    pub request_id: i64,
    /// Amount that was debited from the yearly budget
    pub amount: f64,
    /// Category label copied from the request at payment time
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub request_type: String,
    /// Beneficiary's name at payment time
    pub beneficiary_name: String,
    /// Beneficiary's email at payment time
    pub beneficiary_email: String,
    /// Email of the user who approved the request
    pub approved_by: String,
    /// Email of the admin who executed the payment
    pub paid_by: String,
    /// When the request was approved, if it went through approval
    pub approved_at: Option<DateTimeUtc>,
    /// When the payment was executed
    pub paid_at: DateTimeUtc,
}

/// Transactions reference requests only by value; no entity relationships
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
