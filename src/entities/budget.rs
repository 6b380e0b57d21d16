//! Budget entity - Represents the funding ledger for one fiscal year.
//!
//! `remaining_amount` is the single source of truth for how much can still be
//! paid out in that year. Payments debit it, payment reversals credit it back.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Yearly budget database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    /// Unique identifier for the budget row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Fiscal year this ledger covers, unique across the table
    #[sea_orm(unique)]
    pub year: i32,
    /// Total allocation for the year
    pub total_amount: f64,
    /// Funds still available for payments
    pub remaining_amount: f64,
    /// When the row was created
    pub created_at: DateTimeUtc,
    /// When the row was last touched
    pub updated_at: DateTimeUtc,
}

/// Budgets stand alone; no relationships to other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
