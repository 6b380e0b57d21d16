//! Audit log entity - Append-only trail of who did what.
//!
//! Entries are written as a side effect of request operations and are never
//! read back by business logic. Structured context (old and new status, for
//! example) goes into the `details` JSON column.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Audit log database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Id of the user who performed the action
    pub user_id: i64,
    /// Action label, e.g. `"CREATE_REQUEST"` or `"UPDATE_STATUS"`
    pub action: String,
    /// Kind of resource acted on, e.g. `"Request"`
    pub resource: String,
    /// Id of the resource acted on, when one exists
    pub resource_id: Option<i64>,
    /// Optional structured context for the action
    pub details: Option<Json>,
    /// Client address, when the transport provides one
    pub ip_address: Option<String>,
    /// When the action happened
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `AuditLog` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to the user who acted
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
