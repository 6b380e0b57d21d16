//! User entity - Represents an account that can authenticate against the API.
//!
//! Every user carries exactly one [`Role`], which drives all authorization
//! decisions. Passwords are stored as Argon2 hashes and never serialized.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login identifier, unique across the system
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 password hash in PHC string format, never sent to clients
    #[serde(skip_serializing)]
    pub password: String,
    /// Authorization role
    pub role: Role,
    /// Optional given name, used as the beneficiary name on transactions
    pub first_name: Option<String>,
    /// Optional family name
    pub last_name: Option<String>,
}

/// The closed set of authorization roles.
///
/// Stored as uppercase strings in the database and on the wire.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full control: budgets, payments, any request
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    /// Reviews submitted requests and can approve or reject them
    #[sea_orm(string_value = "MANAGER")]
    Manager,
    /// Creates and submits funding requests for themselves
    #[sea_orm(string_value = "BENEFICIARY")]
    Beneficiary,
}

impl Role {
    /// Uppercase wire form of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::Beneficiary => "BENEFICIARY",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user owns many funding requests
    #[sea_orm(has_many = "super::request::Entity")]
    Requests,
    /// One user produces many audit log entries
    #[sea_orm(has_many = "super::audit_log::Entity")]
    AuditLogs,
}

impl Related<super::request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requests.def()
    }
}

impl Related<super::audit_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuditLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
