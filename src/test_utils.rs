//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test
//! databases and creating test entities with sensible defaults.

use crate::{
    core::{auth::Claims, request, user},
    entities::{self, Role},
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Password every test account is created with.
pub const TEST_PASSWORD: &str = "test-password";

/// Opens a fresh in-memory `SQLite` database with the full schema applied.
/// This is the standard setup for all database-backed tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test user with the given email and role.
///
/// # Defaults
/// * `password`: [`TEST_PASSWORD`]
/// * `first_name` / `last_name`: None
pub async fn create_test_user(
    db: &DatabaseConnection,
    email: &str,
    role: Role,
) -> Result<entities::user::Model> {
    user::create_user(db, email, TEST_PASSWORD, role, None, None).await
}

/// Claims as the auth middleware would produce them for this user.
#[must_use]
pub fn claims_for(user: &entities::user::Model) -> Claims {
    Claims::new(user)
}

/// Creates a DRAFT request owned by `user_id` with sensible defaults.
///
/// # Defaults
/// * `type`: `"TRAVEL"`
/// * `description`: `"Test request"`
pub async fn create_test_request(
    db: &DatabaseConnection,
    user_id: i64,
    amount: f64,
) -> Result<entities::request::Model> {
    let owner = user::find_by_id(db, user_id)
        .await?
        .ok_or_else(|| crate::errors::Error::NotFound {
            resource: "User".to_string(),
        })?;

    request::create_request(
        db,
        &claims_for(&owner),
        "TRAVEL",
        amount,
        Some("Test request".to_string()),
    )
    .await
}

/// Sets up a database with one user of each role.
/// Returns (db, beneficiary, manager, admin) for lifecycle tests.
pub async fn setup_with_roles() -> Result<(
    DatabaseConnection,
    entities::user::Model,
    entities::user::Model,
    entities::user::Model,
)> {
    let db = setup_test_db().await?;
    let beneficiary = create_test_user(&db, "beneficiary@example.com", Role::Beneficiary).await?;
    let manager = create_test_user(&db, "manager@example.com", Role::Manager).await?;
    let admin = create_test_user(&db, "admin@example.com", Role::Admin).await?;
    Ok((db, beneficiary, manager, admin))
}
