//! Database connection and table creation using `SeaORM`.
//!
//! Provides functions for establishing database connections and creating all
//! necessary tables based on the entity definitions. The module uses
//! `SeaORM`'s `Schema::create_table_from_entity` method to automatically
//! generate SQL statements from the entity models, ensuring that the database
//! schema matches the Rust struct definitions without requiring manual SQL.

use crate::entities::{AuditLog, Budget, Request, Transaction, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the database behind the given URL.
///
/// The URL comes from [`crate::config::settings::AppConfig`], which defaults
/// to a local `SQLite` file when `DATABASE_URL` is not set.
///
/// # Errors
/// Returns an error if the connection cannot be established.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables from the entity definitions.
///
/// Creates tables for users, requests, budgets, transactions, and audit
/// logs. Runs at every startup, so each statement carries `IF NOT EXISTS`
/// and existing tables are left untouched.
///
/// # Errors
/// Returns an error if any of the `CREATE TABLE` statements fail.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = [
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(Request),
        schema.create_table_from_entity(Budget),
        schema.create_table_from_entity(Transaction),
        schema.create_table_from_entity(AuditLog),
    ];

    for statement in &mut statements {
        db.execute(builder.build(statement.if_not_exists())).await?;
    }

    Ok(())
}
