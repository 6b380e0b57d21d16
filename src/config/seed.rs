//! Initial data seeding from a TOML file.
//!
//! Deployments describe their users and yearly budgets in a seed file
//! (`seed.toml` by default) which is applied once at startup. Seeding is
//! idempotent: users already present (by email) and budget years already
//! present are left untouched, so restarting the service never duplicates
//! or resets data. Seed passwords are hashed before they reach the
//! database.

use crate::core;
use crate::entities::Role;
use crate::errors::{Error, Result};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Top-level structure of the seed file.
#[derive(Debug, Deserialize)]
pub struct SeedConfig {
    /// Accounts to create if missing.
    #[serde(default)]
    pub users: Vec<UserSeed>,
    /// Yearly budgets to create if missing.
    #[serde(default)]
    pub budgets: Vec<BudgetSeed>,
}

/// One account in the seed file.
#[derive(Debug, Deserialize, Clone)]
pub struct UserSeed {
    /// Login email, unique across the system.
    pub email: String,
    /// Plaintext password, hashed at seed time.
    pub password: String,
    /// Authorization role, written in uppercase (`"ADMIN"` etc.).
    pub role: Role,
    /// Optional given name.
    pub first_name: Option<String>,
    /// Optional family name.
    pub last_name: Option<String>,
}

/// One yearly budget in the seed file.
#[derive(Debug, Deserialize, Clone)]
pub struct BudgetSeed {
    /// Fiscal year of the ledger.
    pub year: i32,
    /// Total allocation; the remaining amount starts equal to it.
    pub total_amount: f64,
}

/// Parses a seed file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_seed_config<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read seed file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse seed file: {e}"),
    })
}

/// Applies a parsed seed configuration to the database.
///
/// # Errors
/// Returns an error if password hashing or a database write fails.
pub async fn apply_seed(db: &DatabaseConnection, seed: &SeedConfig) -> Result<()> {
    let mut created_users = 0;
    for user in &seed.users {
        if core::user::find_by_email(db, &user.email).await?.is_none() {
            core::user::create_user(
                db,
                &user.email,
                &user.password,
                user.role,
                user.first_name.clone(),
                user.last_name.clone(),
            )
            .await?;
            created_users += 1;
        }
    }

    let mut created_budgets = 0;
    for budget in &seed.budgets {
        if core::budget::find_by_year(db, budget.year).await?.is_none() {
            core::budget::ensure_for_year(db, budget.year, Some(budget.total_amount)).await?;
            created_budgets += 1;
        }
    }

    info!(
        "Seed applied: {created_users} new user(s), {created_budgets} new budget(s), {} user(s) and {} budget(s) already present",
        seed.users.len() - created_users,
        seed.budgets.len() - created_budgets,
    );

    Ok(())
}

/// Applies the seed file at `path` if one exists.
///
/// A missing file is not an error; deployments without seed data simply log
/// and continue.
///
/// # Errors
/// Returns an error if the file exists but cannot be parsed or applied.
pub async fn seed_from_path(db: &DatabaseConnection, path: &str) -> Result<()> {
    if !Path::new(path).exists() {
        info!("No seed file at {path}, skipping initial data seeding");
        return Ok(());
    }

    let seed = load_seed_config(path)?;
    apply_seed(db, &seed).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]

    use super::*;
    use crate::entities::User;
    use crate::test_utils::setup_test_db;
    use sea_orm::EntityTrait;

    const SEED: &str = r#"
        [[users]]
        email = "admin@example.com"
        password = "admin-password"
        role = "ADMIN"
        first_name = "Ada"

        [[users]]
        email = "bene@example.com"
        password = "bene-password"
        role = "BENEFICIARY"

        [[budgets]]
        year = 2025
        total_amount = 50000.0
    "#;

    #[test]
    fn test_parse_seed_config() {
        let seed: SeedConfig = toml::from_str(SEED).unwrap();
        assert_eq!(seed.users.len(), 2);
        assert_eq!(seed.users[0].email, "admin@example.com");
        assert_eq!(seed.users[0].role, Role::Admin);
        assert_eq!(seed.users[0].first_name.as_deref(), Some("Ada"));
        assert_eq!(seed.users[1].role, Role::Beneficiary);
        assert_eq!(seed.budgets.len(), 1);
        assert_eq!(seed.budgets[0].total_amount, 50000.0);
    }

    #[test]
    fn test_empty_sections_are_optional() {
        let seed: SeedConfig = toml::from_str("").unwrap();
        assert!(seed.users.is_empty());
        assert!(seed.budgets.is_empty());
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let bad = r#"
            [[users]]
            email = "x@example.com"
            password = "pw"
            role = "SUPERVISOR"
        "#;
        assert!(toml::from_str::<SeedConfig>(bad).is_err());
    }

    #[tokio::test]
    async fn test_apply_seed_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let seed: SeedConfig = toml::from_str(SEED).unwrap();

        apply_seed(&db, &seed).await?;
        apply_seed(&db, &seed).await?;

        let admin = core::user::find_by_email(&db, "admin@example.com")
            .await?
            .unwrap();
        assert_eq!(admin.role, Role::Admin);
        // Stored password must be a hash, never the plaintext
        assert_ne!(admin.password, "admin-password");

        let budget = core::budget::find_by_year(&db, 2025).await?.unwrap();
        assert_eq!(budget.total_amount, 50000.0);
        assert_eq!(budget.remaining_amount, 50000.0);

        // Re-applying must not have duplicated anything
        let users = User::find().all(&db).await?;
        assert_eq!(users.len(), 2);
        Ok(())
    }
}
