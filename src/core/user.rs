//! User account business logic.
//!
//! Thin lookup and creation helpers over the user entity. Account creation
//! hashes the password before anything touches the database; plaintext
//! passwords only ever exist in memory during login and seeding.

use crate::{
    core::auth,
    entities::{Role, User, user},
    errors::Result,
};
use sea_orm::{Set, prelude::*};

/// Looks up a user by email, the login identifier.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Looks up a user by id.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Creates a new account with a freshly hashed password.
///
/// # Errors
/// Returns an error if hashing fails or the insert fails, including the
/// unique-email constraint.
pub async fn create_user(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    role: Role,
    first_name: Option<String>,
    last_name: Option<String>,
) -> Result<user::Model> {
    let hashed = auth::hash_password(password)?;

    let model = user::ActiveModel {
        email: Set(email.to_string()),
        password: Set(hashed),
        role: Set(role),
        first_name: Set(first_name),
        last_name: Set(last_name),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

/// Name to show for a user, for transaction snapshots and the like.
///
/// Prefers the configured first name and falls back to the email.
#[must_use]
pub fn display_name(user: &user::Model) -> String {
    user.first_name
        .clone()
        .unwrap_or_else(|| user.email.clone())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_create_and_find_user() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_user(
            &db,
            "alice@example.com",
            "s3cret-password",
            Role::Manager,
            Some("Alice".to_string()),
            None,
        )
        .await?;

        assert_eq!(created.role, Role::Manager);
        // Password must be stored hashed
        assert_ne!(created.password, "s3cret-password");
        assert!(created.password.starts_with("$argon2"));

        let found = find_by_email(&db, "alice@example.com").await?.unwrap();
        assert_eq!(found.id, created.id);

        let by_id = find_by_id(&db, created.id).await?.unwrap();
        assert_eq!(by_id.email, "alice@example.com");

        assert!(find_by_email(&db, "nobody@example.com").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;

        create_user(&db, "dup@example.com", "pw-one", Role::Beneficiary, None, None).await?;
        let second =
            create_user(&db, "dup@example.com", "pw-two", Role::Beneficiary, None, None).await;
        assert!(second.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_display_name_falls_back_to_email() -> Result<()> {
        let db = setup_test_db().await?;

        let named = create_user(
            &db,
            "named@example.com",
            "pw",
            Role::Beneficiary,
            Some("Norah".to_string()),
            Some("Jones".to_string()),
        )
        .await?;
        assert_eq!(display_name(&named), "Norah");

        let unnamed =
            create_user(&db, "plain@example.com", "pw", Role::Beneficiary, None, None).await?;
        assert_eq!(display_name(&unnamed), "plain@example.com");
        Ok(())
    }
}
