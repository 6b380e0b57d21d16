//! Authentication: password hashing and access tokens.
//!
//! Passwords are hashed with Argon2 and stored in PHC string format, so the
//! parameters travel with each hash and can be tightened later without a
//! migration. Successful logins are exchanged for a signed JWT carrying the
//! user's id, email, and role; the HTTP middleware verifies it on every
//! protected route.
//!
//! Login failures are deliberately indistinguishable: an unknown email and a
//! wrong password both produce the same "Invalid email or password" error,
//! so the endpoint cannot be used to probe which accounts exist.

use crate::{
    core::user as user_logic,
    entities::{Role, user},
    errors::{Error, Result},
};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

/// How long an issued token stays valid.
const TOKEN_TTL_DAYS: i64 = 7;

/// Claims carried inside every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Id of the authenticated user.
    pub sub: i64,
    /// Email of the authenticated user, stamped onto approvals and payments.
    pub email: String,
    /// Role driving all authorization decisions.
    pub role: Role,
    /// When the token was issued, as a unix timestamp.
    pub iat: i64,
    /// When the token expires, as a unix timestamp.
    pub exp: i64,
}

impl Claims {
    /// Builds claims for a user with a fresh issue/expiry window.
    #[must_use]
    pub fn new(user: &user::Model) -> Self {
        let now = Utc::now();
        Self {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        }
    }
}

/// Hashes a plaintext password into a PHC-format Argon2 string.
///
/// # Errors
/// Returns an error if the hasher fails, which indicates a broken runtime
/// rather than bad input.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Internal {
            message: format!("Password hashing failed: {e}"),
        })
}

/// Verifies a plaintext password against a stored PHC hash.
///
/// # Errors
/// Returns an error if the stored hash cannot be parsed; a mismatched
/// password is `Ok(false)`, not an error.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| Error::Internal {
        message: format!("Stored password hash is malformed: {e}"),
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Signs a fresh access token for the user.
///
/// # Errors
/// Returns an error if token serialization or signing fails.
pub fn issue_token(user: &user::Model, secret: &str) -> Result<String> {
    let claims = Claims::new(user);
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Internal {
        message: format!("Token signing failed: {e}"),
    })
}

/// Verifies a token's signature and expiry, returning its claims.
///
/// # Errors
/// Returns [`Error::Unauthorized`] for expired, tampered, or otherwise
/// unusable tokens.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => Error::Unauthorized {
            message: "Token expired".to_string(),
        },
        _ => Error::Unauthorized {
            message: "Invalid token".to_string(),
        },
    })
}

/// Authenticates an email/password pair and mints a token on success.
///
/// # Errors
/// Returns [`Error::Unauthorized`] with a generic message when either the
/// email is unknown or the password does not match.
pub async fn login(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    secret: &str,
) -> Result<(String, user::Model)> {
    let invalid = || Error::Unauthorized {
        message: "Invalid email or password".to_string(),
    };

    let user = user_logic::find_by_email(db, email)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(password, &user.password)? {
        return Err(invalid());
    }

    let token = issue_token(&user, secret)?;
    Ok((token, user))
}
