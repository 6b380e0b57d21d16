//! Application settings loaded from environment variables.
//!
//! All settings have sensible development defaults so the service starts
//! with nothing but a `.env` file (or no configuration at all). Production
//! deployments are expected to set `JWT_SECRET` explicitly; a fallback
//! secret is provided for local development and loudly warned about.

use crate::errors::{Error, Result};

/// Development-only token signing secret, used when `JWT_SECRET` is not set.
const DEV_JWT_SECRET: &str = "grantflow-development-secret-do-not-deploy";

/// Runtime configuration for the service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface the HTTP server binds to.
    pub host: String,
    /// Port the HTTP server listens on.
    pub port: u16,
    /// `SeaORM` connection URL.
    pub database_url: String,
    /// Secret used to sign and verify access tokens.
    pub jwt_secret: String,
    /// Path to the optional TOML seed file applied at startup.
    pub seed_path: String,
}

impl AppConfig {
    /// Builds the configuration from environment variables.
    ///
    /// | Variable           | Default                                  |
    /// |--------------------|------------------------------------------|
    /// | `HOST`             | `0.0.0.0`                                |
    /// | `PORT`             | `5000`                                   |
    /// | `DATABASE_URL`     | `sqlite://data/grantflow.sqlite?mode=rwc`|
    /// | `JWT_SECRET`       | development fallback (with a warning)    |
    /// | `SEED_CONFIG_PATH` | `seed.toml`                              |
    ///
    /// # Errors
    /// Returns an error if `PORT` is set but is not a valid port number.
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| Error::Config {
                message: format!("PORT must be a number between 1 and 65535, got {raw:?}"),
            })?,
            Err(_) => 5000,
        };

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://data/grantflow.sqlite?mode=rwc".to_string());

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using the development fallback secret");
            DEV_JWT_SECRET.to_string()
        });

        let seed_path =
            std::env::var("SEED_CONFIG_PATH").unwrap_or_else(|_| "seed.toml".to_string());

        Ok(Self {
            host,
            port,
            database_url,
            jwt_secret,
            seed_path,
        })
    }
}
