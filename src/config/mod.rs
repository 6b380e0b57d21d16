/// Database connection and table creation
pub mod database;

/// Initial user and budget seeding from seed.toml
pub mod seed;

/// Runtime settings loaded from environment variables
pub mod settings;
