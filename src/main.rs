use dotenvy::dotenv;
use grantflow::{
    config::{database, seed, settings::AppConfig},
    errors::Result,
    http::server,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Make it non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = AppConfig::from_env()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    info!("Successfully processed application configuration.");

    // 4. Initialize database and schema
    let db = database::create_connection(&app_config.database_url)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create database tables: {}", e))?;

    // 5. Seed initial users and budgets (if a seed file is present)
    seed::seed_from_path(&db, &app_config.seed_path)
        .await
        .inspect_err(|e| error!("Failed to apply seed configuration: {}", e))?;

    // 6. Run the API server
    server::run_server(&app_config, db)
        .await
        .inspect_err(|e| error!("Server exited with error: {}", e))?;

    Ok(())
}
