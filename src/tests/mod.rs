pub mod unit_tests;

use crate::config::AppConfig;
use crate::database::Database;
use crate::Result;

/// Test helper to create a test database connection
///
/// Requires a config.toml (or config.example.toml) pointing at a running
/// PostgreSQL instance with the pgvector extension available.
pub async fn create_test_database() -> Result<Database> {
    let config = AppConfig::load()?;
    let database = Database::from_config(&config).await?;
    Ok(database)
}
