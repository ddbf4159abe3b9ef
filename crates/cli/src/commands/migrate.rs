//! Database migration commands.
//!
//! # Environment Variables
//!
//! - `FLEET_API_DATABASE_URL` - `SQLite` database of the shipments API
//! - `DASHBOARD_DATABASE_URL` - `SQLite` database of the dashboard
//!
//! # Migration Files
//!
//! API migrations: `crates/api/migrations/`
//! Dashboard migrations: `crates/dashboard/migrations/` (the session table is
//! created by the session store itself)

use sqlx::SqlitePool;

use fleet_logistics_api::config::ApiConfig;
use fleet_logistics_dashboard::config::DashboardConfig;

use super::CommandError;

/// Run shipments API database migrations.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or a migration fails.
pub async fn api() -> Result<(), CommandError> {
    let config = ApiConfig::from_env()?;
    let pool = fleet_logistics_api::db::create_pool(&config.database_url).await?;
    api_on(&pool).await
}

async fn api_on(pool: &SqlitePool) -> Result<(), CommandError> {
    tracing::info!("Running shipments API migrations...");
    fleet_logistics_api::db::migrate(pool).await?;
    tracing::info!("Shipments API migrations complete!");
    Ok(())
}

/// Run dashboard database migrations, including the session table.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or a migration fails.
pub async fn dashboard() -> Result<(), CommandError> {
    let config = DashboardConfig::from_env()?;
    let pool = fleet_logistics_dashboard::db::create_pool(&config.database_url).await?;
    dashboard_on(&pool).await
}

async fn dashboard_on(pool: &SqlitePool) -> Result<(), CommandError> {
    tracing::info!("Running dashboard migrations...");
    fleet_logistics_dashboard::db::migrate(pool).await?;
    fleet_logistics_dashboard::middleware::create_session_store(pool).await?;
    tracing::info!("Dashboard migrations complete!");
    Ok(())
}
