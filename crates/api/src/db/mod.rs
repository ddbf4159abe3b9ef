//! Database operations for the shipments API.
//!
//! # Database: `shipments.db` (`SQLite`)
//!
//! ## Tables
//!
//! - `shipment` - Every shipment; ids are UUID v4 text, enums are stored by name
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run at start-up, or via:
//! ```bash
//! cargo run -p fleet-cli -- migrate api
//! ```

pub mod shipments;

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use shipments::{DEMO_SHIPMENTS, ShipmentRepository};

/// Embedded migrations for the shipments database.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Create a `SQLite` connection pool.
///
/// In-memory databases get a single connection so every query sees the
/// same database.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be
/// established.
pub async fn create_pool(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    let url = database_url.expose_secret();
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool_options = SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(10));

    // An in-memory database lives only as long as its connection.
    let pool_options = if url.contains(":memory:") {
        pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options.max_connections(5)
    };

    pool_options.connect_with(options).await
}

/// Apply pending migrations.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Fresh migrated in-memory database.
    #[allow(clippy::unwrap_used)]
    pub async fn memory_pool() -> SqlitePool {
        let pool = create_pool(&SecretString::from("sqlite::memory:"))
            .await
            .unwrap();
        migrate(&pool).await.unwrap();
        pool
    }
}
