//! Database operations for the dashboard's own `SQLite` store.
//!
//! # Database: `dashboard.db` (separate from the shipments API)
//!
//! ## Tables
//!
//! - `client_state` - Namespaced JSON key/value pairs (user directory, geocode cache)
//! - `tower_sessions` - Session storage, created by `SqliteStore::migrate`
//!
//! Shipments are never stored here; they live in the API.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/dashboard/migrations/` and run at start-up, or via:
//! ```bash
//! cargo run -p fleet-cli -- migrate dashboard
//! ```

pub mod client_state;

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub use client_state::{ClientState, StateError};

/// Embedded migrations for the dashboard database.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Create a `SQLite` connection pool.
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

/// Apply pending migrations for `client_state`.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}
