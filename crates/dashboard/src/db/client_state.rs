//! Namespaced JSON key/value store.
//!
//! Holds what a browser client would keep in local storage: the signup
//! user directory (namespace `users`, keyed by email) and the geocode cache
//! (namespace `geocode`, keyed by normalized address).

use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;

/// Error type for client state operations.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Typed access to one namespace of `client_state`.
#[derive(Clone, Copy)]
pub struct ClientState<'a> {
    pool: &'a SqlitePool,
    namespace: &'static str,
}

impl<'a> ClientState<'a> {
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, namespace: &'static str) -> Self {
        Self { pool, namespace }
    }

    /// Read and decode one value.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored JSON does not decode.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StateError> {
        let raw: Option<String> =
            sqlx::query_scalar("SELECT value FROM client_state WHERE namespace = ? AND key = ?")
                .bind(self.namespace)
                .bind(key)
                .fetch_optional(self.pool)
                .await?;

        raw.map(|v| serde_json::from_str(&v))
            .transpose()
            .map_err(Into::into)
    }

    /// Insert or replace one value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be encoded or the query fails.
    pub async fn set<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), StateError> {
        let raw = serde_json::to_string(value)?;
        sqlx::query(
            r"
            INSERT INTO client_state (namespace, key, value, updated_at)
            VALUES (?, ?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT (namespace, key) DO UPDATE
                SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
            ",
        )
        .bind(self.namespace)
        .bind(key)
        .bind(raw)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Number of entries in the namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count(&self) -> Result<i64, StateError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM client_state WHERE namespace = ?")
                .bind(self.namespace)
                .fetch_one(self.pool)
                .await?;
        Ok(count)
    }
}
