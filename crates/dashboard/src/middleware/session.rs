//! Session middleware configuration.
//!
//! Sessions live in the dashboard's `SQLite` store (`tower_sessions` table).
//! The helpers below read and write the non-auth session values.

use sqlx::SqlitePool;
use tower_sessions::{Expiry, Session, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::DashboardConfig;
use crate::models::{Flash, session_keys};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "fleet_session";

/// Session expiry time in seconds (7 days of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

type SessionResult<T> = Result<T, tower_sessions::session::Error>;

/// Create the session store and apply its schema.
///
/// # Errors
///
/// Returns an error if the session table cannot be created.
pub async fn create_session_store(pool: &SqlitePool) -> Result<SqliteStore, sqlx::Error> {
    let store = SqliteStore::new(pool.clone());
    store.migrate().await?;
    Ok(store)
}

/// Create the session layer over an existing store.
#[must_use]
pub fn create_session_layer(
    store: SqliteStore,
    config: &DashboardConfig,
) -> SessionManagerLayer<SqliteStore> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        // Lax so the post-login redirect carries the cookie
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Queue a notification for the next page.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_flash(session: &Session, flash: Flash) -> SessionResult<()> {
    session.insert(session_keys::FLASH, flash).await
}

/// Take the pending notification, if any.
///
/// A session read failure is treated as no notification.
pub async fn take_flash(session: &Session) -> Option<Flash> {
    session
        .remove::<Flash>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
}

/// Whether the map panel is expanded.
pub async fn map_open(session: &Session) -> bool {
    session
        .get::<bool>(session_keys::MAP_OPEN)
        .await
        .ok()
        .flatten()
        .unwrap_or(false)
}

/// Flip the map panel and return the new state.
///
/// Opening also marks the next render as the one that must resize the map.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn toggle_map(session: &Session) -> SessionResult<bool> {
    let open = !map_open(session).await;
    session.insert(session_keys::MAP_OPEN, open).await?;
    if open {
        session.insert(session_keys::MAP_JUST_OPENED, true).await?;
    } else {
        session.remove::<bool>(session_keys::MAP_JUST_OPENED).await?;
    }
    Ok(open)
}

/// Consume the just-opened marker set by [`toggle_map`].
pub async fn take_map_just_opened(session: &Session) -> bool {
    session
        .remove::<bool>(session_keys::MAP_JUST_OPENED)
        .await
        .ok()
        .flatten()
        .unwrap_or(false)
}
