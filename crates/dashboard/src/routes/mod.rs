//! HTTP route handlers for the dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (database)
//!
//! # Views
//! GET  /                            - Staff dashboard or customer portal (?menu=<id> opens a row menu)
//! POST /map/toggle                  - Expand/collapse the map panel
//!
//! # Auth (mock, plaintext - not for production)
//! GET  /login, POST /login          - Login
//! GET  /signup, POST /signup        - Staff signup
//! POST /logout                      - Logout
//!
//! # Parcels
//! GET  /parcels/new                 - Add parcel form
//! POST /parcels                     - Create parcel
//!
//! # Actions (staff)
//! GET  /shipments/{id}/status       - Confirm a status change (?to=<Status>)
//! POST /shipments/{id}/status       - Apply it
//! GET  /deliver-next                - Confirm Deliver Next
//! POST /deliver-next                - Deliver the confirmed shipment
//! GET  /returns/new                 - Register Return, step 1 (tracking ID)
//! POST /returns/new                 - Step 2 (destination)
//! POST /returns                     - Create the return
//! GET  /clear, POST /clear          - Clear all data (admin)
//! ```

pub mod actions;
pub mod auth;
pub mod dashboard;
pub mod parcels;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, Uri},
    response::Redirect,
    routing::get,
};
use tower_sessions::Session;

use fleet_logistics_core::User;

use crate::error::AppError;
use crate::middleware::{set_flash, take_flash};
use crate::models::Flash;
use crate::services::ApiStatus;
use crate::state::AppState;

/// Build the dashboard router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(parcels::router())
        .merge(actions::router())
        .fallback(not_found)
}

/// Shared page chrome: navigation bar and notification.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub user: Option<User>,
    /// Known only on pages that fetched the manifest.
    pub api: Option<ApiStatus>,
    pub flash: Option<Flash>,
}

impl Page {
    /// Chrome for `user`, consuming any pending notification.
    pub async fn load(session: &Session, user: Option<User>) -> Self {
        Self {
            user,
            api: None,
            flash: take_flash(session).await,
        }
    }

    #[must_use]
    pub fn with_flash(mut self, flash: Flash) -> Self {
        self.flash = Some(flash);
        self
    }

    /// Navigation indicator text.
    #[must_use]
    pub fn api_label(&self) -> &'static str {
        self.api.map_or("Connecting...", ApiStatus::label)
    }

    #[must_use]
    pub fn api_online(&self) -> bool {
        self.api.is_some_and(ApiStatus::is_online)
    }
}

/// Queue `flash` and go back to the dashboard.
///
/// A session write failure only loses the notification.
pub(crate) async fn flash_home(session: &Session, flash: Flash) -> Redirect {
    if let Err(e) = set_flash(session, flash).await {
        tracing::warn!(error = %e, "failed to store notification");
    }
    Redirect::to("/")
}

/// Fallback for unknown paths.
async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// Liveness health check endpoint.
///
/// GET /health
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// GET /health/ready
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
