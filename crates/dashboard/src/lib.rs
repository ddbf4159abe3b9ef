//! Fleet Logistics dashboard library.
//!
//! Server-rendered staff dashboard and customer portal over the shipments
//! API. Shipments are never stored here: every page load re-fetches the
//! full list. The dashboard's own `SQLite` database holds sessions, the mock
//! user directory and the geocode cache.
//!
//! # Security
//!
//! Authentication is a **non-production mock**: plaintext passwords, two
//! hardcoded accounts, and a customer allow-list enforced only at render
//! time.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::SqliteStore;
use tracing::Span;

use config::DashboardConfig;
use state::AppState;

/// Directory served under `/static`.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build the application router with sessions, static files and tracing.
///
/// Sentry layers are added by the binary.
pub fn app(state: AppState, session_layer: SessionManagerLayer<SqliteStore>) -> Router {
    routes::routes()
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        #[allow(clippy::cast_possible_truncation)]
                        span.record("latency_ms", latency.as_millis() as u64);
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Error starting the dashboard.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("state error: {0}")]
    State(#[from] state::StateInitError),
}

/// Open the database, apply migrations and build state and the session layer.
///
/// # Errors
///
/// Returns `StartupError` if any step fails.
pub async fn prepare(
    config: DashboardConfig,
) -> Result<(AppState, SessionManagerLayer<SqliteStore>), StartupError> {
    let pool = db::create_pool(&config.database_url).await?;
    db::migrate(&pool).await?;
    let store = middleware::create_session_store(&pool).await?;
    tracing::info!("Database ready");

    let session_layer = middleware::create_session_layer(store, &config);
    let state = AppState::new(&config, pool)?;
    Ok((state, session_layer))
}
