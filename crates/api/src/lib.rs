//! Fleet Logistics shipments API.
//!
//! The source of truth for shipment data: a small JSON REST server over
//! `SQLite`. The dashboard re-fetches the whole list from here on every
//! refresh and never caches shipments itself.
//!
//! # Architecture
//!
//! - Axum router ([`routes`]) with permissive CORS
//! - `sqlx` `SQLite` pool and embedded migrations ([`db`])
//! - JSON `{"message": ...}` error bodies ([`error`])

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use config::ApiConfig;
use state::AppState;

/// Build the application router with CORS and request tracing.
///
/// Sentry layers are added by the binary so embedded servers stay quiet.
pub fn app(state: AppState) -> Router {
    routes::routes()
        .layer(CorsLayer::permissive())
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

/// Error starting the API.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("seed error: {0}")]
    Seed(#[from] db::RepositoryError),
}

/// Open the database, apply migrations and seed demo data if configured.
///
/// # Errors
///
/// Returns `StartupError` if any step fails.
pub async fn prepare(config: ApiConfig) -> Result<AppState, StartupError> {
    let pool = db::create_pool(&config.database_url).await?;
    db::migrate(&pool).await?;
    tracing::info!("Database ready");

    if config.seed_demo_data {
        let inserted = db::ShipmentRepository::new(&pool).seed_if_empty().await?;
        if inserted > 0 {
            tracing::info!(inserted, "Inserted demo shipments");
        }
    }

    Ok(AppState::new(config, pool))
}
