//! HTTP route handlers for the shipments API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health               - Liveness check
//! GET    /health/ready         - Readiness check (database)
//!
//! GET    /shipments            - List every shipment
//! POST   /shipments            - Create a shipment (201 + shipment)
//! PUT    /shipments/{id}       - Update status, body {"status": ...}
//! DELETE /shipments/clear      - Delete everything (re-seeds demo data if enabled)
//! ```

pub mod shipments;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, Uri},
    routing::get,
};

use crate::error::AppError;
use crate::state::AppState;

/// Build the full API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(shipments::router())
        .fallback(not_found)
}

/// Unknown paths get the same JSON error body as every other failure.
async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
