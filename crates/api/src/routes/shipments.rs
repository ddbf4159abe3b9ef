//! `/shipments` handlers.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{delete, get, put},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use fleet_logistics_core::{
    NewShipment, ParseEnumError, Shipment, ShipmentId, ShipmentStatus, TrackingId,
};

use crate::db::ShipmentRepository;
use crate::error::AppError;
use crate::state::AppState;

/// Build the shipments router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/shipments", get(list).post(create))
        .route("/shipments/clear", delete(clear))
        .route("/shipments/{id}", put(update_status))
}

// =============================================================================
// Request / Response Types
// =============================================================================

/// Body of `POST /shipments`, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShipmentRequest {
    pub tracking_id: Option<String>,
    pub destination: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.trim().is_empty())
}

impl CreateShipmentRequest {
    /// Check required fields and parse enums.
    ///
    /// `status` defaults to Scheduled when omitted.
    fn validate(self) -> Result<NewShipment, AppError> {
        let (Some(tracking_id), Some(destination), Some(priority)) = (
            present(self.tracking_id),
            present(self.destination),
            present(self.priority),
        ) else {
            return Err(AppError::BadRequest("Missing required fields".to_string()));
        };

        let tracking_id =
            TrackingId::parse(&tracking_id).map_err(|e| AppError::BadRequest(e.to_string()))?;
        let priority = priority
            .parse()
            .map_err(|e: ParseEnumError| AppError::BadRequest(e.to_string()))?;
        let status = match present(self.status) {
            Some(s) => s
                .parse()
                .map_err(|e: ParseEnumError| AppError::BadRequest(e.to_string()))?,
            None => ShipmentStatus::Scheduled,
        };

        Ok(NewShipment {
            tracking_id,
            destination: destination.trim().to_owned(),
            priority,
            status,
        })
    }
}

/// Body of `PUT /shipments/{id}`, before validation.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

/// Body of a successful clear.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn bad_json(rejection: &JsonRejection) -> AppError {
    AppError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /shipments
#[instrument(skip(state))]
async fn list(State(state): State<AppState>) -> Result<Json<Vec<Shipment>>, AppError> {
    let shipments = ShipmentRepository::new(state.pool()).list_all().await?;
    Ok(Json(shipments))
}

/// POST /shipments
#[instrument(skip(state, payload))]
async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateShipmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Shipment>), AppError> {
    let Json(request) = payload.map_err(|e| bad_json(&e))?;
    let new = request.validate()?;

    let shipment = ShipmentRepository::new(state.pool()).create(&new).await?;
    tracing::info!(
        id = %shipment.id,
        tracking_id = %shipment.tracking_id,
        status = %shipment.status,
        "Shipment created"
    );
    Ok((StatusCode::CREATED, Json(shipment)))
}

/// PUT /shipments/{id}
#[instrument(skip(state, payload))]
async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<Shipment>, AppError> {
    let Json(request) = payload.map_err(|e| bad_json(&e))?;
    let status: ShipmentStatus = present(request.status)
        .ok_or_else(|| AppError::BadRequest("Missing 'status' field".to_string()))?
        .parse()
        .map_err(|e: ParseEnumError| AppError::BadRequest(e.to_string()))?;

    let shipment = ShipmentRepository::new(state.pool())
        .update_status(&ShipmentId::new(id), status)
        .await?;
    tracing::info!(id = %shipment.id, status = %status, "Shipment status updated");
    Ok(Json(shipment))
}

/// DELETE /shipments/clear
#[instrument(skip(state))]
async fn clear(State(state): State<AppState>) -> Result<Json<MessageResponse>, AppError> {
    let reseed = state.config().seed_demo_data;
    let deleted = ShipmentRepository::new(state.pool()).clear(reseed).await?;
    tracing::warn!(deleted, reseed, "All shipments cleared");

    let message = if reseed {
        "All shipments cleared and demo data reloaded."
    } else {
        "All shipments cleared."
    };
    Ok(Json(MessageResponse {
        message: message.to_string(),
    }))
}
