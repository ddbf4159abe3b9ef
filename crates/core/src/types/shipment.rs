//! Shipment records and request bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{ShipmentId, TrackingId};
use super::status::{Priority, ShipmentStatus};
use super::timestamp;

/// A shipment as stored by the API server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: ShipmentId,
    pub tracking_id: TrackingId,
    pub destination: String,
    pub priority: Priority,
    pub status: ShipmentStatus,
    /// Creation time, re-stamped by the server on every status change.
    #[serde(with = "timestamp::lenient")]
    pub created_at: DateTime<Utc>,
}

impl Shipment {
    /// Whether the shipment still needs handling.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Body of `POST /shipments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShipment {
    pub tracking_id: TrackingId,
    pub destination: String,
    pub priority: Priority,
    #[serde(default)]
    pub status: ShipmentStatus,
}

impl NewShipment {
    /// A parcel entering the manifest through the add-parcel form.
    #[must_use]
    pub fn parcel(tracking_id: TrackingId, destination: impl Into<String>, priority: Priority) -> Self {
        Self {
            tracking_id,
            destination: destination.into(),
            priority,
            status: ShipmentStatus::Scheduled,
        }
    }

    /// A returned parcel: always High priority, created directly as Returned.
    #[must_use]
    pub fn returned(tracking_id: TrackingId, destination: impl Into<String>) -> Self {
        Self {
            tracking_id,
            destination: destination.into(),
            priority: Priority::High,
            status: ShipmentStatus::Returned,
        }
    }
}

/// Body of `PUT /shipments/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: ShipmentStatus,
}
