//! Dashboard mutations.
//!
//! Each action is a single attempt with no retry. Validation and permission
//! checks run before any API call; the caller refreshes afterwards.

use fleet_logistics_core::manifest::{confirms_clear_all, select_next_delivery};
use fleet_logistics_core::{NewShipment, Priority, Role, Shipment, ShipmentId, ShipmentStatus, TrackingId};

use crate::client::{ApiError, ShipmentApi};

use super::geocode::{GeocodeResolver, Geocoder};

/// Why an action did not happen.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The API call failed.
    #[error("{0}")]
    Api(#[from] ApiError),
    /// Input was rejected before calling the API.
    #[error("{0}")]
    Validation(String),
    /// The user's role does not allow this.
    #[error("{0}")]
    Forbidden(String),
}

impl ActionError {
    fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

pub const NO_ACTIVE_SHIPMENTS: &str = "No active shipments";
pub const ACCESS_DENIED: &str = "Access Denied";
pub const INVALID_LOCATION: &str = "Invalid Location.";
pub const RETURN_FAILED: &str = "Failed to register return";
pub const PHRASE_MISMATCH: &str = "Confirmation phrase did not match.";
pub const SHIPMENT_NOT_FOUND: &str = "Shipment not found";

/// Prompt shown before a row status change.
#[must_use]
pub fn status_change_prompt(status: ShipmentStatus) -> String {
    format!("Change status to {status}?")
}

/// Prompt shown before delivering the selected shipment.
#[must_use]
pub fn deliver_prompt(shipment: &Shipment) -> String {
    format!("Deliver {}?", shipment.tracking_id)
}

/// Look up a shipment and make sure it may move to `status`.
///
/// Delivered and Returned shipments accept no further changes.
///
/// # Errors
///
/// Returns `ActionError::Api` if the list cannot be fetched or the id is
/// unknown, and `ActionError::Validation` for a move its current status does
/// not offer.
pub async fn check_transition<A: ShipmentApi>(
    api: &A,
    id: &ShipmentId,
    status: ShipmentStatus,
) -> Result<Shipment, ActionError> {
    let shipment = api
        .list()
        .await?
        .into_iter()
        .find(|s| &s.id == id)
        .ok_or_else(|| ActionError::Api(ApiError::new(SHIPMENT_NOT_FOUND)))?;

    if !shipment.status.can_transition_to(status) {
        return Err(ActionError::validation(format!(
            "Cannot change {} from {} to {status}.",
            shipment.tracking_id, shipment.status
        )));
    }
    Ok(shipment)
}

/// Move one shipment to `status`.
///
/// # Errors
///
/// Returns `ActionError::Validation` for a move the current status does not
/// offer, or `ActionError::Api` if the lookup or update fails.
#[tracing::instrument(skip(api))]
pub async fn update_status<A: ShipmentApi>(
    api: &A,
    id: &ShipmentId,
    status: ShipmentStatus,
) -> Result<String, ActionError> {
    check_transition(api, id, status).await?;
    api.update_status(id, status).await?;
    Ok(format!("Updated to {status}"))
}

/// Pick the shipment Deliver Next would deliver.
///
/// # Errors
///
/// Returns `ActionError::Validation` when nothing is Scheduled or
/// Processing, or `ActionError::Api` if the list cannot be fetched.
pub async fn next_delivery<A: ShipmentApi>(api: &A) -> Result<Shipment, ActionError> {
    let shipments = api.list().await?;
    select_next_delivery(&shipments)
        .cloned()
        .ok_or_else(|| ActionError::validation(NO_ACTIVE_SHIPMENTS))
}

/// Mark a confirmed Deliver Next choice as Delivered.
///
/// # Errors
///
/// Returns `ActionError::Validation` if the shipment is no longer active, or
/// `ActionError::Api` if the lookup or update fails.
#[tracing::instrument(skip(api))]
pub async fn deliver<A: ShipmentApi>(api: &A, id: &ShipmentId) -> Result<String, ActionError> {
    check_transition(api, id, ShipmentStatus::Delivered).await?;
    api.update_status(id, ShipmentStatus::Delivered).await?;
    Ok("Delivered!".to_string())
}

/// Create a High priority shipment directly in Returned.
///
/// # Errors
///
/// Returns `ActionError::Validation` for a blank tracking ID or destination
/// and `ActionError::Api` with a fixed message if creation fails.
#[tracing::instrument(skip(api))]
pub async fn register_return<A: ShipmentApi>(
    api: &A,
    tracking_id: &str,
    destination: &str,
) -> Result<String, ActionError> {
    let tracking_id = TrackingId::parse(tracking_id).map_err(|e| ActionError::validation(e.to_string()))?;
    let destination = destination.trim();
    if destination.is_empty() {
        return Err(ActionError::validation("destination cannot be empty"));
    }

    api.create(&NewShipment::returned(tracking_id, destination))
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "return registration failed");
            ActionError::Api(ApiError::new(RETURN_FAILED))
        })?;
    Ok("Return Registered".to_string())
}

/// Delete every shipment. Admin only, and only for the exact phrase.
///
/// # Errors
///
/// Returns `ActionError::Forbidden` for non-admins,
/// `ActionError::Validation` for any other phrase, and `ActionError::Api`
/// if the clear fails.
#[tracing::instrument(skip(api, phrase))]
pub async fn clear_all<A: ShipmentApi>(api: &A, role: Role, phrase: &str) -> Result<String, ActionError> {
    if !role.can_clear_data() {
        return Err(ActionError::Forbidden(ACCESS_DENIED.to_string()));
    }
    if !confirms_clear_all(phrase) {
        return Err(ActionError::validation(PHRASE_MISMATCH));
    }

    api.clear_all().await?;
    tracing::info!("all shipments cleared");
    Ok("All data cleared.".to_string())
}

/// Create a Scheduled parcel once its destination geocodes.
///
/// # Errors
///
/// Returns `ActionError::Validation` for a bad tracking ID or an
/// unresolvable destination (no API call is made), or `ActionError::Api` if
/// creation fails.
#[tracing::instrument(skip(api, resolver))]
pub async fn add_parcel<A: ShipmentApi, G: Geocoder>(
    api: &A,
    resolver: &GeocodeResolver<'_, G>,
    tracking_id: &str,
    destination: &str,
    priority: Priority,
) -> Result<String, ActionError> {
    let tracking_id = TrackingId::parse(tracking_id).map_err(|e| ActionError::validation(e.to_string()))?;
    if resolver.resolve(destination).await.is_none() {
        return Err(ActionError::validation(INVALID_LOCATION));
    }

    let created = api
        .create(&NewShipment::parcel(tracking_id, destination.trim(), priority))
        .await?;
    Ok(format!("Parcel Added: {}", created.tracking_id))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fleet_logistics_core::geo::Coordinates;

    use super::*;
    use crate::db::test_support::memory_pool;
    use crate::services::geocode::tests::StaticGeocoder;
    use crate::services::test_support::{FakeApi, shipment};

    #[tokio::test]
    async fn test_update_status_message() {
        let api = FakeApi::with(vec![shipment(
            "TRK002",
            "Miami",
            Priority::Medium,
            ShipmentStatus::Scheduled,
            0,
        )]);
        let msg = update_status(&api, &ShipmentId::new("id-TRK002"), ShipmentStatus::Processing)
            .await
            .unwrap();
        assert_eq!(msg, "Updated to Processing");
        assert_eq!(api.shipments()[0].status, ShipmentStatus::Processing);
    }

    #[tokio::test]
    async fn test_update_status_surfaces_api_message() {
        let api = FakeApi::with(Vec::new());
        let err = update_status(&api, &ShipmentId::new("missing"), ShipmentStatus::Delivered)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Shipment not found");
    }

    #[tokio::test]
    async fn test_update_status_rejects_finished_shipments() {
        let api = FakeApi::with(vec![
            shipment("T5", "Reno", Priority::Low, ShipmentStatus::Delivered, 0),
            shipment("T6", "Tulsa", Priority::Low, ShipmentStatus::Returned, 1),
        ]);
        for to in [ShipmentStatus::Scheduled, ShipmentStatus::Processing, ShipmentStatus::Returned] {
            let err = update_status(&api, &ShipmentId::new("id-T5"), to).await.unwrap_err();
            assert!(matches!(err, ActionError::Validation(_)), "{to}");
        }
        let err = update_status(&api, &ShipmentId::new("id-T6"), ShipmentStatus::Scheduled)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot change T6 from Returned to Scheduled.");
        assert!(api.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_update_status_rejects_moving_backwards() {
        let api = FakeApi::with(vec![shipment(
            "T7",
            "Omaha",
            Priority::High,
            ShipmentStatus::Processing,
            0,
        )]);
        let err = update_status(&api, &ShipmentId::new("id-T7"), ShipmentStatus::Scheduled)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot change T7 from Processing to Scheduled.");
        assert!(api.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_deliver_rejects_already_delivered() {
        let api = FakeApi::with(vec![shipment(
            "T8",
            "Boise",
            Priority::High,
            ShipmentStatus::Delivered,
            0,
        )]);
        let err = deliver(&api, &ShipmentId::new("id-T8")).await.unwrap_err();
        assert!(matches!(err, ActionError::Validation(_)));
        assert!(api.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_next_delivery_prefers_priority_then_oldest() {
        let api = FakeApi::with(vec![
            shipment("T1", "A", Priority::High, ShipmentStatus::Scheduled, 10),
            shipment("T2", "B", Priority::High, ShipmentStatus::Processing, 5),
            shipment("T0", "C", Priority::Low, ShipmentStatus::Scheduled, 0),
        ]);
        let next = next_delivery(&api).await.unwrap();
        assert_eq!(next.tracking_id.as_str(), "T2");
        assert_eq!(deliver_prompt(&next), "Deliver T2?");

        assert_eq!(deliver(&api, &next.id).await.unwrap(), "Delivered!");
        assert_eq!(api.mutations(), vec!["update id-T2 Delivered"]);
    }

    #[tokio::test]
    async fn test_next_delivery_with_nothing_active() {
        let api = FakeApi::with(vec![
            shipment("T3", "Denver", Priority::High, ShipmentStatus::Delivered, 0),
            shipment("T4", "Austin", Priority::High, ShipmentStatus::Returned, 1),
        ]);
        let err = next_delivery(&api).await.unwrap_err();
        assert!(matches!(err, ActionError::Validation(_)));
        assert_eq!(err.to_string(), "No active shipments");
        assert!(api.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_register_return_creates_high_returned() {
        let api = FakeApi::with(Vec::new());
        let msg = register_return(&api, " RET-7 ", " Boston ").await.unwrap();
        assert_eq!(msg, "Return Registered");

        let created = &api.shipments()[0];
        assert_eq!(created.tracking_id.as_str(), "RET-7");
        assert_eq!(created.destination, "Boston");
        assert_eq!(created.priority, Priority::High);
        assert_eq!(created.status, ShipmentStatus::Returned);
    }

    #[tokio::test]
    async fn test_register_return_aborts_on_blank_input() {
        let api = FakeApi::with(Vec::new());
        assert!(register_return(&api, "", "Boston").await.is_err());
        assert!(register_return(&api, "RET-7", "  ").await.is_err());
        assert!(api.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_register_return_failure_message() {
        let api = FakeApi::offline();
        let err = register_return(&api, "RET-7", "Boston").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to register return");
    }

    #[tokio::test]
    async fn test_clear_all_requires_admin() {
        let api = FakeApi::with(Vec::new());
        for role in [Role::Staff, Role::Customer] {
            let err = clear_all(&api, role, "DELETE ALL").await.unwrap_err();
            assert!(matches!(err, ActionError::Forbidden(_)));
            assert_eq!(err.to_string(), "Access Denied");
        }
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_clear_all_requires_exact_phrase() {
        let api = FakeApi::with(Vec::new());
        for phrase in ["", "delete all", "Delete All", "DELETE", "DELETE ALL!"] {
            let err = clear_all(&api, Role::Admin, phrase).await.unwrap_err();
            assert!(matches!(err, ActionError::Validation(_)), "{phrase:?}");
        }
        assert!(api.calls().is_empty());

        assert_eq!(
            clear_all(&api, Role::Admin, " DELETE ALL ").await.unwrap(),
            "All data cleared."
        );
        assert_eq!(api.calls(), vec!["clear"]);
    }

    #[tokio::test]
    async fn test_add_parcel_blocks_unresolvable_destination() {
        let pool = memory_pool().await;
        let geocoder = StaticGeocoder::default();
        let resolver = GeocodeResolver::new(&pool, &geocoder);
        let api = FakeApi::with(Vec::new());

        let err = add_parcel(&api, &resolver, "TRK100", "Atlantis", Priority::Low)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid Location.");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_add_parcel_creates_scheduled() {
        let pool = memory_pool().await;
        let geocoder = StaticGeocoder::with(&[("Seattle, WA", Coordinates::new(47.6062, -122.3321))]);
        let resolver = GeocodeResolver::new(&pool, &geocoder);
        let api = FakeApi::with(Vec::new());

        let msg = add_parcel(&api, &resolver, "TRK100", "Seattle, WA", Priority::High)
            .await
            .unwrap();
        assert_eq!(msg, "Parcel Added: TRK100");

        let created = &api.shipments()[0];
        assert_eq!(created.status, ShipmentStatus::Scheduled);
        assert_eq!(created.priority, Priority::High);
    }

    #[test]
    fn test_status_change_prompt() {
        assert_eq!(
            status_change_prompt(ShipmentStatus::Returned),
            "Change status to Returned?"
        );
    }
}
