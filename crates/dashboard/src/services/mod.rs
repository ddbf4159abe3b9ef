//! Business logic services for the dashboard.
//!
//! # Services
//!
//! - `directory` - Mock user directory (built-ins plus Staff signups)
//! - `geocode` - Cache-first address geocoding
//! - `map` - Map frame construction for the Leaflet script
//! - `dashboard` - Refresh cycle: fetch, filter, sort, summarize
//! - `actions` - Mutations behind the dashboard buttons

pub mod actions;
pub mod dashboard;
pub mod directory;
pub mod geocode;
pub mod map;

pub use actions::ActionError;
pub use dashboard::{ApiStatus, DashboardView, MapPanel};
pub use directory::{Registration, SignupError, SignupRequest, UserDirectory};
pub use geocode::{GeocodeResolver, Geocoder, NominatimGeocoder};
pub use map::MapFrame;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use chrono::{Duration, TimeZone, Utc};

    use fleet_logistics_core::{
        NewShipment, Priority, Shipment, ShipmentId, ShipmentStatus, TrackingId,
    };

    use crate::client::{ApiError, ShipmentApi};

    /// A shipment created `minutes` after a fixed base time.
    pub(crate) fn shipment(
        tracking: &str,
        destination: &str,
        priority: Priority,
        status: ShipmentStatus,
        minutes: i64,
    ) -> Shipment {
        Shipment {
            id: ShipmentId::new(format!("id-{tracking}")),
            tracking_id: TrackingId::parse(tracking).unwrap(),
            destination: destination.to_string(),
            priority,
            status,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
                + Duration::minutes(minutes),
        }
    }

    /// In-memory stand-in for the shipments API that records every call.
    #[derive(Default)]
    pub(crate) struct FakeApi {
        shipments: Mutex<Vec<Shipment>>,
        calls: Mutex<Vec<String>>,
        offline: bool,
    }

    impl FakeApi {
        pub(crate) fn with(shipments: Vec<Shipment>) -> Self {
            Self {
                shipments: Mutex::new(shipments),
                ..Self::default()
            }
        }

        pub(crate) fn offline() -> Self {
            Self {
                offline: true,
                ..Self::default()
            }
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub(crate) fn mutations(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter(|c| c != "list")
                .collect()
        }

        pub(crate) fn shipments(&self) -> Vec<Shipment> {
            self.shipments.lock().unwrap().clone()
        }

        fn record(&self, call: String) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push(call);
            if self.offline {
                Err(ApiError::new("Could not reach the shipments API"))
            } else {
                Ok(())
            }
        }
    }

    impl ShipmentApi for FakeApi {
        async fn list(&self) -> Result<Vec<Shipment>, ApiError> {
            self.record("list".to_string())
                .map_err(|_| ApiError::new("API Error"))?;
            Ok(self.shipments())
        }

        async fn create(&self, data: &NewShipment) -> Result<Shipment, ApiError> {
            self.record(format!("create {}", data.tracking_id))?;
            let mut shipments = self.shipments.lock().unwrap();
            let created = Shipment {
                id: ShipmentId::new(format!("id-{}", data.tracking_id)),
                tracking_id: data.tracking_id.clone(),
                destination: data.destination.clone(),
                priority: data.priority,
                status: data.status,
                created_at: Utc::now(),
            };
            shipments.push(created.clone());
            Ok(created)
        }

        async fn update_status(
            &self,
            id: &ShipmentId,
            status: ShipmentStatus,
        ) -> Result<Shipment, ApiError> {
            self.record(format!("update {id} {status}"))?;
            let mut shipments = self.shipments.lock().unwrap();
            let found = shipments
                .iter_mut()
                .find(|s| &s.id == id)
                .ok_or_else(|| ApiError::new("Shipment not found"))?;
            found.status = status;
            Ok(found.clone())
        }

        async fn clear_all(&self) -> Result<(), ApiError> {
            self.record("clear".to_string())?;
            self.shipments.lock().unwrap().clear();
            Ok(())
        }
    }
}
