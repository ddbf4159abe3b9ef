//! The refresh cycle.
//!
//! Every page render fetches the full shipment list and rebuilds the view
//! from scratch. Two refreshes racing each other may render in either order.

use chrono::{DateTime, Utc};

use fleet_logistics_core::manifest::{Summary, visible_manifest};
use fleet_logistics_core::{Priority, Shipment, ShipmentId, ShipmentStatus, TrackingId, User};

use crate::client::ShipmentApi;

use super::geocode::{GeocodeResolver, Geocoder};
use super::map::MapFrame;

/// Shown in place of summary counts when the API is unreachable.
pub const SUMMARY_UNAVAILABLE: &str = "ERR";
/// Empty manifest.
pub const NO_SHIPMENTS: &str = "No shipments found.";
/// Failed fetch.
pub const CANNOT_CONNECT: &str = "Cannot connect to server.";

/// Result of the last fetch, shown in the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    Online,
    Offline,
}

impl ApiStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Online => "API Online",
            Self::Offline => "API Offline",
        }
    }

    #[must_use]
    pub const fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

/// Map panel state for this render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapPanel {
    pub open: bool,
    /// The panel opened with this request; the map must resize after the animation.
    pub just_opened: bool,
}

/// Summary counts as displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    pub total: String,
    pub high_priority: String,
    pub delivered: String,
}

impl SummaryView {
    fn counts(summary: Summary) -> Self {
        Self {
            total: summary.total.to_string(),
            high_priority: summary.high_priority.to_string(),
            delivered: summary.delivered.to_string(),
        }
    }

    fn unavailable() -> Self {
        Self {
            total: SUMMARY_UNAVAILABLE.to_string(),
            high_priority: SUMMARY_UNAVAILABLE.to_string(),
            delivered: SUMMARY_UNAVAILABLE.to_string(),
        }
    }
}

/// One entry of a row's action menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowAction {
    pub status: ShipmentStatus,
    pub label: &'static str,
}

/// One manifest row.
#[derive(Debug, Clone)]
pub struct ManifestRow {
    pub id: ShipmentId,
    pub tracking_id: TrackingId,
    pub destination: String,
    pub priority: Priority,
    pub status: ShipmentStatus,
    pub created_at: DateTime<Utc>,
    /// Empty for terminal rows, which show "Completed" instead.
    pub actions: Vec<RowAction>,
    pub menu_open: bool,
}

impl ManifestRow {
    fn new(shipment: Shipment, open_menu: Option<&ShipmentId>) -> Self {
        let actions = shipment
            .status
            .next_statuses()
            .iter()
            .filter_map(|&status| {
                status
                    .action_label()
                    .map(|label| RowAction { status, label })
            })
            .collect::<Vec<_>>();
        let menu_open = !actions.is_empty() && open_menu == Some(&shipment.id);

        Self {
            id: shipment.id,
            tracking_id: shipment.tracking_id,
            destination: shipment.destination,
            priority: shipment.priority,
            status: shipment.status,
            created_at: shipment.created_at,
            actions,
            menu_open,
        }
    }

    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.status.is_terminal()
    }

    /// Creation time as `HH:MM` (UTC).
    #[must_use]
    pub fn time(&self) -> String {
        self.created_at.format("%H:%M").to_string()
    }
}

/// Everything a dashboard page shows for one user.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub user: User,
    pub api: ApiStatus,
    /// Staff only.
    pub summary: Option<SummaryView>,
    pub rows: Vec<ManifestRow>,
    /// Shown when `rows` is empty.
    pub empty_message: &'static str,
    /// Staff only.
    pub map: Option<MapFrame>,
}

impl DashboardView {
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        self.user.role.is_staff()
    }

    #[must_use]
    pub const fn can_clear_data(&self) -> bool {
        self.user.role.can_clear_data()
    }
}

/// Fetch the manifest and build the view for `user`.
///
/// Customers see the allow-listed subset with no summary or map. A failed
/// fetch renders as offline rather than failing the page.
pub async fn refresh<A: ShipmentApi, G: Geocoder>(
    api: &A,
    resolver: &GeocodeResolver<'_, G>,
    user: User,
    open_menu: Option<&ShipmentId>,
    panel: MapPanel,
) -> DashboardView {
    let is_staff = user.role.is_staff();

    let fetched = match api.list().await {
        Ok(shipments) => Some(shipments),
        Err(e) => {
            tracing::warn!(error = %e, "manifest refresh failed");
            None
        }
    };

    let Some(shipments) = fetched else {
        return DashboardView {
            summary: is_staff.then(SummaryView::unavailable),
            map: is_staff.then(|| MapFrame::hub_only(panel.open)),
            user,
            api: ApiStatus::Offline,
            rows: Vec::new(),
            empty_message: CANNOT_CONNECT,
        };
    };

    let (summary, map) = if is_staff {
        let frame = MapFrame::build(resolver, &shipments, panel.open, panel.just_opened).await;
        (
            Some(SummaryView::counts(Summary::from_shipments(&shipments))),
            Some(frame),
        )
    } else {
        (None, None)
    };

    let rows = visible_manifest(user.role, shipments)
        .into_iter()
        .map(|s| ManifestRow::new(s, open_menu.filter(|_| is_staff)))
        .collect();

    DashboardView {
        user,
        api: ApiStatus::Online,
        summary,
        rows,
        empty_message: NO_SHIPMENTS,
        map,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fleet_logistics_core::{Email, Role};

    use super::*;
    use crate::db::test_support::memory_pool;
    use crate::services::geocode::tests::StaticGeocoder;
    use crate::services::test_support::{FakeApi, shipment};

    fn user(role: Role) -> User {
        User {
            username: "Test".to_string(),
            email: Email::parse("test@fleet.test").unwrap(),
            role,
        }
    }

    fn demo() -> Vec<Shipment> {
        vec![
            shipment("TRK001", "Dallas, TX", Priority::High, ShipmentStatus::Processing, 0),
            shipment("TRK002", "Miami, FL", Priority::Medium, ShipmentStatus::Scheduled, 1),
            shipment("TRK003", "Denver, CO", Priority::Low, ShipmentStatus::Delivered, 2),
            shipment("TRK999", "New York, NY", Priority::High, ShipmentStatus::Scheduled, 3),
        ]
    }

    fn tracking(view: &DashboardView) -> Vec<&str> {
        view.rows.iter().map(|r| r.tracking_id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_staff_view_sorted_with_summary_and_map() {
        let pool = memory_pool().await;
        let geocoder = StaticGeocoder::default();
        let resolver = GeocodeResolver::new(&pool, &geocoder);
        let api = FakeApi::with(demo());

        let view = refresh(&api, &resolver, user(Role::Staff), None, MapPanel::default()).await;

        assert_eq!(view.api, ApiStatus::Online);
        assert_eq!(tracking(&view), vec!["TRK999", "TRK002", "TRK001", "TRK003"]);
        let summary = view.summary.unwrap();
        assert_eq!(summary.total, "4");
        assert_eq!(summary.high_priority, "2");
        assert_eq!(summary.delivered, "1");
        assert!(view.map.is_some());
    }

    #[tokio::test]
    async fn test_customer_view_is_allow_listed_only() {
        let pool = memory_pool().await;
        let geocoder = StaticGeocoder::default();
        let resolver = GeocodeResolver::new(&pool, &geocoder);
        let api = FakeApi::with(demo());

        let view = refresh(&api, &resolver, user(Role::Customer), None, MapPanel::default()).await;

        assert_eq!(tracking(&view), vec!["TRK002", "TRK001", "TRK003"]);
        assert!(view.summary.is_none());
        assert!(view.map.is_none());
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn test_offline_renders_err_summary() {
        let pool = memory_pool().await;
        let geocoder = StaticGeocoder::default();
        let resolver = GeocodeResolver::new(&pool, &geocoder);
        let api = FakeApi::offline();

        let view = refresh(&api, &resolver, user(Role::Admin), None, MapPanel::default()).await;

        assert_eq!(view.api, ApiStatus::Offline);
        assert_eq!(view.api.label(), "API Offline");
        assert_eq!(view.summary.unwrap().total, "ERR");
        assert!(view.rows.is_empty());
        assert_eq!(view.empty_message, "Cannot connect to server.");
    }

    #[tokio::test]
    async fn test_empty_manifest_message() {
        let pool = memory_pool().await;
        let geocoder = StaticGeocoder::default();
        let resolver = GeocodeResolver::new(&pool, &geocoder);
        let api = FakeApi::with(Vec::new());

        let view = refresh(&api, &resolver, user(Role::Staff), None, MapPanel::default()).await;
        assert!(view.rows.is_empty());
        assert_eq!(view.empty_message, "No shipments found.");
        assert_eq!(view.summary.unwrap().total, "0");
    }

    #[tokio::test]
    async fn test_row_actions_and_single_open_menu() {
        let pool = memory_pool().await;
        let geocoder = StaticGeocoder::default();
        let resolver = GeocodeResolver::new(&pool, &geocoder);
        let api = FakeApi::with(demo());
        let open = ShipmentId::new("id-TRK002");

        let view = refresh(&api, &resolver, user(Role::Staff), Some(&open), MapPanel::default()).await;

        let open_rows: Vec<_> = view.rows.iter().filter(|r| r.menu_open).collect();
        assert_eq!(open_rows.len(), 1);
        assert_eq!(open_rows[0].tracking_id.as_str(), "TRK002");

        let labels: Vec<_> = open_rows[0].actions.iter().map(|a| a.label).collect();
        assert_eq!(labels, vec!["Start Transit", "Mark Delivered", "Mark Returned"]);

        let delivered = view.rows.iter().find(|r| r.tracking_id.as_str() == "TRK003").unwrap();
        assert!(delivered.is_completed());
        assert_eq!(delivered.time(), "09:02");
        assert!(delivered.actions.is_empty());
    }

    #[tokio::test]
    async fn test_customers_never_get_menus() {
        let pool = memory_pool().await;
        let geocoder = StaticGeocoder::default();
        let resolver = GeocodeResolver::new(&pool, &geocoder);
        let api = FakeApi::with(demo());
        let open = ShipmentId::new("id-TRK002");

        let view = refresh(&api, &resolver, user(Role::Customer), Some(&open), MapPanel::default()).await;
        assert!(view.rows.iter().all(|r| !r.menu_open));
    }
}
