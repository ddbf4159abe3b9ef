//! Rules applied to a freshly fetched shipment list.
//!
//! Everything here is pure: the dashboard fetches the full list from the API
//! on every refresh, then derives the rendered manifest, the staff summary,
//! the deliver-next candidate and the map marker colours from it.

use core::cmp::Ordering;

use serde::Serialize;

use crate::types::{Priority, Role, Shipment, ShipmentStatus};

/// Tracking IDs a customer may see. Enforced only when rendering.
pub const CUSTOMER_ALLOWED_TRACKING_IDS: [&str; 3] = ["TRK001", "TRK002", "TRK003"];

/// Phrase an admin must type to clear all data.
pub const CLEAR_ALL_PHRASE: &str = "DELETE ALL";

/// Display order: status rank ascending, then newest first.
fn display_order(a: &Shipment, b: &Shipment) -> Ordering {
    a.status
        .sort_rank()
        .cmp(&b.status.sort_rank())
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Sort in place into manifest display order.
pub fn sort_for_display(shipments: &mut [Shipment]) {
    shipments.sort_by(display_order);
}

/// Whether a customer may see this shipment.
#[must_use]
pub fn is_customer_visible(shipment: &Shipment) -> bool {
    CUSTOMER_ALLOWED_TRACKING_IDS.contains(&shipment.tracking_id.as_str())
}

/// Restrict a fetched list to what `role` may see, then sort it.
#[must_use]
pub fn visible_manifest(role: Role, mut shipments: Vec<Shipment>) -> Vec<Shipment> {
    if !role.is_staff() {
        shipments.retain(is_customer_visible);
    }
    sort_for_display(&mut shipments);
    shipments
}

/// Staff summary counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    /// High priority and not yet delivered (returns still count).
    pub high_priority: usize,
    pub delivered: usize,
}

impl Summary {
    #[must_use]
    pub fn from_shipments(shipments: &[Shipment]) -> Self {
        shipments.iter().fold(Self::default(), |mut acc, s| {
            acc.total += 1;
            if s.priority == Priority::High && s.status != ShipmentStatus::Delivered {
                acc.high_priority += 1;
            }
            if s.status == ShipmentStatus::Delivered {
                acc.delivered += 1;
            }
            acc
        })
    }
}

/// The active shipment to deliver next: highest priority, then oldest.
///
/// Returns `None` when nothing is Scheduled or Processing.
#[must_use]
pub fn select_next_delivery(shipments: &[Shipment]) -> Option<&Shipment> {
    shipments.iter().filter(|s| s.is_active()).min_by(|a, b| {
        b.priority
            .weight()
            .cmp(&a.priority.weight())
            .then_with(|| a.created_at.cmp(&b.created_at))
    })
}

/// Map marker colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Red,
    Blue,
    Gold,
}

impl MarkerColor {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Gold => "gold",
        }
    }
}

/// High priority is red, otherwise in-transit is blue, otherwise gold.
#[must_use]
pub fn marker_color(shipment: &Shipment) -> MarkerColor {
    if shipment.priority == Priority::High {
        MarkerColor::Red
    } else if shipment.status == ShipmentStatus::Processing {
        MarkerColor::Blue
    } else {
        MarkerColor::Gold
    }
}

/// Only shipments still moving are placed on the map.
#[must_use]
pub fn is_plottable(shipment: &Shipment) -> bool {
    shipment.is_active()
}

/// Whether typed confirmation input authorizes clearing all data.
///
/// Surrounding whitespace is ignored; the comparison is case-sensitive.
#[must_use]
pub fn confirms_clear_all(input: &str) -> bool {
    input.trim() == CLEAR_ALL_PHRASE
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::*;
    use crate::types::{ShipmentId, TrackingId};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn shipment(
        tracking: &str,
        priority: Priority,
        status: ShipmentStatus,
        minutes: i64,
    ) -> Shipment {
        Shipment {
            id: ShipmentId::new(format!("id-{tracking}")),
            tracking_id: TrackingId::parse(tracking).unwrap(),
            destination: format!("{tracking} destination"),
            priority,
            status,
            created_at: base_time() + Duration::minutes(minutes),
        }
    }

    fn mixed() -> Vec<Shipment> {
        vec![
            shipment("TRK003", Priority::Low, ShipmentStatus::Delivered, 5),
            shipment("TRK999", Priority::High, ShipmentStatus::Scheduled, 1),
            shipment("TRK001", Priority::High, ShipmentStatus::Processing, 2),
            shipment("RET1", Priority::High, ShipmentStatus::Returned, 9),
            shipment("TRK002", Priority::Medium, ShipmentStatus::Scheduled, 7),
            shipment("TRK004", Priority::Low, ShipmentStatus::Delivered, 8),
        ]
    }

    #[test]
    fn test_sort_groups_by_status_rank() {
        let mut list = mixed();
        sort_for_display(&mut list);
        let ranks: Vec<u8> = list.iter().map(|s| s.status.sort_rank()).collect();
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        assert_eq!(ranks, sorted);
    }

    #[test]
    fn test_sort_ties_newest_first() {
        let mut list = mixed();
        sort_for_display(&mut list);
        let ids: Vec<&str> = list.iter().map(|s| s.tracking_id.as_str()).collect();
        assert_eq!(ids, vec!["TRK002", "TRK999", "TRK001", "RET1", "TRK004", "TRK003"]);
    }

    #[test]
    fn test_sort_holds_for_every_rotation() {
        let list = mixed();
        for k in 0..list.len() {
            let mut rotated = list.clone();
            rotated.rotate_left(k);
            sort_for_display(&mut rotated);
            for pair in rotated.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                assert!(a.status.sort_rank() <= b.status.sort_rank());
                if a.status == b.status {
                    assert!(a.created_at >= b.created_at);
                }
            }
        }
    }

    #[test]
    fn test_customer_sees_only_allow_list() {
        let visible = visible_manifest(Role::Customer, mixed());
        let mut ids: Vec<&str> = visible.iter().map(|s| s.tracking_id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["TRK001", "TRK002", "TRK003"]);
    }

    #[test]
    fn test_customer_filter_with_no_matches() {
        let list = vec![shipment("TRK999", Priority::High, ShipmentStatus::Scheduled, 0)];
        assert!(visible_manifest(Role::Customer, list).is_empty());
        assert!(visible_manifest(Role::Customer, Vec::new()).is_empty());
    }

    #[test]
    fn test_staff_sees_everything() {
        assert_eq!(visible_manifest(Role::Staff, mixed()).len(), 6);
        assert_eq!(visible_manifest(Role::Admin, mixed()).len(), 6);
    }

    #[test]
    fn test_summary_counts() {
        let summary = Summary::from_shipments(&mixed());
        assert_eq!(
            summary,
            Summary {
                total: 6,
                high_priority: 3,
                delivered: 2,
            }
        );
        assert_eq!(Summary::from_shipments(&[]), Summary::default());
    }

    #[test]
    fn test_next_delivery_prefers_priority_then_oldest() {
        let list = vec![
            shipment("A", Priority::High, ShipmentStatus::Scheduled, 10),
            shipment("B", Priority::High, ShipmentStatus::Processing, 5),
            shipment("C", Priority::Low, ShipmentStatus::Scheduled, 0),
        ];
        assert_eq!(select_next_delivery(&list).unwrap().tracking_id.as_str(), "B");
    }

    #[test]
    fn test_next_delivery_skips_terminal() {
        let list = vec![
            shipment("A", Priority::High, ShipmentStatus::Returned, 0),
            shipment("B", Priority::High, ShipmentStatus::Delivered, 0),
            shipment("C", Priority::Medium, ShipmentStatus::Scheduled, 3),
        ];
        assert_eq!(select_next_delivery(&list).unwrap().tracking_id.as_str(), "C");
    }

    #[test]
    fn test_next_delivery_none_when_idle() {
        let list = vec![shipment("A", Priority::High, ShipmentStatus::Delivered, 0)];
        assert!(select_next_delivery(&list).is_none());
        assert!(select_next_delivery(&[]).is_none());
    }

    #[test]
    fn test_marker_colors() {
        let high = shipment("A", Priority::High, ShipmentStatus::Scheduled, 0);
        let moving = shipment("B", Priority::Medium, ShipmentStatus::Processing, 0);
        let waiting = shipment("C", Priority::Low, ShipmentStatus::Scheduled, 0);
        assert_eq!(marker_color(&high), MarkerColor::Red);
        assert_eq!(marker_color(&moving), MarkerColor::Blue);
        assert_eq!(marker_color(&waiting), MarkerColor::Gold);
    }

    #[test]
    fn test_terminal_shipments_not_plottable() {
        assert!(!is_plottable(&shipment("A", Priority::High, ShipmentStatus::Delivered, 0)));
        assert!(!is_plottable(&shipment("B", Priority::High, ShipmentStatus::Returned, 0)));
        assert!(is_plottable(&shipment("C", Priority::Low, ShipmentStatus::Scheduled, 0)));
    }

    #[test]
    fn test_clear_all_phrase() {
        assert!(confirms_clear_all("DELETE ALL"));
        assert!(confirms_clear_all("  DELETE ALL \n"));
        assert!(!confirms_clear_all("delete all"));
        assert!(!confirms_clear_all("Delete All"));
        assert!(!confirms_clear_all("DELETE"));
        assert!(!confirms_clear_all(""));
    }
}
