//! Map frame: everything the Leaflet script needs to draw one render.
//!
//! The page embeds a [`MapFrame`] as JSON. `static/js/map.js` owns the
//! single map instance and marker layer, clears the layer, draws the frame
//! and, when `invalidateAfterMs` is set, calls `invalidateSize()` once the
//! panel's expand animation has finished.

use serde::Serialize;

use fleet_logistics_core::geo::{Coordinates, HUB, HUB_LABEL};
use fleet_logistics_core::manifest::{MarkerColor, is_plottable, marker_color};
use fleet_logistics_core::{Shipment, ShipmentStatus, TrackingId};

use super::geocode::{GeocodeResolver, Geocoder};

/// Zoom of the initial view, before any frame is applied.
pub const INITIAL_ZOOM: u8 = 4;
/// Zoom when only the hub is shown.
pub const HUB_ONLY_ZOOM: u8 = 5;
/// Padding in pixels around fitted bounds.
pub const FIT_PADDING: u16 = 50;
/// Length of the panel expand animation.
pub const EXPAND_ANIMATION_MS: u32 = 400;

const TILE_URL: &str = "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png";
const TILE_ATTRIBUTION: &str = "© OSM © CARTO";

/// Tile layer settings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tiles {
    pub url: &'static str,
    pub attribution: &'static str,
    pub subdomains: &'static str,
    pub max_zoom: u8,
}

impl Default for Tiles {
    fn default() -> Self {
        Self {
            url: TILE_URL,
            attribution: TILE_ATTRIBUTION,
            subdomains: "abcd",
            max_zoom: 19,
        }
    }
}

/// The fixed hub marker.
#[derive(Debug, Clone, Serialize)]
pub struct Hub {
    pub position: Coordinates,
    pub label: &'static str,
}

/// One shipment on the map.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub position: Coordinates,
    pub tracking_id: TrackingId,
    pub status: ShipmentStatus,
    pub destination: String,
    pub color: MarkerColor,
}

/// How the view is positioned after drawing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum Viewport {
    /// Fit the hub plus every marker.
    FitBounds { points: Vec<Coordinates>, padding: u16 },
    /// Nothing plottable: centre on the hub.
    Center { center: Coordinates, zoom: u8 },
}

/// A complete map render.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapFrame {
    pub open: bool,
    pub initial_zoom: u8,
    pub tiles: Tiles,
    pub hub: Hub,
    pub markers: Vec<Marker>,
    pub viewport: Viewport,
    /// Set when the panel was just opened.
    pub invalidate_after_ms: Option<u32>,
}

impl MapFrame {
    /// A frame with only the hub.
    #[must_use]
    pub fn hub_only(open: bool) -> Self {
        Self::from_markers(Vec::new(), open, false)
    }

    /// Place markers for every non-terminal shipment.
    ///
    /// Destinations are resolved one at a time; unresolvable ones are left
    /// off the map.
    pub async fn build<G: Geocoder>(
        resolver: &GeocodeResolver<'_, G>,
        shipments: &[Shipment],
        open: bool,
        just_opened: bool,
    ) -> Self {
        let mut markers = Vec::new();
        for shipment in shipments.iter().filter(|s| is_plottable(s)) {
            if let Some(position) = resolver.resolve(&shipment.destination).await {
                markers.push(Marker {
                    position,
                    tracking_id: shipment.tracking_id.clone(),
                    status: shipment.status,
                    destination: shipment.destination.clone(),
                    color: marker_color(shipment),
                });
            }
        }
        Self::from_markers(markers, open, just_opened)
    }

    fn from_markers(markers: Vec<Marker>, open: bool, just_opened: bool) -> Self {
        let viewport = if markers.is_empty() {
            Viewport::Center {
                center: HUB,
                zoom: HUB_ONLY_ZOOM,
            }
        } else {
            let points = std::iter::once(HUB)
                .chain(markers.iter().map(|m| m.position))
                .collect();
            Viewport::FitBounds {
                points,
                padding: FIT_PADDING,
            }
        };

        Self {
            open,
            initial_zoom: INITIAL_ZOOM,
            tiles: Tiles::default(),
            hub: Hub {
                position: HUB,
                label: HUB_LABEL,
            },
            markers,
            viewport,
            invalidate_after_ms: (open && just_opened).then_some(EXPAND_ANIMATION_MS),
        }
    }

    /// JSON for the page's `data-map-frame` attribute.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::error!(error = %e, "map frame did not serialize");
            "null".to_string()
        })
    }
}
