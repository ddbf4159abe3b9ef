//! Coordinates and address normalization.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
///
/// Serialized as a two-element array `[lat, lon]`, the shape Leaflet takes
/// and the shape the geocode cache persists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(c: Coordinates) -> Self {
        [c.lat, c.lon]
    }
}

/// Main logistics hub, always shown on the map.
pub const HUB: Coordinates = Coordinates::new(41.8781, -87.6298);

/// Popup text of the hub marker.
pub const HUB_LABEL: &str = "Main Logistics Hub (Chicago)";

/// Cache key for an address: surrounding whitespace removed, lowercased.
///
/// Returns `None` for a blank address, which can never be geocoded.
#[must_use]
pub fn normalize_address(address: &str) -> Option<String> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
