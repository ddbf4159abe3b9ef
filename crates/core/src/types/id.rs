//! Identifier newtypes for shipments.
//!
//! A shipment carries two identifiers: the opaque [`ShipmentId`] assigned by
//! the API server (used in URLs), and the human-facing [`TrackingId`] printed
//! on the parcel. Keeping them as distinct types stops one being passed
//! where the other is expected.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned shipment identifier.
///
/// Opaque to clients: the API server generates UUID v4 strings, but the
/// dashboard never interprets the contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShipmentId(String);

impl ShipmentId {
    /// Create a new ID from any string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ShipmentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<ShipmentId> for String {
    fn from(id: ShipmentId) -> Self {
        id.0
    }
}

/// Errors that can occur when parsing a [`TrackingId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackingIdError {
    /// The input is empty after trimming.
    #[error("tracking ID cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("tracking ID must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// Human-facing parcel tracking number (e.g. `TRK001`).
///
/// Uniqueness is assumed, never enforced: two shipments may share one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingId(String);

impl TrackingId {
    /// Maximum accepted length.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a tracking ID from user input, stripping surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or too long.
    pub fn parse(s: &str) -> Result<Self, TrackingIdError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TrackingIdError::Empty);
        }
        if s.chars().count() > Self::MAX_LENGTH {
            return Err(TrackingIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the tracking ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for TrackingId {
    type Err = TrackingIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
