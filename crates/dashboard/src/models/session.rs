//! Session-stored state.
//!
//! Stands in for what a browser client would hold in local storage: the
//! signed-in user, a one-shot notification and the map panel flag.

use serde::{Deserialize, Serialize};

/// Notification severity, used as a CSS modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Info,
    Error,
}

impl FlashKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

/// A transient notification shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Info,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// Session keys.
pub mod keys {
    /// The signed-in [`fleet_logistics_core::User`].
    pub const CURRENT_USER: &str = "current_user";

    /// Pending [`super::Flash`].
    pub const FLASH: &str = "flash";

    /// Whether the map panel is expanded.
    pub const MAP_OPEN: &str = "map_open";

    /// Set by the toggle that opened the panel, consumed by the next render.
    pub const MAP_JUST_OPENED: &str = "map_just_opened";
}
