//! Status, priority and role enums.
//!
//! All three serialize as their `PascalCase` variant names (`"Scheduled"`,
//! `"High"`, `"Admin"`), which is the wire format of the shipments API and
//! of the persisted user directory.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a known variant.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Shipment lifecycle status.
///
/// ```text
/// Scheduled ──► Processing
///     │             │
///     ├─────────────┼──► Delivered  (terminal)
///     └─────────────┴──► Returned   (terminal)
/// ```
///
/// The "register a return" flow creates shipments directly in `Returned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ShipmentStatus {
    #[default]
    Scheduled,
    Processing,
    Delivered,
    Returned,
}

impl ShipmentStatus {
    /// Every status, in manifest sort order.
    pub const ALL: [Self; 4] = [
        Self::Scheduled,
        Self::Processing,
        Self::Returned,
        Self::Delivered,
    ];

    /// Wire/display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Processing => "Processing",
            Self::Delivered => "Delivered",
            Self::Returned => "Returned",
        }
    }

    /// Delivered and Returned admit no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Returned)
    }

    /// Scheduled and Processing shipments are still moving.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !self.is_terminal()
    }

    /// Manifest ordering: Scheduled < Processing < Returned < Delivered.
    #[must_use]
    pub const fn sort_rank(self) -> u8 {
        match self {
            Self::Scheduled => 1,
            Self::Processing => 2,
            Self::Returned => 3,
            Self::Delivered => 4,
        }
    }

    /// Statuses a staff member may move this shipment to.
    #[must_use]
    pub const fn next_statuses(self) -> &'static [Self] {
        match self {
            Self::Scheduled => &[Self::Processing, Self::Delivered, Self::Returned],
            Self::Processing => &[Self::Delivered, Self::Returned],
            Self::Delivered | Self::Returned => &[],
        }
    }

    /// Whether `next` is offered as a transition from this status.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.next_statuses().contains(&next)
    }

    /// Label of the row-menu entry that moves a shipment into this status.
    ///
    /// `None` for Scheduled, which no transition leads back to.
    #[must_use]
    pub const fn action_label(self) -> Option<&'static str> {
        match self {
            Self::Scheduled => None,
            Self::Processing => Some("Start Transit"),
            Self::Delivered => Some("Mark Delivered"),
            Self::Returned => Some("Mark Returned"),
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ShipmentStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Scheduled" => Ok(Self::Scheduled),
            "Processing" => Ok(Self::Processing),
            "Delivered" => Ok(Self::Delivered),
            "Returned" => Ok(Self::Returned),
            _ => Err(ParseEnumError {
                kind: "shipment status",
                value: s.to_owned(),
            }),
        }
    }
}

/// Shipment handling priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Every priority, highest first (form option order).
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Wire/display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Numeric weight used by deliver-next selection (higher goes first).
    #[must_use]
    pub const fn weight(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Self::Low),
            "Medium" => Ok(Self::Medium),
            "High" => Ok(Self::High),
            _ => Err(ParseEnumError {
                kind: "priority",
                value: s.to_owned(),
            }),
        }
    }
}

/// Dashboard account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full manifest access including clearing all data.
    Admin,
    /// Manifest access; accounts created via signup.
    Staff,
    /// Read-only view of allow-listed shipments.
    Customer,
}

impl Role {
    /// Wire/display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Staff => "Staff",
            Self::Customer => "Customer",
        }
    }

    /// Admin and Staff see the manifest, summary counts and map.
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(self, Self::Admin | Self::Staff)
    }

    /// Only Admin may wipe server data.
    #[must_use]
    pub const fn can_clear_data(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Self::Admin),
            "Staff" => Ok(Self::Staff),
            "Customer" => Ok(Self::Customer),
            _ => Err(ParseEnumError {
                kind: "role",
                value: s.to_owned(),
            }),
        }
    }
}
