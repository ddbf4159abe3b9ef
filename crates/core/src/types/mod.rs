//! Core types for Fleet Logistics.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod shipment;
pub mod status;
pub mod timestamp;
pub mod user;

pub use email::{Email, EmailError};
pub use id::*;
pub use shipment::{NewShipment, Shipment, StatusUpdate};
pub use timestamp::{format_timestamp, parse_timestamp};
pub use status::*;
pub use user::{Account, BUILT_IN_ACCOUNTS, BuiltInAccount, User, find_built_in};
