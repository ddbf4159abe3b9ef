//! Fleet Logistics Core - Shared domain types and manifest rules.
//!
//! This crate provides the types and pure rules used across all Fleet
//! Logistics components:
//! - `api` - Shipments REST server (source of truth for shipment data)
//! - `dashboard` - Staff/customer dashboard rendering the manifest and map
//! - `cli` - Command-line tools for migrations, seeding and accounts
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. Everything the dashboard derives from a
//! fetched shipment list (sort order, customer filtering, summary counts,
//! deliver-next selection, marker colours) lives in [`manifest`] so it can be
//! tested without a server.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers and enums for shipments, users and roles
//! - [`manifest`] - Sorting, filtering and selection rules over shipment lists
//! - [`geo`] - Coordinates, address normalization and the logistics hub

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod geo;
pub mod manifest;
pub mod types;

pub use types::*;
