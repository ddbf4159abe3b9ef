//! HTTP middleware for the dashboard.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (binary only)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `SQLite` store)

pub mod auth;
pub mod session;

pub use auth::{
    AuthRejection, OptionalAuth, RequireAuth, RequireStaff, clear_current_user, set_current_user,
};
pub use session::{
    SESSION_COOKIE_NAME, create_session_layer, create_session_store, map_open, set_flash,
    take_flash, take_map_just_opened, toggle_map,
};
