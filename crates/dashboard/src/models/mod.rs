//! Types kept in the dashboard session.

pub mod session;

pub use session::{Flash, FlashKind, keys as session_keys};
