//! Request extractors gating protected routes.

pub mod auth;

pub use auth::{OptionalAuth, RequireAdmin, RequireAuth};
