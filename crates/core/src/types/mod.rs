//! Core types for MediMart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod envelope;
pub mod id;
pub mod money;
pub mod status;

pub use email::{Email, EmailError};
pub use envelope::Envelope;
pub use id::*;
pub use status::*;
