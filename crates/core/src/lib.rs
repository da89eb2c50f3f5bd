//! MediMart Core - Shared types and domain logic.
//!
//! This crate provides common types used across all MediMart components:
//! - `storefront` - Public-facing medical equipment store
//! - `cli` - Command-line tools for catalog seeding and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no async. Cart arithmetic, order totals, and field validation
//! all live here so they can be tested without a running platform.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, statuses, and money math
//! - [`cart`] - The in-memory cart collection and its line operations
//! - [`summary`] - Order totals (subtotal, GST, shipping)
//! - [`validate`] - Field validators for Indian checkout forms

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod summary;
pub mod types;
pub mod validate;

pub use cart::{Cart, CartLine};
pub use summary::OrderSummary;
pub use types::*;
