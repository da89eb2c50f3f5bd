//! Domain models for the storefront.
//!
//! Each resource has a record type (the document payload stored on the
//! platform) and, where callers need it, an entity type that joins the
//! record with its server-assigned document id and timestamps.

pub mod catalog;
pub mod feedback;
pub mod history;
pub mod order;
pub mod profile;
pub mod shipping;
pub mod wishlist;

pub use catalog::{Product, ProductRecord};
pub use feedback::{Feedback, FeedbackRecord};
pub use history::CartHistoryEntry;
pub use order::{Order, OrderRecord, ShippingDetails};
pub use profile::UserProfile;
pub use shipping::ShippingCostConfig;
pub use wishlist::WishlistEntry;
