//! Checkout: validation, pricing, and order placement.
//!
//! The summary math itself is pure (`medimart_core::OrderSummary`); this
//! service supplies its inputs from the live cart and the admin-configured
//! shipping costs, and turns a priced cart into an order document.

use chrono::Utc;
use medimart_core::types::{Envelope, OrderStatus, UserId};
use medimart_core::{validate, OrderSummary};
use thiserror::Error;
use tracing::instrument;

use crate::backend::DataGateway;
use crate::cart::CartStore;
use crate::models::{Order, OrderRecord, ShippingCostConfig, ShippingDetails};
use crate::services::Notifier;

/// Checkout failures the HTTP layer gives distinct statuses.
///
/// Platform failures are not here: those stay inside the returned envelope.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// One or more shipping fields failed validation.
    #[error("{0}")]
    Validation(String),
    /// Nothing in the cart to order.
    #[error("Your cart is empty")]
    EmptyCart,
}

/// Shared checkout service. Cheap to clone.
#[derive(Clone)]
pub struct CheckoutService {
    gateway: DataGateway,
    cart: CartStore,
    notifier: Notifier,
}

impl CheckoutService {
    #[must_use]
    pub const fn new(gateway: DataGateway, cart: CartStore, notifier: Notifier) -> Self {
        Self {
            gateway,
            cart,
            notifier,
        }
    }

    /// Price the current cart for an optional delivery state.
    ///
    /// Without a state the default shipping cost applies. An empty cart
    /// quotes all-zero.
    pub async fn summary(&self, state: Option<&str>) -> OrderSummary {
        let cart = self.cart.snapshot();
        if cart.is_empty() {
            return OrderSummary::empty();
        }
        let config = self.shipping_config().await;
        let shipping_cost = config.cost_for_state(state.unwrap_or_default());
        OrderSummary::compute(cart.lines(), shipping_cost)
    }

    /// Validate shipping details and place the order.
    ///
    /// On a successful placement the cart is cleared and a success notice
    /// is pushed; a platform failure comes back inside the envelope and
    /// leaves the cart untouched so the shopper can retry.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` for invalid shipping details or an empty
    /// cart; those never reach the platform.
    #[instrument(skip_all, fields(user = %uid))]
    pub async fn place_order(
        &self,
        uid: &UserId,
        details: ShippingDetails,
    ) -> Result<Envelope<Order>, CheckoutError> {
        validate_details(&details)?;

        let cart = self.cart.snapshot();
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let config = self.shipping_config().await;
        let shipping_cost = config.cost_for_state(&details.state);
        let summary = OrderSummary::compute(cart.lines(), shipping_cost);

        let record = OrderRecord {
            user_id: uid.clone(),
            lines: cart.into_lines(),
            summary,
            status: OrderStatus::default(),
            shipping: details,
            placed_at: Utc::now(),
        };

        let envelope = self.gateway.create_order(record).await;
        if envelope.success {
            self.cart.clear();
            self.notifier.success("Order placed successfully");
        } else {
            self.notifier.error("Could not place your order");
        }
        Ok(envelope)
    }

    /// Current shipping config; checkout is never blocked on fetching it.
    async fn shipping_config(&self) -> ShippingCostConfig {
        let envelope = self.gateway.get_shipping_costs().await;
        envelope.data.unwrap_or_else(|| {
            tracing::warn!("shipping config unavailable, using defaults");
            ShippingCostConfig::default()
        })
    }
}

/// Check every shipping field, reporting all problems at once.
fn validate_details(details: &ShippingDetails) -> Result<(), CheckoutError> {
    let mut problems = Vec::new();
    if let Err(err) = validate::name(&details.name) {
        problems.push(err.to_string());
    }
    if let Err(err) = validate::email(&details.email) {
        problems.push(err.to_string());
    }
    if let Err(err) = validate::phone(&details.phone) {
        problems.push(err.to_string());
    }
    if let Err(err) = validate::address(&details.address) {
        problems.push(err.to_string());
    }
    if let Err(err) = validate::postal_code(&details.postal_code, Some(&details.state)) {
        problems.push(err.to_string());
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(CheckoutError::Validation(problems.join("; ")))
    }
}
