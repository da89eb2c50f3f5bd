//! Order totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::CartLine;
use crate::types::money::round2;

/// The money breakdown shown at checkout and stored on every order.
///
/// All four figures are rounded to two decimal places, and the total is
/// always exactly `subtotal + gst_total + shipping_cost` rounded. Keeping
/// that arithmetic in one place is what makes invoices and order history
/// agree to the paisa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub subtotal: Decimal,
    pub gst_total: Decimal,
    pub shipping_cost: Decimal,
    pub total: Decimal,
}

impl OrderSummary {
    /// Compute the breakdown for a set of cart lines and a shipping cost.
    #[must_use]
    pub fn compute(lines: &[CartLine], shipping_cost: Decimal) -> Self {
        let subtotal = round2(lines.iter().map(CartLine::line_subtotal).sum());
        let gst_total = round2(lines.iter().map(CartLine::line_gst).sum());
        let shipping_cost = round2(shipping_cost);
        let total = round2(subtotal + gst_total + shipping_cost);
        Self {
            subtotal,
            gst_total,
            shipping_cost,
            total,
        }
    }

    /// An all-zero summary, for empty carts.
    #[must_use]
    pub fn empty() -> Self {
        Self::compute(&[], Decimal::ZERO)
    }
}
