//! The in-memory cart collection.
//!
//! A cart is a list of lines keyed by product ID. Each line carries a
//! snapshot of the product taken when it was added, so later catalog edits
//! do not change what the shopper already put in the cart. All operations
//! are pure; persistence and identity live in the storefront crate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// One cart entry: a product snapshot plus a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    #[serde(default, deserialize_with = "crate::types::money::lenient_price")]
    pub unit_price: Decimal,
    pub quantity: u32,
    #[serde(
        default = "crate::types::money::default_gst_rate",
        deserialize_with = "crate::types::money::lenient_gst"
    )]
    pub gst_percentage: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CartLine {
    /// Price times quantity, before tax.
    #[must_use]
    pub fn line_subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// GST charged on this line.
    #[must_use]
    pub fn line_gst(&self) -> Decimal {
        self.line_subtotal() * self.gst_percentage / Decimal::ONE_HUNDRED
    }

    /// Subtotal plus GST.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.line_subtotal() + self.line_gst()
    }
}

/// A shopping cart: at most one line per product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Rebuild a cart from previously serialized lines.
    ///
    /// Duplicate product IDs are merged by summing quantities, so a
    /// corrupted snapshot cannot violate the one-line-per-product rule.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            cart.add(line);
        }
        cart
    }

    /// Add a line, merging with any existing line for the same product.
    ///
    /// Merging increments the existing quantity and keeps the original
    /// snapshot. A line with quantity zero is ignored.
    pub fn add(&mut self, line: CartLine) {
        if line.quantity == 0 {
            return;
        }
        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == line.product_id)
        {
            existing.quantity += line.quantity;
        } else {
            self.lines.push(line);
        }
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity of zero removes the line. Updating a product that is not
    /// in the cart is a no-op. Returns whether the cart changed.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(product_id).is_some();
        }
        match self.lines.iter_mut().find(|l| &l.product_id == product_id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove a line, returning it if it was present.
    pub fn remove(&mut self, product_id: &ProductId) -> Option<CartLine> {
        let index = self
            .lines
            .iter()
            .position(|l| &l.product_id == product_id)?;
        Some(self.lines.remove(index))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product_id == product_id)
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.get(product_id).is_some()
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sum of line subtotals, before tax and shipping.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_subtotal).sum()
    }
}
