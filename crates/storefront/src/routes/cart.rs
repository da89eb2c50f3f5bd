//! Cart routes.
//!
//! The cart is session-scoped and exists before sign-in, so nothing here
//! is gated. Every mutation persists to the local cart file and answers
//! with the refreshed cart view.

use axum::{extract::State, Json};
use medimart_core::{CartLine, Envelope, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    state::AppState,
};

/// Cart contents plus the derived totals the header badge needs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub item_count: u32,
    pub total: Decimal,
}

impl CartView {
    fn current(state: &AppState) -> Self {
        let cart = state.cart().snapshot();
        Self {
            item_count: cart.item_count(),
            total: cart.total(),
            lines: cart.into_lines(),
        }
    }
}

/// Payload for adding a product to the cart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Payload for setting a line's quantity.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantity {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Payload for removing a line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCart {
    pub product_id: ProductId,
}

/// Handle GET /api/cart requests.
pub async fn show(State(state): State<AppState>) -> Json<Envelope<CartView>> {
    Json(Envelope::ok(CartView::current(&state)))
}

/// Handle POST /api/cart/add requests.
///
/// Looks the product up so the stored line carries a price snapshot, and
/// refuses products the catalog marks out of stock.
pub async fn add(
    State(state): State<AppState>,
    Json(payload): Json<AddToCart>,
) -> Result<Json<Envelope<CartView>>> {
    if payload.quantity == 0 {
        return Err(AppError::BadRequest("Quantity must be at least 1".to_owned()));
    }
    let product = super::products::require_product(&state, &payload.product_id).await?;
    if !product.in_stock {
        return Err(AppError::BadRequest("Product is out of stock".to_owned()));
    }
    state.cart().add(product.to_cart_line(payload.quantity));
    Ok(Json(Envelope::ok(CartView::current(&state))))
}

/// Handle POST /api/cart/update requests.
///
/// Quantity zero removes the line; an unknown product id is a no-op.
pub async fn update(
    State(state): State<AppState>,
    Json(payload): Json<UpdateQuantity>,
) -> Json<Envelope<CartView>> {
    state
        .cart()
        .update_quantity(&payload.product_id, payload.quantity);
    Json(Envelope::ok(CartView::current(&state)))
}

/// Handle POST /api/cart/remove requests.
pub async fn remove(
    State(state): State<AppState>,
    Json(payload): Json<RemoveFromCart>,
) -> Json<Envelope<CartView>> {
    state.cart().remove(&payload.product_id);
    Json(Envelope::ok(CartView::current(&state)))
}

/// Handle POST /api/cart/clear requests.
pub async fn clear(State(state): State<AppState>) -> Json<Envelope<CartView>> {
    state.cart().clear();
    Json(Envelope::ok(CartView::current(&state)))
}

/// Handle GET /api/cart/count requests.
pub async fn count(State(state): State<AppState>) -> Json<Envelope<u32>> {
    Json(Envelope::ok(state.cart().item_count()))
}
