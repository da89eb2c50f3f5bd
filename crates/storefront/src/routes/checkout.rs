//! Checkout routes.

use axum::{
    extract::{Query, State},
    Json,
};
use medimart_core::{Envelope, OrderSummary};
use serde::Deserialize;

use crate::{
    error::Result,
    middleware::RequireAuth,
    models::{Order, ShippingDetails},
    state::AppState,
};

/// Query parameters for the checkout quote.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Destination state, for the per-state shipping rate.
    pub state: Option<String>,
}

/// Handle GET /api/checkout/summary requests.
pub async fn summary(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Json<Envelope<OrderSummary>> {
    let summary = state.checkout().summary(query.state.as_deref()).await;
    Json(Envelope::ok(summary))
}

/// Handle POST /api/checkout requests.
///
/// Validates the shipping details, prices the cart, and hands the order
/// to the platform. The gateway envelope passes through so a platform
/// outage reads as `success: false` with the cart left intact.
pub async fn place_order(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(details): Json<ShippingDetails>,
) -> Result<Json<Envelope<Order>>> {
    let envelope = state
        .checkout()
        .place_order(&user.profile.uid, details)
        .await?;
    Ok(Json(envelope))
}
