//! Wishlist routes.

use axum::{extract::State, Json};
use medimart_core::{Envelope, ProductId};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    middleware::RequireAuth,
    models::WishlistEntry,
    state::AppState,
};

/// Payload for toggling a product on the wishlist.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    pub product_id: ProductId,
}

/// Whether the product ended up on the wishlist.
#[derive(Debug, Serialize)]
pub struct ToggleOutcome {
    pub wishlisted: bool,
}

/// Handle GET /api/wishlist requests.
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Json<Envelope<Vec<WishlistEntry>>> {
    let envelope = state.gateway().get_wishlist(&user.profile.uid).await;
    Json(envelope)
}

/// Handle POST /api/wishlist/toggle requests.
///
/// Present entries are removed; absent ones are added with a fresh
/// snapshot of the product's name and price.
pub async fn toggle(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<Envelope<ToggleOutcome>>> {
    let uid = user.profile.uid;
    let listing = state.gateway().get_wishlist(&uid).await;
    let Some(entries) = listing.data else {
        return Err(AppError::Platform(
            listing.error.unwrap_or_else(|| "wishlist lookup failed".to_owned()),
        ));
    };

    let envelope = if entries.iter().any(|e| e.product_id == payload.product_id) {
        state
            .gateway()
            .remove_from_wishlist(&uid, &payload.product_id)
            .await
            .map(|()| ToggleOutcome { wishlisted: false })
    } else {
        let product = super::products::require_product(&state, &payload.product_id).await?;
        state
            .gateway()
            .add_to_wishlist(WishlistEntry::from_product(uid, &product))
            .await
            .map(|_| ToggleOutcome { wishlisted: true })
    };
    Ok(Json(envelope))
}
