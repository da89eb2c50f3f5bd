//! Product catalog routes.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use medimart_core::{Envelope, ProductId};
use serde::Deserialize;

use crate::{
    error::{AppError, Result},
    models::Product,
    state::AppState,
};

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    /// Restrict the listing to one category when present.
    pub category: Option<String>,
}

/// Handle GET /api/products requests.
///
/// The gateway envelope is passed through as-is; a platform outage shows
/// up as `success: false` with a message, never as a thrown error.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Json<Envelope<Vec<Product>>> {
    let envelope = match query.category {
        Some(category) => state.gateway().products_by_category(&category).await,
        None => state.gateway().list_products().await,
    };
    Json(envelope)
}

/// Handle GET /api/products/{id} requests.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Envelope<Product>>> {
    let product = require_product(&state, &id).await?;
    Ok(Json(Envelope::ok(product)))
}

/// Fetch one product, mapping absence to 404 and a failed lookup to 502.
///
/// Shared with the cart and wishlist handlers, which need a live catalog
/// record before they will touch shopper state.
pub(super) async fn require_product(state: &AppState, id: &ProductId) -> Result<Product> {
    let envelope = state.gateway().get_product(id).await;
    match envelope.data {
        Some(Some(product)) => Ok(product),
        Some(None) => Err(AppError::NotFound("product")),
        None => Err(AppError::Platform(
            envelope.error.unwrap_or_else(|| "product lookup failed".to_owned()),
        )),
    }
}
