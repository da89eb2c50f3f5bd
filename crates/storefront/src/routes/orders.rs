//! Order history and tracking routes.

use axum::{
    extract::{Path, State},
    Json,
};
use medimart_core::{Envelope, OrderId};

use crate::{
    error::{AppError, Result},
    middleware::RequireAuth,
    models::Order,
    state::AppState,
};

/// Handle GET /api/orders requests.
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Json<Envelope<Vec<Order>>> {
    let envelope = state.gateway().orders_for_user(&user.profile.uid).await;
    Json(envelope)
}

/// Handle GET /api/orders/{id} requests.
///
/// Another shopper's order answers 404 rather than 403, so order ids
/// cannot be probed for existence. Admins may fetch any order.
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Envelope<Order>>> {
    let envelope = state.gateway().get_order(&id).await;
    match envelope.data {
        Some(Some(order)) if order.user_id == user.profile.uid || user.role().is_admin() => {
            Ok(Json(Envelope::ok(order)))
        }
        Some(_) => Err(AppError::NotFound("order")),
        None => Err(AppError::Platform(
            envelope.error.unwrap_or_else(|| "order lookup failed".to_owned()),
        )),
    }
}
