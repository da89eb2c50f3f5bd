//! Back-office routes.
//!
//! Everything here requires the admin role and passes the gateway
//! envelope straight through, so the back-office UI branches on
//! `success` exactly like the storefront does.

use axum::{
    extract::{Path, State},
    Json,
};
use medimart_core::{Envelope, OrderId, OrderStatus, ProductId, UserId, UserRole};
use serde::Deserialize;

use crate::{
    middleware::RequireAdmin,
    models::{
        Feedback, Order, Product, ProductRecord, ShippingCostConfig, UserProfile,
    },
    state::AppState,
};

/// Payload for advancing an order's fulfilment status.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// Payload for changing a user's role.
#[derive(Debug, Deserialize)]
pub struct RoleUpdate {
    pub role: UserRole,
}

/// Handle POST /api/admin/products requests.
pub async fn create_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(record): Json<ProductRecord>,
) -> Json<Envelope<Product>> {
    Json(state.gateway().create_product(record).await)
}

/// Handle PUT /api/admin/products/{id} requests.
pub async fn update_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(record): Json<ProductRecord>,
) -> Json<Envelope<Product>> {
    Json(state.gateway().update_product(&id, record).await)
}

/// Handle DELETE /api/admin/products/{id} requests.
pub async fn delete_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Json<Envelope<()>> {
    Json(state.gateway().delete_product(&id).await)
}

/// Handle GET /api/admin/orders requests.
pub async fn all_orders(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Json<Envelope<Vec<Order>>> {
    Json(state.gateway().all_orders().await)
}

/// Handle PUT /api/admin/orders/{id}/status requests.
///
/// The gateway rejects backward moves with a failure envelope; the
/// fulfilment sequence only advances.
pub async fn update_order_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(payload): Json<StatusUpdate>,
) -> Json<Envelope<Order>> {
    Json(state.gateway().update_order_status(&id, payload.status).await)
}

/// Handle GET /api/admin/users requests.
pub async fn all_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Json<Envelope<Vec<UserProfile>>> {
    Json(state.gateway().get_all_users().await)
}

/// Handle PUT /api/admin/users/{id}/role requests.
pub async fn update_user_role(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(payload): Json<RoleUpdate>,
) -> Json<Envelope<()>> {
    Json(state.gateway().update_user_role(&id, payload.role).await)
}

/// Handle GET /api/admin/feedback requests.
pub async fn all_feedback(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Json<Envelope<Vec<Feedback>>> {
    Json(state.gateway().get_all_feedback().await)
}

/// Handle GET /api/admin/shipping requests.
pub async fn shipping_costs(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Json<Envelope<ShippingCostConfig>> {
    Json(state.gateway().get_shipping_costs().await)
}

/// Handle PUT /api/admin/shipping requests.
pub async fn update_shipping_costs(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(config): Json<ShippingCostConfig>,
) -> Json<Envelope<ShippingCostConfig>> {
    Json(state.gateway().update_shipping_costs(&config).await)
}
