//! Back-office operations against the stub platform.
//!
//! Role changes, shipping configuration, order status transitions, and
//! catalog management all go through the same gateway the admin routes
//! use, so these tests pin the behavior those routes pass through.

use medimart_core::{OrderId, OrderStatus, UserId, UserRole};
use medimart_integration_tests::TestHarness;
use medimart_storefront::models::{ProductRecord, ShippingCostConfig};
use rust_decimal::Decimal;
use serde_json::json;

fn seeded_order() -> serde_json::Value {
    json!({
        "userId": "u1",
        "lines": [{
            "productId": "p1",
            "name": "Pulse Oximeter",
            "unitPrice": "100.00",
            "quantity": 2,
            "gstPercentage": "18"
        }],
        "subtotal": "200.00",
        "gstTotal": "36.00",
        "shippingCost": "30.00",
        "total": "266.00",
        "status": "confirmed",
        "shipping": {
            "name": "Asha Rao",
            "email": "asha@example.com",
            "phone": "9876543210",
            "address": "12 Hospital Road, T Nagar, Chennai",
            "state": "Tamil Nadu",
            "postalCode": "600001"
        },
        "placedAt": "2026-02-01T08:00:00Z"
    })
}

// ============================================================================
// Roles
// ============================================================================

#[tokio::test]
async fn test_role_update_persists_to_the_profile() {
    let harness = TestHarness::start().await;
    harness.platform.seed_document(
        "users",
        "u9",
        json!({"uid": "u9", "email": "ops@medimart.in"}),
    );

    let envelope = harness
        .state
        .gateway()
        .update_user_role(&UserId::new("u9"), UserRole::Admin)
        .await;

    assert!(envelope.success);
    let stored = harness
        .platform
        .document("users", "u9")
        .expect("profile still stored");
    assert_eq!(stored["role"], "admin");
    assert_eq!(stored["email"], "ops@medimart.in", "other fields untouched");
}

#[tokio::test]
async fn test_role_update_for_missing_user_fails() {
    let harness = TestHarness::start().await;

    let envelope = harness
        .state
        .gateway()
        .update_user_role(&UserId::new("ghost"), UserRole::Admin)
        .await;

    assert!(!envelope.success);
    assert!(envelope.error.is_some());
}

// ============================================================================
// Shipping configuration
// ============================================================================

#[tokio::test]
async fn test_shipping_config_round_trips() {
    let harness = TestHarness::start().await;
    let mut config = ShippingCostConfig {
        default_cost: Decimal::from(40),
        per_state: std::collections::HashMap::new(),
    };
    config
        .per_state
        .insert("Kerala".to_string(), Decimal::from(25));

    let saved = harness.state.gateway().update_shipping_costs(&config).await;
    assert!(saved.success);

    let fetched = harness
        .state
        .gateway()
        .get_shipping_costs()
        .await
        .data
        .expect("config payload");
    assert_eq!(fetched.default_cost, Decimal::from(40));
    assert_eq!(fetched.cost_for_state("Kerala"), Decimal::from(25));
    assert_eq!(fetched.cost_for_state("Assam"), Decimal::from(40));
}

#[tokio::test]
async fn test_shipping_config_defaults_when_unset() {
    let harness = TestHarness::start().await;

    let envelope = harness.state.gateway().get_shipping_costs().await;

    assert!(envelope.success);
    let config = envelope.data.expect("default config");
    assert_eq!(config.default_cost, Decimal::from(50));
    assert!(config.per_state.is_empty());
}

// ============================================================================
// Order status transitions
// ============================================================================

#[tokio::test]
async fn test_order_status_advances_forward() {
    let harness = TestHarness::start().await;
    harness.platform.seed_document("orders", "o1", seeded_order());

    let envelope = harness
        .state
        .gateway()
        .update_order_status(&OrderId::new("o1"), OrderStatus::Shipped)
        .await;

    assert!(envelope.success);
    assert_eq!(envelope.data.expect("order payload").status, OrderStatus::Shipped);
    let stored = harness.platform.document("orders", "o1").expect("stored");
    assert_eq!(stored["status"], "shipped");
}

#[tokio::test]
async fn test_order_status_never_moves_backward() {
    let harness = TestHarness::start().await;
    harness.platform.seed_document("orders", "o1", seeded_order());
    let advanced = harness
        .state
        .gateway()
        .update_order_status(&OrderId::new("o1"), OrderStatus::Shipped)
        .await;
    assert!(advanced.success);

    let envelope = harness
        .state
        .gateway()
        .update_order_status(&OrderId::new("o1"), OrderStatus::Processing)
        .await;

    assert!(!envelope.success);
    let error = envelope.error.expect("rejection message");
    assert!(error.contains("cannot move backward"), "{error}");
    let stored = harness.platform.document("orders", "o1").expect("stored");
    assert_eq!(stored["status"], "shipped", "write must not have happened");
}

#[tokio::test]
async fn test_order_status_same_stage_is_accepted() {
    let harness = TestHarness::start().await;
    harness.platform.seed_document("orders", "o1", seeded_order());

    let envelope = harness
        .state
        .gateway()
        .update_order_status(&OrderId::new("o1"), OrderStatus::Confirmed)
        .await;

    assert!(envelope.success);
}

// ============================================================================
// Catalog management
// ============================================================================

#[tokio::test]
async fn test_product_create_update_delete() {
    let harness = TestHarness::start().await;
    let record: ProductRecord = serde_json::from_value(json!({
        "name": "Nebulizer",
        "price": "1800.00",
        "category": "respiratory"
    }))
    .expect("product record");

    let created = harness.state.gateway().create_product(record.clone()).await;
    assert!(created.success);
    let product = created.data.expect("created product");
    assert!(!product.id.as_str().is_empty());

    let mut updated_record = record;
    updated_record.price = Decimal::from(1650);
    let updated = harness
        .state
        .gateway()
        .update_product(&product.id, updated_record)
        .await;
    assert!(updated.success);

    let fetched = harness.state.gateway().get_product(&product.id).await;
    let fetched_product = fetched.data.expect("payload").expect("still exists");
    assert_eq!(fetched_product.price, Decimal::from(1650));

    let deleted = harness.state.gateway().delete_product(&product.id).await;
    assert!(deleted.success);

    let gone = harness.state.gateway().get_product(&product.id).await;
    assert!(gone.success);
    assert!(matches!(gone.data, Some(None)));
}
