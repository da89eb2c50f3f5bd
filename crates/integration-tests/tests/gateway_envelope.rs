//! Gateway envelope contract against the stub platform.
//!
//! Every gateway operation resolves to `{ success, data?, error? }`.
//! Platform failures of any kind surface as `success: false` with a
//! message; nothing here returns `Err` or panics.

use medimart_core::ProductId;
use medimart_integration_tests::{scratch_cart_file, TestHarness};
use medimart_storefront::config::{PlatformConfig, SentryConfig, StorefrontConfig};
use medimart_storefront::state::AppState;
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::json;

fn thermometer() -> serde_json::Value {
    json!({
        "name": "Digital Thermometer",
        "description": "Fast-read clinical thermometer",
        "price": "499.00",
        "gstPercentage": "12",
        "category": "diagnostics",
        "imageUrl": "https://cdn.example/thermo.png",
        "inStock": true
    })
}

fn wheelchair() -> serde_json::Value {
    json!({
        "name": "Folding Wheelchair",
        "price": "7250.00",
        "category": "mobility"
    })
}

// ============================================================================
// Success paths
// ============================================================================

#[tokio::test]
async fn test_list_products_resolves_ok() {
    let harness = TestHarness::start().await;
    harness.platform.seed_document("products", "p1", thermometer());
    harness.platform.seed_document("products", "p2", wheelchair());

    let envelope = harness.state.gateway().list_products().await;

    assert!(envelope.success);
    assert!(envelope.error.is_none());
    let products = envelope.data.expect("products payload");
    assert_eq!(products.len(), 2);
}

#[tokio::test]
async fn test_category_filter_applies_on_the_platform() {
    let harness = TestHarness::start().await;
    harness.platform.seed_document("products", "p1", thermometer());
    harness.platform.seed_document("products", "p2", wheelchair());

    let envelope = harness
        .state
        .gateway()
        .products_by_category("mobility")
        .await;

    let products = envelope.data.expect("products payload");
    assert_eq!(products.len(), 1);
    let product = products.first().expect("one product");
    assert_eq!(product.name, "Folding Wheelchair");
    // Distilled record defaults apply.
    assert_eq!(product.gst_percentage, Decimal::from(18));
    assert!(product.in_stock);
}

#[tokio::test]
async fn test_get_product_parses_price_and_id() {
    let harness = TestHarness::start().await;
    harness.platform.seed_document("products", "p1", thermometer());

    let envelope = harness
        .state
        .gateway()
        .get_product(&ProductId::new("p1"))
        .await;

    assert!(envelope.success);
    let product = envelope
        .data
        .expect("payload")
        .expect("product should exist");
    assert_eq!(product.id.as_str(), "p1");
    assert_eq!(product.price, "499.00".parse::<Decimal>().expect("decimal"));
}

#[tokio::test]
async fn test_get_product_absent_is_success_with_no_product() {
    let harness = TestHarness::start().await;

    let envelope = harness
        .state
        .gateway()
        .get_product(&ProductId::new("missing"))
        .await;

    // Absence is an answer, not a failure.
    assert!(envelope.success);
    assert!(matches!(envelope.data, Some(None)));
}

// ============================================================================
// Failure paths
// ============================================================================

#[tokio::test]
async fn test_platform_error_resolves_failure_envelope() {
    let harness = TestHarness::start().await;
    harness.platform.set_failing(true);

    let envelope = harness.state.gateway().list_products().await;

    assert!(!envelope.success);
    assert!(envelope.data.is_none());
    let error = envelope.error.expect("error message");
    assert!(error.contains("stub platform is failing"), "{error}");
}

#[tokio::test]
async fn test_unreachable_platform_resolves_failure_envelope() {
    // Port 9 (discard) refuses connections on loopback.
    let config = StorefrontConfig {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
        port: 0,
        platform: PlatformConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            project: "test".to_string(),
            api_version: "v1".to_string(),
            api_key: SecretString::from("x9$kQ2mV8pL4wR7nT1zF5hB3jD6gS0a"),
        },
        cart_file: scratch_cart_file(),
        sentry: SentryConfig::default(),
    };
    let state = AppState::new(config).expect("state builds without network");

    let envelope = state.gateway().list_products().await;

    assert!(!envelope.success);
    assert!(envelope.error.is_some());
}

// ============================================================================
// Catalog cache
// ============================================================================

#[tokio::test]
async fn test_catalog_cache_serves_reads_during_outage() {
    let harness = TestHarness::start().await;
    harness.platform.seed_document("products", "p1", thermometer());

    let first = harness.state.gateway().list_products().await;
    assert!(first.success);

    harness.platform.set_failing(true);
    let second = harness.state.gateway().list_products().await;

    assert!(second.success, "cached listing should survive the outage");
    assert_eq!(second.data.expect("payload").len(), 1);
}

#[tokio::test]
async fn test_catalog_mutation_invalidates_cache() {
    let harness = TestHarness::start().await;
    harness.platform.seed_document("products", "p1", thermometer());

    let before = harness.state.gateway().list_products().await;
    assert_eq!(before.data.expect("payload").len(), 1);

    let record = serde_json::from_value(wheelchair()).expect("product record");
    let created = harness.state.gateway().create_product(record).await;
    assert!(created.success);

    let after = harness.state.gateway().list_products().await;
    assert_eq!(
        after.data.expect("payload").len(),
        2,
        "stale cache should have been dropped by the mutation"
    );
}
