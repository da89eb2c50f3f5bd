//! The remote data gateway.
//!
//! One async method per resource operation, and every method returns the
//! uniform [`Envelope`]. Callers branch on `success`; no gateway method
//! returns `Err` or panics. Failures from the platform are logged here and
//! flattened into the envelope's `error` string.
//!
//! Catalog reads are cached for five minutes; any catalog mutation drops
//! the whole cache.

use std::sync::Arc;
use std::time::Duration;

use medimart_core::types::{Envelope, OrderId, OrderStatus, ProductId, UserId, UserRole};
use moka::future::Cache;
use serde_json::json;
use tracing::instrument;

use super::documents::{Document, DocumentClient};
use super::BackendError;
use crate::models::{
    CartHistoryEntry, Feedback, FeedbackRecord, Order, OrderRecord, Product, ProductRecord,
    ShippingCostConfig, UserProfile, WishlistEntry,
};

const PRODUCTS: &str = "products";
const USERS: &str = "users";
const ORDERS: &str = "orders";
const WISHLIST: &str = "wishlist";
const FEEDBACK: &str = "feedback";
const CART_HISTORY: &str = "cart_history";
const SETTINGS: &str = "settings";
/// Fixed id of the shipping cost document within `settings`.
const SHIPPING_DOC_ID: &str = "shipping_costs";

const CACHE_MAX_CAPACITY: u64 = 1000;
const CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    AllProducts,
    Category(String),
    Product(ProductId),
}

#[derive(Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
}

/// Façade over the platform document store.
///
/// Cheap to clone; all clones share the HTTP pool and the catalog cache.
#[derive(Clone)]
pub struct DataGateway {
    inner: Arc<Inner>,
}

struct Inner {
    documents: DocumentClient,
    cache: Cache<CacheKey, CacheValue>,
}

impl DataGateway {
    #[must_use]
    pub fn new(documents: DocumentClient) -> Self {
        Self {
            inner: Arc::new(Inner {
                documents,
                cache: Cache::builder()
                    .max_capacity(CACHE_MAX_CAPACITY)
                    .time_to_live(CACHE_TTL)
                    .build(),
            }),
        }
    }

    // =========================================================================
    // Products
    // =========================================================================

    pub async fn list_products(&self) -> Envelope<Vec<Product>> {
        finish("list_products", self.fetch_products(None).await)
    }

    pub async fn products_by_category(&self, category: &str) -> Envelope<Vec<Product>> {
        finish(
            "products_by_category",
            self.fetch_products(Some(category)).await,
        )
    }

    pub async fn get_product(&self, id: &ProductId) -> Envelope<Option<Product>> {
        let key = CacheKey::Product(id.clone());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            return Envelope::ok(Some(*product));
        }
        match self.inner.documents.get::<ProductRecord>(PRODUCTS, id.as_str()).await {
            Ok(doc) => {
                let product = Product::from_document(doc);
                self.inner
                    .cache
                    .insert(key, CacheValue::Product(Box::new(product.clone())))
                    .await;
                Envelope::ok(Some(product))
            }
            Err(BackendError::NotFound(_)) => Envelope::ok(None),
            Err(err) => failure("get_product", &err),
        }
    }

    pub async fn create_product(&self, record: ProductRecord) -> Envelope<Product> {
        let result = self
            .inner
            .documents
            .create(PRODUCTS, &record)
            .await
            .map(Product::from_document);
        self.invalidate_catalog().await;
        finish("create_product", result)
    }

    pub async fn update_product(&self, id: &ProductId, record: ProductRecord) -> Envelope<Product> {
        let result = self
            .inner
            .documents
            .put(PRODUCTS, id.as_str(), &record)
            .await
            .map(Product::from_document);
        self.invalidate_catalog().await;
        finish("update_product", result)
    }

    pub async fn delete_product(&self, id: &ProductId) -> Envelope<()> {
        let result = self.inner.documents.delete(PRODUCTS, id.as_str()).await;
        self.invalidate_catalog().await;
        finish("delete_product", result)
    }

    async fn fetch_products(&self, category: Option<&str>) -> Result<Vec<Product>, BackendError> {
        let key = category.map_or(CacheKey::AllProducts, |c| CacheKey::Category(c.to_string()));
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&key).await {
            return Ok(products);
        }

        let filter = category.map(|c| ("category", c));
        let docs = self
            .inner
            .documents
            .list::<ProductRecord>(PRODUCTS, filter, None)
            .await?;
        let products: Vec<Product> = docs.into_iter().map(Product::from_document).collect();
        self.inner
            .cache
            .insert(key, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    async fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
    }

    // =========================================================================
    // Orders
    // =========================================================================

    #[instrument(skip(self, record), fields(user = %record.user_id))]
    pub async fn create_order(&self, record: OrderRecord) -> Envelope<Order> {
        finish(
            "create_order",
            self.inner
                .documents
                .create(ORDERS, &record)
                .await
                .map(Order::from_document),
        )
    }

    pub async fn orders_for_user(&self, uid: &UserId) -> Envelope<Vec<Order>> {
        finish(
            "orders_for_user",
            self.fetch_orders(Some(("userId", uid.as_str()))).await,
        )
    }

    pub async fn all_orders(&self) -> Envelope<Vec<Order>> {
        finish("all_orders", self.fetch_orders(None).await)
    }

    pub async fn get_order(&self, id: &OrderId) -> Envelope<Option<Order>> {
        match self.inner.documents.get::<OrderRecord>(ORDERS, id.as_str()).await {
            Ok(doc) => Envelope::ok(Some(Order::from_document(doc))),
            Err(BackendError::NotFound(_)) => Envelope::ok(None),
            Err(err) => failure("get_order", &err),
        }
    }

    /// Move an order along the fulfilment chain.
    ///
    /// Transitions only ever go forward (re-asserting the current status is
    /// allowed); a backward request is rejected without touching the store.
    #[instrument(skip(self))]
    pub async fn update_order_status(&self, id: &OrderId, next: OrderStatus) -> Envelope<Order> {
        let current = match self.inner.documents.get::<OrderRecord>(ORDERS, id.as_str()).await {
            Ok(doc) => doc.data.status,
            Err(err) => return failure("update_order_status", &err),
        };
        if !current.can_become(next) {
            tracing::warn!(order = %id, %current, %next, "rejected backward status transition");
            return Envelope::failure(format!(
                "order status cannot move backward from {current} to {next}"
            ));
        }
        finish("update_order_status", self.store_order_status(id, next).await)
    }

    async fn fetch_orders(
        &self,
        filter: Option<(&str, &str)>,
    ) -> Result<Vec<Order>, BackendError> {
        let docs = self
            .inner
            .documents
            .list::<OrderRecord>(ORDERS, filter, None)
            .await?;
        let mut orders: Vec<Order> = docs.into_iter().map(Order::from_document).collect();
        // The platform does not sort; newest first for display.
        orders.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));
        Ok(orders)
    }

    async fn store_order_status(
        &self,
        id: &OrderId,
        next: OrderStatus,
    ) -> Result<Order, BackendError> {
        let doc = self
            .inner
            .documents
            .patch(ORDERS, id.as_str(), &json!({ "status": next }))
            .await?;
        let record: OrderRecord =
            serde_json::from_value(doc.data).map_err(|e| BackendError::Parse(e.to_string()))?;
        Ok(Order::from_document(Document {
            id: doc.id,
            data: record,
            create_time: doc.create_time,
            update_time: doc.update_time,
        }))
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub async fn get_profile(&self, uid: &UserId) -> Envelope<Option<UserProfile>> {
        match self.inner.documents.get::<UserProfile>(USERS, uid.as_str()).await {
            Ok(doc) => Envelope::ok(Some(profile_from_document(doc))),
            Err(BackendError::NotFound(_)) => Envelope::ok(None),
            Err(err) => failure("get_profile", &err),
        }
    }

    /// Create or replace the profile document at the account's uid.
    pub async fn upsert_profile(&self, profile: &UserProfile) -> Envelope<UserProfile> {
        finish(
            "upsert_profile",
            self.inner
                .documents
                .put(USERS, profile.uid.as_str(), profile)
                .await
                .map(profile_from_document),
        )
    }

    pub async fn get_all_users(&self) -> Envelope<Vec<UserProfile>> {
        finish(
            "get_all_users",
            self.inner
                .documents
                .list::<UserProfile>(USERS, None, None)
                .await
                .map(|docs| docs.into_iter().map(profile_from_document).collect()),
        )
    }

    #[instrument(skip(self))]
    pub async fn update_user_role(&self, uid: &UserId, role: UserRole) -> Envelope<()> {
        finish(
            "update_user_role",
            self.inner
                .documents
                .patch(USERS, uid.as_str(), &json!({ "role": role }))
                .await
                .map(|_| ()),
        )
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    pub async fn get_wishlist(&self, uid: &UserId) -> Envelope<Vec<WishlistEntry>> {
        finish(
            "get_wishlist",
            self.inner
                .documents
                .list::<WishlistEntry>(WISHLIST, Some(("userId", uid.as_str())), None)
                .await
                .map(|docs| docs.into_iter().map(|doc| doc.data).collect()),
        )
    }

    pub async fn add_to_wishlist(&self, entry: WishlistEntry) -> Envelope<WishlistEntry> {
        finish(
            "add_to_wishlist",
            self.inner
                .documents
                .put(WISHLIST, &entry.document_id(), &entry)
                .await
                .map(|doc| doc.data),
        )
    }

    /// Remove a wishlist entry. Removing an absent entry is a success.
    pub async fn remove_from_wishlist(
        &self,
        uid: &UserId,
        product_id: &ProductId,
    ) -> Envelope<()> {
        let doc_id = WishlistEntry::document_id_for(uid, product_id);
        match self.inner.documents.delete(WISHLIST, &doc_id).await {
            Ok(()) | Err(BackendError::NotFound(_)) => Envelope::ok(()),
            Err(err) => failure("remove_from_wishlist", &err),
        }
    }

    // =========================================================================
    // Feedback
    // =========================================================================

    pub async fn submit_feedback(&self, record: FeedbackRecord) -> Envelope<Feedback> {
        finish(
            "submit_feedback",
            self.inner
                .documents
                .create(FEEDBACK, &record)
                .await
                .map(Feedback::from_document),
        )
    }

    pub async fn get_all_feedback(&self) -> Envelope<Vec<Feedback>> {
        finish(
            "get_all_feedback",
            self.inner
                .documents
                .list::<FeedbackRecord>(FEEDBACK, None, None)
                .await
                .map(|docs| docs.into_iter().map(Feedback::from_document).collect()),
        )
    }

    // =========================================================================
    // Shipping configuration
    // =========================================================================

    /// Current shipping costs; defaults apply until an admin saves a config.
    pub async fn get_shipping_costs(&self) -> Envelope<ShippingCostConfig> {
        match self
            .inner
            .documents
            .get::<ShippingCostConfig>(SETTINGS, SHIPPING_DOC_ID)
            .await
        {
            Ok(doc) => Envelope::ok(doc.data),
            Err(BackendError::NotFound(_)) => Envelope::ok(ShippingCostConfig::default()),
            Err(err) => failure("get_shipping_costs", &err),
        }
    }

    pub async fn update_shipping_costs(
        &self,
        config: &ShippingCostConfig,
    ) -> Envelope<ShippingCostConfig> {
        finish(
            "update_shipping_costs",
            self.inner
                .documents
                .put(SETTINGS, SHIPPING_DOC_ID, config)
                .await
                .map(|doc| doc.data),
        )
    }

    // =========================================================================
    // Cart history
    // =========================================================================

    pub async fn add_cart_history(&self, entry: CartHistoryEntry) -> Envelope<()> {
        finish(
            "add_cart_history",
            self.inner
                .documents
                .create(CART_HISTORY, &entry)
                .await
                .map(|_| ()),
        )
    }
}

/// The profile payload repeats the uid; the document id wins.
fn profile_from_document(doc: Document<UserProfile>) -> UserProfile {
    let mut profile = doc.data;
    profile.uid = UserId::new(doc.id);
    if profile.created_at.is_none() {
        profile.created_at = doc.create_time;
    }
    profile
}

fn finish<T>(operation: &'static str, result: Result<T, BackendError>) -> Envelope<T> {
    match result {
        Ok(data) => Envelope::ok(data),
        Err(err) => failure(operation, &err),
    }
}

fn failure<T>(operation: &'static str, err: &BackendError) -> Envelope<T> {
    tracing::warn!(operation, error = %err, "gateway operation failed");
    Envelope::failure(err.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_wraps_success() {
        let envelope = finish("op", Ok(7));
        assert!(envelope.success);
        assert_eq!(envelope.data, Some(7));
        assert!(envelope.error.is_none());
    }

    #[test]
    fn test_finish_flattens_error() {
        let envelope: Envelope<u32> = finish(
            "op",
            Err(BackendError::Api {
                status: 500,
                message: "boom".to_string(),
            }),
        );
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.error.as_deref(), Some("Platform API error (500): boom"));
    }

    #[test]
    fn test_profile_document_id_wins() {
        let doc: Document<UserProfile> = serde_json::from_value(serde_json::json!({
            "id": "u-real",
            "data": {
                "uid": "u-stale",
                "email": "a@b.co"
            },
            "createTime": "2026-01-01T00:00:00Z"
        }))
        .unwrap();
        let profile = profile_from_document(doc);
        assert_eq!(profile.uid.as_str(), "u-real");
        assert!(profile.created_at.is_some());
    }
}
