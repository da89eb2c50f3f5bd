//! The persistent cart store.
//!
//! Collection semantics (unique-by-product, merge on add, quantity zero
//! removes) live in [`medimart_core::Cart`]; this wrapper adds the mutex,
//! the local snapshot written on every mutation, and the best-effort
//! history log for signed-in shoppers. Mutations are applied in invocation
//! order under one lock, so a read after a write always sees the write.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use medimart_core::types::{ProductId, UserId};
use medimart_core::{Cart, CartLine};
use rust_decimal::Decimal;

use crate::backend::DataGateway;
use crate::models::CartHistoryEntry;
use crate::storage::LocalStore;

/// Shared cart store. Cheap to clone.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<CartState>,
    store: LocalStore,
    gateway: DataGateway,
}

struct CartState {
    cart: Cart,
    owner: Option<UserId>,
}

impl CartStore {
    /// Open the store, loading whatever snapshot the local file holds.
    #[must_use]
    pub fn new(store: LocalStore, gateway: DataGateway) -> Self {
        let cart = store.load();
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(CartState { cart, owner: None }),
                store,
                gateway,
            }),
        }
    }

    /// Add a line to the cart, merging quantities on a repeated product.
    ///
    /// When an owner is set, the addition is also recorded in the remote
    /// history log. That write happens off this call path and its failure
    /// is logged, never surfaced; the cart mutation itself cannot fail.
    pub fn add(&self, line: CartLine) {
        let owner = {
            let mut state = self.lock();
            state.cart.add(line.clone());
            self.persist(&state.cart);
            state.owner.clone()
        };

        if let Some(uid) = owner {
            let gateway = self.inner.gateway.clone();
            let entry = CartHistoryEntry::from_line(uid, &line);
            tokio::spawn(async move {
                let outcome = gateway.add_cart_history(entry).await;
                if !outcome.success {
                    tracing::debug!("cart history entry dropped");
                }
            });
        }
    }

    /// Set a product's quantity; zero removes the line.
    ///
    /// Returns false when the product is not in the cart.
    pub fn update_quantity(&self, product_id: &ProductId, quantity: u32) -> bool {
        let mut state = self.lock();
        let changed = state.cart.update_quantity(product_id, quantity);
        if changed {
            self.persist(&state.cart);
        }
        changed
    }

    /// Remove a line. Removing an absent product is a no-op.
    pub fn remove(&self, product_id: &ProductId) -> bool {
        let mut state = self.lock();
        let removed = state.cart.remove(product_id).is_some();
        if removed {
            self.persist(&state.cart);
        }
        removed
    }

    /// Empty the cart and persist the empty collection.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.cart.clear();
        self.persist(&state.cart);
    }

    /// Attach or detach the owning identity.
    ///
    /// Detaching (logout) clears the cart and its snapshot; attaching keeps
    /// whatever was gathered while browsing anonymously.
    pub fn set_owner(&self, owner: Option<UserId>) {
        let mut state = self.lock();
        let cleared = owner.is_none();
        state.owner = owner;
        if cleared {
            state.cart.clear();
            self.persist(&state.cart);
        }
    }

    /// A point-in-time copy of the cart contents.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.lock().cart.clone()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lock().cart.item_count()
    }

    /// Sum of unit price times quantity, before GST and shipping.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lock().cart.total()
    }

    fn lock(&self) -> MutexGuard<'_, CartState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, cart: &Cart) {
        if let Err(err) = self.inner.store.save(cart) {
            tracing::warn!(error = %err, "failed to persist cart snapshot");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::DocumentClient;
    use crate::config::PlatformConfig;
    use secrecy::SecretString;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir().join(format!("medimart-cartstore-test-{}.json", Uuid::new_v4()))
    }

    /// Gateway pointing at a closed port; history writes fail quietly.
    fn offline_gateway() -> DataGateway {
        let config = PlatformConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            project: "test".to_string(),
            api_version: "v1".to_string(),
            api_key: SecretString::from("x9$kQ2mV8pL4wR7nT1zF5hB3jD6gS0a"),
        };
        DataGateway::new(DocumentClient::new(&config).unwrap())
    }

    fn line(id: &str, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            unit_price: Decimal::from(100),
            quantity,
            gst_percentage: Decimal::from(18),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_add_persists_snapshot() {
        let path = scratch_path();
        let store = CartStore::new(LocalStore::new(&path), offline_gateway());

        store.add(line("p1", 2));
        store.add(line("p1", 1));

        let reloaded = LocalStore::new(&path).load();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.item_count(), 3);

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_update_quantity_zero_removes() {
        let path = scratch_path();
        let store = CartStore::new(LocalStore::new(&path), offline_gateway());

        store.add(line("p1", 2));
        assert!(store.update_quantity(&ProductId::new("p1"), 0));
        assert!(store.snapshot().is_empty());

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_update_absent_product_is_noop() {
        let path = scratch_path();
        let store = CartStore::new(LocalStore::new(&path), offline_gateway());

        assert!(!store.update_quantity(&ProductId::new("ghost"), 5));
        assert!(!store.remove(&ProductId::new("ghost")));

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_logout_clears_cart_and_snapshot() {
        let path = scratch_path();
        let store = CartStore::new(LocalStore::new(&path), offline_gateway());

        store.set_owner(Some(UserId::new("u1")));
        store.add(line("p1", 2));
        store.set_owner(None);

        assert!(store.snapshot().is_empty());
        assert!(LocalStore::new(&path).load().is_empty());

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_login_keeps_anonymous_cart() {
        let path = scratch_path();
        let store = CartStore::new(LocalStore::new(&path), offline_gateway());

        store.add(line("p1", 1));
        store.set_owner(Some(UserId::new("u1")));

        assert_eq!(store.item_count(), 1);

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_history_failure_never_breaks_add() {
        let path = scratch_path();
        let store = CartStore::new(LocalStore::new(&path), offline_gateway());

        // Owner set, so add spawns a history write that cannot reach the
        // platform. The cart mutation must succeed regardless.
        store.set_owner(Some(UserId::new("u1")));
        store.add(line("p1", 1));
        assert_eq!(store.item_count(), 1);

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_store_reopens_previous_snapshot() {
        let path = scratch_path();
        {
            let store = CartStore::new(LocalStore::new(&path), offline_gateway());
            store.add(line("p1", 2));
        }
        let store = CartStore::new(LocalStore::new(&path), offline_gateway());
        assert_eq!(store.item_count(), 2);

        std::fs::remove_file(&path).unwrap();
    }
}
