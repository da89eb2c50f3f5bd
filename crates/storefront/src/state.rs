//! Application state shared across handlers.

use std::sync::Arc;

use url::Url;

use crate::backend::{AuthError, BackendError, DataGateway, DocumentClient, IdentityClient};
use crate::cart::CartStore;
use crate::config::StorefrontConfig;
use crate::services::{CheckoutService, Notifier, SessionProvider};
use crate::storage::LocalStore;

/// Error wiring up the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("invalid platform URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("platform URL must have a host")]
    MissingHost,
    #[error("failed to build document client: {0}")]
    Documents(#[from] BackendError),
    #[error("failed to build identity client: {0}")]
    Identity(#[from] AuthError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; hands out the gateway, the session
/// provider, and the stores.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    gateway: DataGateway,
    session: SessionProvider,
    cart: CartStore,
    checkout: CheckoutService,
    notifier: Notifier,
}

impl AppState {
    /// Wire up clients, stores, and services from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform URL is unusable or an HTTP client
    /// cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        validate_platform_url(&config.platform.base_url)?;

        let documents = DocumentClient::new(&config.platform)?;
        let identity = IdentityClient::new(&config.platform)?;
        let gateway = DataGateway::new(documents);
        let notifier = Notifier::new();
        let cart = CartStore::new(LocalStore::new(config.cart_file.clone()), gateway.clone());
        let session = SessionProvider::new(
            identity,
            gateway.clone(),
            cart.clone(),
            notifier.clone(),
        );
        let checkout = CheckoutService::new(gateway.clone(), cart.clone(), notifier.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                gateway,
                session,
                cart,
                checkout,
                notifier,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the remote data gateway.
    #[must_use]
    pub fn gateway(&self) -> &DataGateway {
        &self.inner.gateway
    }

    /// Get a reference to the session provider.
    #[must_use]
    pub fn session(&self) -> &SessionProvider {
        &self.inner.session
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the checkout service.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }

    /// Get a reference to the notice queue.
    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }
}

/// The platform URL must parse and name a host before any client is built.
fn validate_platform_url(base_url: &str) -> Result<(), StateError> {
    let url = Url::parse(base_url)?;
    if url.host_str().is_none() {
        return Err(StateError::MissingHost);
    }
    Ok(())
}
