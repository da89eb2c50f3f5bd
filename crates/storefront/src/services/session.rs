//! Session and identity state.
//!
//! A small state machine over a watch channel: the session starts in
//! `Loading`, settles to `Anonymous` once the provider is initialized, and
//! moves between `Anonymous` and `Authenticated` on sign-in/sign-out. Every
//! transition keeps the cart's owner and the error-tracking user context in
//! step. Register, login, and logout additionally push a user-facing
//! notice; profile and password updates return their outcome silently.

use medimart_core::types::{Email, Envelope, UserRole};
use medimart_core::validate;
use secrecy::SecretString;
use tokio::sync::watch;
use tracing::instrument;

use crate::backend::{AuthError, DataGateway, IdentityClient, Principal};
use crate::cart::CartStore;
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::UserProfile;
use crate::services::Notifier;

/// Where the session currently stands.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    /// Provider not initialized yet; identity unknown.
    #[default]
    Loading,
    /// No signed-in identity.
    Anonymous,
    /// A signed-in shopper.
    Authenticated(SessionUser),
}

impl SessionState {
    /// True once the provider has settled out of `Loading`.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        !matches!(self, Self::Loading)
    }
}

/// The signed-in shopper: profile plus the platform session token.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct SessionUser {
    pub profile: UserProfile,
    token: SecretString,
}

impl SessionUser {
    /// Convenience for role gates.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.profile.role
    }
}

impl std::fmt::Debug for SessionUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionUser")
            .field("profile", &self.profile)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Shared session provider. Cheap to clone.
#[derive(Clone)]
pub struct SessionProvider {
    inner: std::sync::Arc<Inner>,
}

struct Inner {
    identity: IdentityClient,
    gateway: DataGateway,
    cart: CartStore,
    notifier: Notifier,
    state: watch::Sender<SessionState>,
}

impl SessionProvider {
    #[must_use]
    pub fn new(
        identity: IdentityClient,
        gateway: DataGateway,
        cart: CartStore,
        notifier: Notifier,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self {
            inner: std::sync::Arc::new(Inner {
                identity,
                gateway,
                cart,
                notifier,
                state,
            }),
        }
    }

    /// Settle the session out of `Loading`.
    ///
    /// Tokens are not persisted across restarts, so the settled state is
    /// always `Anonymous`.
    pub fn initialize(&self) {
        self.transition(SessionState::Anonymous);
    }

    /// The current session state.
    #[must_use]
    pub fn current(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to session transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// The signed-in shopper, if any.
    #[must_use]
    pub fn authenticated_user(&self) -> Option<SessionUser> {
        match &*self.inner.state.borrow() {
            SessionState::Authenticated(user) => Some(user.clone()),
            _ => None,
        }
    }

    /// Create an account and sign it in.
    ///
    /// Pushes a success or failure notice either way.
    #[instrument(skip_all)]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, AuthError> {
        match self.try_register(name, email, password).await {
            Ok(profile) => {
                self.inner
                    .notifier
                    .success(format!("Welcome to MediMart, {}!", profile.name));
                Ok(profile)
            }
            Err(err) => {
                self.inner.notifier.error(err.to_string());
                Err(err)
            }
        }
    }

    /// Sign in with email and password.
    ///
    /// Pushes a success or failure notice either way.
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        match self.try_login(email, password).await {
            Ok(profile) => {
                self.inner
                    .notifier
                    .success(format!("Signed in as {}", profile.email));
                Ok(profile)
            }
            Err(err) => {
                self.inner.notifier.error(err.to_string());
                Err(err)
            }
        }
    }

    /// Discard the session token and return to anonymous.
    ///
    /// Sign-out is local to this client; the transition clears the cart and
    /// its snapshot.
    pub fn logout(&self) {
        self.transition(SessionState::Anonymous);
        self.inner.notifier.success("Signed out");
    }

    /// Save new profile fields for the signed-in shopper.
    ///
    /// Input is expected pre-validated. On a successful save the session's
    /// copy of the profile is refreshed.
    pub async fn update_profile(
        &self,
        name: String,
        phone: String,
        address: String,
    ) -> Envelope<UserProfile> {
        let Some(user) = self.authenticated_user() else {
            return Envelope::failure(AuthError::NotAuthenticated.to_string());
        };

        let mut profile = user.profile;
        profile.name = name;
        profile.phone = phone;
        profile.address = address;

        let envelope = self.inner.gateway.upsert_profile(&profile).await;
        if let Some(saved) = envelope.data.clone() {
            self.replace_profile(saved);
        }
        envelope
    }

    /// Change the account password, verifying the current one first.
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let Some(user) = self.authenticated_user() else {
            return Err(AuthError::NotAuthenticated);
        };
        crate::backend::identity::validate_password(new_password)?;

        // Re-authenticate to prove the current password; a wrong one maps
        // to InvalidCredentials here, before anything is changed.
        let email = Email::parse(&user.profile.email)?;
        let principal = self.inner.identity.sign_in(&email, current_password).await?;
        self.inner
            .identity
            .update_password(&principal.id_token, new_password)
            .await?;

        // The pre-change token may no longer be honored.
        self.replace_token(principal.id_token);
        Ok(())
    }

    async fn try_register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, AuthError> {
        let name = name.trim();
        validate::name(name).map_err(|err| AuthError::InvalidName(err.to_string()))?;
        let email = Email::parse(email)?;
        crate::backend::identity::validate_password(password)?;

        let principal = self.inner.identity.sign_up(&email, password).await?;

        let mut profile = UserProfile::minimal(principal.uid.clone(), &principal.email);
        profile.name = name.to_string();

        // Best effort: a failed write leaves the synthesized profile local
        // until the next successful save.
        let saved = self.inner.gateway.upsert_profile(&profile).await;
        let profile = saved.data.unwrap_or(profile);

        self.transition(SessionState::Authenticated(SessionUser {
            profile: profile.clone(),
            token: principal.id_token,
        }));
        Ok(profile)
    }

    async fn try_login(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let email = Email::parse(email)?;
        let principal = self.inner.identity.sign_in(&email, password).await?;
        let profile = self.resolve_profile(&principal).await;

        self.transition(SessionState::Authenticated(SessionUser {
            profile: profile.clone(),
            token: principal.id_token.clone(),
        }));
        Ok(profile)
    }

    /// Load the profile document for a principal.
    ///
    /// A definitely-absent document (first login) is created with role
    /// `user`. A failed lookup synthesizes the same minimal profile in
    /// memory only, so a transient error can never overwrite a real
    /// document.
    async fn resolve_profile(&self, principal: &Principal) -> UserProfile {
        let envelope = self.inner.gateway.get_profile(&principal.uid).await;
        match envelope.data {
            Some(Some(profile)) => profile,
            Some(None) => {
                let profile = UserProfile::minimal(principal.uid.clone(), &principal.email);
                let saved = self.inner.gateway.upsert_profile(&profile).await;
                saved.data.unwrap_or(profile)
            }
            None => {
                tracing::warn!(uid = %principal.uid, "profile lookup failed, using minimal profile");
                UserProfile::minimal(principal.uid.clone(), &principal.email)
            }
        }
    }

    fn replace_profile(&self, profile: UserProfile) {
        self.inner.state.send_modify(|state| {
            if let SessionState::Authenticated(user) = state {
                user.profile = profile;
            }
        });
    }

    fn replace_token(&self, token: SecretString) {
        self.inner.state.send_modify(|state| {
            if let SessionState::Authenticated(user) = state {
                user.token = token;
            }
        });
    }

    fn transition(&self, next: SessionState) {
        match &next {
            SessionState::Authenticated(user) => {
                self.inner.cart.set_owner(Some(user.profile.uid.clone()));
                set_sentry_user(user.profile.uid.as_str(), &user.profile.email);
            }
            SessionState::Anonymous => {
                self.inner.cart.set_owner(None);
                clear_sentry_user();
            }
            SessionState::Loading => {}
        }
        self.inner.state.send_replace(next);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::DocumentClient;
    use crate::config::PlatformConfig;
    use crate::storage::LocalStore;
    use uuid::Uuid;

    fn offline_provider() -> (SessionProvider, CartStore, Notifier) {
        let config = PlatformConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            project: "test".to_string(),
            api_version: "v1".to_string(),
            api_key: SecretString::from("x9$kQ2mV8pL4wR7nT1zF5hB3jD6gS0a"),
        };
        let gateway = DataGateway::new(DocumentClient::new(&config).unwrap());
        let cart = CartStore::new(
            LocalStore::new(
                std::env::temp_dir().join(format!("medimart-session-test-{}.json", Uuid::new_v4())),
            ),
            gateway.clone(),
        );
        let notifier = Notifier::new();
        let provider = SessionProvider::new(
            IdentityClient::new(&config).unwrap(),
            gateway,
            cart.clone(),
            notifier.clone(),
        );
        (provider, cart, notifier)
    }

    #[tokio::test]
    async fn test_starts_loading_then_settles_anonymous() {
        let (provider, _cart, _notifier) = offline_provider();
        assert!(!provider.current().is_ready());

        provider.initialize();
        assert!(matches!(provider.current(), SessionState::Anonymous));
        assert!(provider.authenticated_user().is_none());
    }

    #[tokio::test]
    async fn test_subscribers_observe_transitions() {
        let (provider, _cart, _notifier) = offline_provider();
        let mut rx = provider.subscribe();

        provider.initialize();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_ready());
    }

    #[tokio::test]
    async fn test_logout_pushes_notice() {
        let (provider, _cart, notifier) = offline_provider();
        provider.initialize();
        provider.logout();

        let notices = notifier.drain();
        assert!(notices.iter().any(|n| n.message == "Signed out"));
    }

    #[tokio::test]
    async fn test_login_failure_pushes_error_notice() {
        let (provider, _cart, notifier) = offline_provider();
        provider.initialize();

        let result = provider.login("buyer@example.com", "password123").await;
        assert!(result.is_err());
        assert!(notifier
            .drain()
            .iter()
            .any(|n| n.kind == crate::services::NoticeKind::Error));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_name_before_network() {
        let (provider, _cart, _notifier) = offline_provider();
        provider.initialize();

        let result = provider.register("X", "buyer@example.com", "password123").await;
        assert!(matches!(result, Err(AuthError::InvalidName(_))));
    }

    #[tokio::test]
    async fn test_change_password_requires_session() {
        let (provider, _cart, _notifier) = offline_provider();
        provider.initialize();

        let result = provider.change_password("oldpassword", "newpassword").await;
        assert!(matches!(result, Err(AuthError::NotAuthenticated)));
    }
}
