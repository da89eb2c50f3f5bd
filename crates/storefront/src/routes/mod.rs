//! HTTP route handlers for the storefront.
//!
//! Every handler speaks JSON and answers with the uniform envelope
//! `{ success, data?, error? }`. Gateway-backed list and admin operations
//! pass the gateway's envelope through even on platform failure; routes
//! that compose around a single resource use `AppError` for proper status
//! codes (404 absent, 422 validation, 401/403 gates).
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness (503 until session settles)
//!
//! # Products
//! GET  /api/products              - Product listing (?category= filters)
//! GET  /api/products/{id}         - Product detail
//!
//! # Cart (session-scoped, works before sign-in)
//! GET  /api/cart                  - Cart contents with totals
//! POST /api/cart/add              - Add a product by id
//! POST /api/cart/update           - Set a line's quantity (0 removes)
//! POST /api/cart/remove           - Remove a line
//! POST /api/cart/clear            - Empty the cart
//! GET  /api/cart/count            - Unit count badge
//!
//! # Checkout (requires auth)
//! GET  /api/checkout/summary      - Quote totals (?state= for shipping)
//! POST /api/checkout              - Validate details and place the order
//!
//! # Orders (requires auth)
//! GET  /api/orders                - The shopper's orders, newest first
//! GET  /api/orders/{id}           - Track one order
//!
//! # Wishlist (requires auth)
//! GET  /api/wishlist              - The shopper's wishlist
//! POST /api/wishlist/toggle       - Add/remove a product
//!
//! # Auth
//! POST /api/auth/register         - Create an account and sign in
//! POST /api/auth/login            - Sign in
//! POST /api/auth/logout           - Sign out (requires auth)
//! GET  /api/auth/session          - Current session state
//!
//! # Account (requires auth)
//! GET  /api/account/profile       - The shopper's profile
//! PUT  /api/account/profile       - Update name/phone/address
//! POST /api/account/password      - Change password
//!
//! # Contact
//! POST /api/contact               - Submit feedback
//!
//! # Notices
//! GET  /api/notices               - Drain pending outcome notices
//!
//! # Admin (requires admin role)
//! POST   /api/admin/products            - Create a product
//! PUT    /api/admin/products/{id}       - Replace a product
//! DELETE /api/admin/products/{id}       - Delete a product
//! GET    /api/admin/orders              - All orders
//! PUT    /api/admin/orders/{id}/status  - Advance fulfilment status
//! GET    /api/admin/users               - All user profiles
//! PUT    /api/admin/users/{id}/role     - Change a user's role
//! GET    /api/admin/feedback            - All feedback
//! GET    /api/admin/shipping            - Shipping cost config
//! PUT    /api/admin/shipping            - Replace shipping cost config
//! ```

pub mod account;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod contact;
pub mod health;
pub mod notices;
pub mod orders;
pub mod products;
pub mod wishlist;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::place_order))
        .route("/summary", get(checkout::summary))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::index))
        .route("/toggle", post(wishlist::toggle))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::session))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(account::profile).put(account::update_profile))
        .route("/password", post(account::change_password))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(admin::create_product))
        .route(
            "/products/{id}",
            put(admin::update_product).delete(admin::delete_product),
        )
        .route("/orders", get(admin::all_orders))
        .route("/orders/{id}/status", put(admin::update_order_status))
        .route("/users", get(admin::all_users))
        .route("/users/{id}/role", put(admin::update_user_role))
        .route("/feedback", get(admin::all_feedback))
        .route(
            "/shipping",
            get(admin::shipping_costs).put(admin::update_shipping_costs),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health
        .route("/health", get(health::health))
        .route("/health/ready", get(health::ready))
        // Products
        .nest("/api/products", product_routes())
        // Cart
        .nest("/api/cart", cart_routes())
        // Checkout
        .nest("/api/checkout", checkout_routes())
        // Orders
        .nest("/api/orders", order_routes())
        // Wishlist
        .nest("/api/wishlist", wishlist_routes())
        // Auth
        .nest("/api/auth", auth_routes())
        // Account
        .nest("/api/account", account_routes())
        // Contact + notices
        .route("/api/contact", post(contact::submit))
        .route("/api/notices", get(notices::drain))
        // Admin back-office
        .nest("/api/admin", admin_routes())
}
