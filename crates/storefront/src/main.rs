//! MediMart Storefront - medical equipment e-commerce server.
//!
//! This binary serves the storefront JSON API on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework serving a JSON API
//! - Managed commerce platform for documents (catalog, orders, profiles)
//! - Platform identity API for email/password authentication
//! - Local JSON file for the persistent cart
//!
//! # Security
//!
//! This binary talks to the platform with a per-project API key. Admin
//! routes are gated on the signed-in profile's role; there is no separate
//! admin binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use medimart_core::Envelope;
use medimart_storefront::config::StorefrontConfig;
use medimart_storefront::{routes, state::AppState};
use sentry::integrations::tracing as sentry_tracing;
use sentry_tracing::EventFilter;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Start Sentry if a DSN is configured. The guard flushes events on drop,
/// so it has to outlive the server.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry.dsn.as_deref()?;
    let options = sentry::ClientOptions {
        release: sentry::release_name!(),
        environment: config.sentry.environment.clone().map(Into::into),
        sample_rate: config.sentry.sample_rate,
        traces_sample_rate: config.sentry.traces_sample_rate,
        attach_stacktrace: true,
        ..Default::default()
    };
    let guard = sentry::init((dsn, options));
    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Route tracing output into Sentry: errors and warnings become events,
/// info and debug become breadcrumbs on the next event.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => EventFilter::Breadcrumb,
        _ => EventFilter::Ignore,
    }
}

/// Turn a handler panic into the standard failure envelope. The message
/// points the client back to the home route; no panic detail leaks out.
fn handle_panic(_err: Box<dyn std::any::Any + Send + 'static>) -> axum::response::Response {
    tracing::error!("Handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(Envelope::<()>::failure(
            "Something went wrong on our side. Return to the home page (/) and try again.",
        )),
    )
        .into_response()
}

#[tokio::main]
async fn main() {
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Sentry first: its tracing layer must exist before the subscriber.
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "medimart_storefront=info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    // Platform clients, gateway, cart store, session provider.
    let state = AppState::new(config.clone()).expect("Failed to initialize application state");

    // Settle the session out of its loading state
    state.session().initialize();

    let app = routes::routes()
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    tracing::info!("storefront listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Resolve when the process is told to stop (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    tokio::select! {
        () = ctrl_c => {},
        () = sigterm() => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(unix)]
async fn sigterm() {
    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        .expect("Failed to install signal handler")
        .recv()
        .await;
}

#[cfg(not(unix))]
async fn sigterm() {
    std::future::pending::<()>().await;
}
