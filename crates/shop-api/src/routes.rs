//! # Routes
//!
//! Axum router configuration for the checkout API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

/// Create the main application router
///
/// Routes:
///   - POST /create-checkout-session - Create a hosted checkout session
///   - GET  /config - Publishable key for the client redirect
///   - GET  /health - Health check
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin(&state.config.client_domain))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .route("/config", get(handlers::client_config))
        .route(
            "/create-checkout-session",
            post(handlers::create_checkout_session),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Only the storefront itself may call the API from a browser
fn allowed_origin(client_domain: &str) -> AllowOrigin {
    match HeaderValue::from_str(client_domain) {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(_) => {
            warn!("CLIENT_DOMAIN is not a valid origin, allowing any origin");
            AllowOrigin::any()
        }
    }
}
