//! # Storefront Checkout
//!
//! Checkout session service for the storefront.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export CLIENT_DOMAIN=https://shop.example.com
//! export STRIPE_SECRET_KEY=sk_test_...
//! export STRIPE_PUBLISHABLE_KEY=pk_test_...
//! export STRIPE_SHIPPING_RATE=shr_...   # optional
//!
//! # Run the server
//! storefront-checkout
//! ```

use shop_api::{routes, state::AppState};
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Client domain: {}", state.config.client_domain);
    info!("Payment provider: {}", state.checkout.provider_name());
    match state.checkout.catalog() {
        Some(catalog) => info!("Pricing from catalog: {} products", catalog.len()),
        None => info!("Pricing from client carts (no catalog configured)"),
    }

    let app = routes::create_router(state);

    info!("Storefront checkout listening on http://{}", addr);
    if !is_prod {
        info!("Checkout: POST http://{}/create-checkout-session", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `RUST_LOG` filters (default `info`); `LOG_FORMAT=json` switches to JSON lines
fn init_tracing() {
    let json = std::env::var("LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(fmt::layer))
        .init();
}
