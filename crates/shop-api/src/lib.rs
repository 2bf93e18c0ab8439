//! # shop-api
//!
//! HTTP API layer for the storefront checkout service.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The checkout session endpoint the storefront posts its cart to
//! - The publishable key endpoint used for the client-side redirect
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/config` | Publishable key |
//! | POST | `/create-checkout-session` | Create checkout session |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
