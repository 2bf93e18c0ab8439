//! # shop-stripe
//!
//! Stripe Checkout Sessions provider for the storefront.
//!
//! `StripeCheckoutProvider` implements `shop_core::CheckoutProvider`: it
//! form-encodes a ready `SessionPayload` (line items, customer email,
//! redirect URLs, shipping rules) and returns the session id Stripe issues.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shop_core::{CheckoutConfig, CheckoutService};
//! use shop_stripe::StripeCheckoutProvider;
//!
//! let provider = StripeCheckoutProvider::from_env()?;
//! let service = CheckoutService::new(
//!     Arc::new(provider),
//!     CheckoutConfig::new("https://shop.example.com"),
//! );
//!
//! let session = service.create_checkout_session(&request).await?;
//! // The client redirects with session.session_id and the publishable key
//! ```

pub mod checkout;
pub mod config;

// Re-exports
pub use checkout::StripeCheckoutProvider;
pub use config::StripeConfig;
