//! # shop-core
//!
//! Core types and the checkout session service for the storefront.
//!
//! This crate provides:
//! - `CartStore` and `CartItem`, the client-owned cart and its snapshots
//! - `CheckoutService`, which validates a cart snapshot and opens a hosted
//!   checkout session through a `CheckoutProvider`
//! - `LineItem`, `SessionPayload`, and `CheckoutSession` for the provider boundary
//! - `ProductCatalog` for optional server-side pricing
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use shop_core::{
//!     CartItem, CartStore, CheckoutConfig, CheckoutRequest, CheckoutService, Currency,
//! };
//!
//! let mut cart = CartStore::new(Currency::USD);
//! cart.add_item(CartItem::new("p1", "Sunset", 50.00, 2));
//!
//! let service = CheckoutService::new(provider, CheckoutConfig::new("https://shop.example.com"));
//! let request = CheckoutRequest::new(cart.snapshot(), "a@b.com");
//!
//! let session = service.create_checkout_session(&request).await?;
//! // Hand session.session_id to the client for the hosted-checkout redirect
//! ```

pub mod cart;
pub mod checkout;
pub mod error;
pub mod product;
pub mod provider;
pub mod service;
pub mod validation;

// Re-exports for convenience
pub use cart::{CartItem, CartStore, CartTotals};
pub use checkout::{
    CheckoutConfig, CheckoutMode, CheckoutRequest, CheckoutSession, LineItem, SessionPayload,
    SESSION_ID_PLACEHOLDER,
};
pub use error::{
    CheckoutError, CheckoutResult, ProviderFailure, ValidationError, MISSING_PARAMETERS_MESSAGE,
    PROVIDER_FAILURE_MESSAGE,
};
pub use product::{Currency, Price, Product, ProductCatalog, MAX_UNIT_AMOUNT};
pub use provider::{BoxedCheckoutProvider, CheckoutProvider};
pub use service::CheckoutService;
pub use validation::{is_valid_email, validate_request, MAX_QUANTITY};
