//! # Checkout Provider Trait
//!
//! The narrow seam between checkout logic and a hosted payments provider.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │          CheckoutProvider (trait)            │
//! │  ├── create_session(&SessionPayload)         │
//! │  └── provider_name()                         │
//! └──────────────────────────────────────────────┘
//!                       ▲
//!          ┌────────────┴────────────┐
//!  ┌───────┴────────┐        ┌───────┴───────┐
//!  │ StripeCheckout │        │  test doubles │
//!  │    Provider    │        │               │
//!  └────────────────┘        └───────────────┘
//! ```
//!
//! Validation and line-item construction happen before the provider is
//! called, so implementations only translate a ready payload to their API.

use crate::checkout::{CheckoutSession, SessionPayload};
use crate::error::ProviderFailure;
use async_trait::async_trait;
use std::sync::Arc;

/// A payments provider able to open hosted checkout sessions
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Request a new hosted checkout session.
    ///
    /// Each call may create a distinct session on the provider's side;
    /// callers must not retry blindly.
    async fn create_session(
        &self,
        payload: &SessionPayload,
    ) -> Result<CheckoutSession, ProviderFailure>;

    /// Provider name (for logging)
    fn provider_name(&self) -> &'static str;
}

/// Shared, dynamically dispatched provider
pub type BoxedCheckoutProvider = Arc<dyn CheckoutProvider>;
