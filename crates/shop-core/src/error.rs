//! # Checkout Error Types
//!
//! Typed error handling for the checkout boundary.
//! Every checkout operation returns `Result<T, CheckoutError>`.
//!
//! Provider failures carry their detail as the error `source` so operators can
//! log it, while the `Display` text handed back to callers stays generic.

use std::time::Duration;
use thiserror::Error;

/// Wire message for requests missing `items` or `customer_email`
pub const MISSING_PARAMETERS_MESSAGE: &str = "missing required session parameters";

/// Wire message for any payments provider failure
pub const PROVIDER_FAILURE_MESSAGE: &str = "an error occured, couldnt create session";

/// Top-level error for the checkout boundary
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Missing or malformed request data, rejected before any network call
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The payments provider rejected or failed to process the request
    #[error("{}", PROVIDER_FAILURE_MESSAGE)]
    Provider(#[source] ProviderFailure),

    /// The hosted-checkout redirect failed after a session was created
    #[error("checkout redirect failed: {0}")]
    Redirect(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CheckoutError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::Validation(_) => 400,
            CheckoutError::Provider(_) => 400,
            CheckoutError::Redirect(_) => 400,
            CheckoutError::Configuration(_) => 500,
        }
    }

    /// True when the failure happened locally, before the provider was contacted
    pub fn is_validation(&self) -> bool {
        matches!(self, CheckoutError::Validation(_))
    }

    /// The underlying provider failure, if any (for logging only)
    pub fn provider_failure(&self) -> Option<&ProviderFailure> {
        match self {
            CheckoutError::Provider(failure) => Some(failure),
            _ => None,
        }
    }
}

impl From<ProviderFailure> for CheckoutError {
    fn from(failure: ProviderFailure) -> Self {
        CheckoutError::Provider(failure)
    }
}

/// Local request validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{}", MISSING_PARAMETERS_MESSAGE)]
    MissingParameters,

    #[error("item at position {position} has no product id")]
    MissingItemId { position: usize },

    #[error(
        "invalid quantity for item {item_id}: must be between 1 and {}",
        crate::validation::MAX_QUANTITY
    )]
    InvalidQuantity { item_id: String },

    #[error("invalid price for item {item_id}")]
    InvalidPrice { item_id: String },

    #[error("unknown or unavailable product: {item_id}")]
    UnknownProduct { item_id: String },

    #[error("invalid customer email")]
    InvalidEmail,
}

/// Failure reported by a payments provider implementation
#[derive(Debug, Error)]
pub enum ProviderFailure {
    /// No response within the configured bound
    #[error("provider call timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Transport-level failure (DNS, TLS, connection reset)
    #[error("network error: {0}")]
    Network(String),

    /// Provider refused our credentials
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Provider rejected the session request
    #[error("rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Provider answered but the body could not be used
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderFailure {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderFailure::Timeout(_))
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;
