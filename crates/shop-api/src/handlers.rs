//! # Request Handlers
//!
//! Axum request handlers for the checkout API.

use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use shop_core::{CartItem, CheckoutError, CheckoutRequest, ValidationError};
use tracing::{info, instrument, warn};
use uuid::Uuid;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create checkout session request.
///
/// Both fields are optional at the serde level so that a request missing
/// either one gets the checkout boundary's own validation error.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionBody {
    /// Cart snapshot, unit prices in major units
    #[serde(default)]
    pub items: Option<Vec<CartItem>>,
    #[serde(default)]
    pub customer_email: Option<String>,
}

impl CreateSessionBody {
    fn into_request(self) -> Result<CheckoutRequest, ValidationError> {
        match (self.items, self.customer_email) {
            (Some(items), Some(email)) => Ok(CheckoutRequest::new(items, email)),
            _ => Err(ValidationError::MissingParameters),
        }
    }
}

/// Create checkout session response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub session_id: String,
    /// Hosted checkout page, when the provider returns one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Client configuration response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfigResponse {
    pub publishable_key: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn checkout_error_to_response(err: CheckoutError) -> ApiError {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "storefront-checkout",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Publishable key for the client-side hosted-checkout redirect
pub async fn client_config(State(state): State<AppState>) -> Json<ClientConfigResponse> {
    Json(ClientConfigResponse {
        publishable_key: state.publishable_key.clone(),
    })
}

/// Create a hosted checkout session from a cart snapshot
#[instrument(skip_all, fields(attempt_id = %Uuid::new_v4()))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    body: Result<Json<CreateSessionBody>, JsonRejection>,
) -> Result<Json<CreateSessionResponse>, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        warn!("Malformed checkout body: {}", rejection.body_text());
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(rejection.body_text(), 400)),
        )
    })?;

    let request = body.into_request().map_err(|e| {
        warn!("Rejected checkout request: {}", e);
        checkout_error_to_response(e.into())
    })?;

    let session = state
        .checkout
        .create_checkout_session(&request)
        .await
        .map_err(checkout_error_to_response)?;

    info!("Returning checkout session: {}", session.session_id);

    Ok(Json(CreateSessionResponse {
        session_id: session.session_id,
        url: session.checkout_url,
    }))
}
