//! # Stripe Checkout Sessions
//!
//! `CheckoutProvider` implementation over Stripe's Checkout Sessions API
//! (`POST /v1/checkout/sessions`, form-encoded).

use crate::config::StripeConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use shop_core::{CheckoutError, CheckoutProvider, CheckoutSession, ProviderFailure, SessionPayload};
use tracing::{debug, error, info, instrument};

/// Stripe hosted checkout provider
pub struct StripeCheckoutProvider {
    config: StripeConfig,
    client: Client,
}

impl StripeCheckoutProvider {
    /// Create a new Stripe checkout provider
    pub fn new(config: StripeConfig) -> Result<Self, CheckoutError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                CheckoutError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, CheckoutError> {
        let config = StripeConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    fn failure_from_transport(&self, e: reqwest::Error) -> ProviderFailure {
        if e.is_timeout() {
            ProviderFailure::Timeout(self.config.request_timeout)
        } else {
            ProviderFailure::Network(e.to_string())
        }
    }
}

/// Encode a session payload as Stripe form parameters
pub(crate) fn form_params(payload: &SessionPayload) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = vec![
        ("mode".to_string(), payload.mode.as_str().to_string()),
        ("success_url".to_string(), payload.success_url.clone()),
        ("cancel_url".to_string(), payload.cancel_url.clone()),
        ("customer_email".to_string(), payload.customer_email.clone()),
    ];

    for (i, method) in payload.payment_method_types.iter().enumerate() {
        params.push((format!("payment_method_types[{}]", i), method.clone()));
    }

    for (i, item) in payload.line_items.iter().enumerate() {
        params.push((
            format!("line_items[{}][price_data][currency]", i),
            item.currency.as_str().to_string(),
        ));
        params.push((
            format!("line_items[{}][price_data][unit_amount]", i),
            item.unit_amount.to_string(),
        ));
        params.push((
            format!("line_items[{}][price_data][product_data][name]", i),
            item.product_name.clone(),
        ));
        // Stripe rejects empty strings
        if let Some(desc) = item.product_description.as_ref().filter(|d| !d.is_empty()) {
            params.push((
                format!("line_items[{}][price_data][product_data][description]", i),
                desc.clone(),
            ));
        }
        params.push((format!("line_items[{}][quantity]", i), item.quantity.to_string()));
    }

    for (i, country) in payload.allowed_countries.iter().enumerate() {
        params.push((
            format!("shipping_address_collection[allowed_countries][{}]", i),
            country.clone(),
        ));
    }

    if let Some(ref rate) = payload.shipping_rate {
        params.push(("shipping_options[0][shipping_rate]".to_string(), rate.clone()));
    }

    params
}

#[async_trait]
impl CheckoutProvider for StripeCheckoutProvider {
    #[instrument(skip(self, payload), fields(line_items = payload.line_items.len()))]
    async fn create_session(
        &self,
        payload: &SessionPayload,
    ) -> Result<CheckoutSession, ProviderFailure> {
        let params = form_params(payload);
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        debug!("Creating Stripe checkout session: {} form fields", params.len());

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&params)
            .send()
            .await
            .map_err(|e| self.failure_from_transport(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.failure_from_transport(e))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            let message = serde_json::from_str::<StripeErrorResponse>(&body)
                .map(|r| r.error.describe())
                .unwrap_or_else(|_| format!("HTTP {}: {}", status, body));

            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ProviderFailure::Authentication(message)
                }
                _ => ProviderFailure::Rejected {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let session: StripeCheckoutSessionResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderFailure::InvalidResponse(format!("Failed to parse Stripe response: {}", e))
        })?;

        info!("Created Stripe checkout session: id={}", session.id);

        let mut created = CheckoutSession::new(session.id);
        if let Some(url) = session.url {
            created = created.with_checkout_url(url);
        }
        Ok(created)
    }

    fn provider_name(&self) -> &'static str {
        "stripe"
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    param: Option<String>,
}

impl StripeError {
    fn describe(&self) -> String {
        match (&self.code, &self.param) {
            (Some(code), Some(param)) => format!("{} ({}, param={})", self.message, code, param),
            (Some(code), None) => format!("{} ({})", self.message, code),
            _ => self.message.clone(),
        }
    }
}
