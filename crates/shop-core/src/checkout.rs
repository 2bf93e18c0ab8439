//! # Checkout Types
//!
//! Request, configuration, and provider-facing payload types for creating a
//! hosted checkout session.

use crate::cart::CartItem;
use crate::product::{Currency, Product};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Placeholder the provider replaces with the real session id on redirect
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// One checkout attempt: a cart snapshot plus a contact email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CartItem>,
    pub customer_email: String,
}

impl CheckoutRequest {
    pub fn new(items: Vec<CartItem>, customer_email: impl Into<String>) -> Self {
        Self {
            items,
            customer_email: customer_email.into(),
        }
    }
}

/// A provider-facing line item priced in minor units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub quantity: u32,

    /// Unit price in minor units (cents for USD)
    pub unit_amount: i64,

    pub currency: Currency,

    pub product_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_description: Option<String>,
}

impl LineItem {
    /// Build from a cart entry whose price has already been resolved
    pub fn from_cart_item(item: &CartItem, unit_amount: i64, currency: Currency) -> Self {
        Self {
            quantity: item.quantity,
            unit_amount,
            currency,
            product_name: item.display_name.clone(),
            product_description: item.description.clone(),
        }
    }

    /// Build from the catalog's name, description and price
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            quantity,
            unit_amount: product.price.amount,
            currency: product.price.currency,
            product_name: product.name.clone(),
            product_description: Some(product.description.clone()).filter(|d| !d.is_empty()),
        }
    }

    /// Line total in minor units, saturating at `i64::MAX`
    pub fn total(&self) -> i64 {
        self.unit_amount.saturating_mul(i64::from(self.quantity))
    }
}

/// Checkout mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutMode {
    /// One-time payment
    #[default]
    Payment,
}

impl CheckoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutMode::Payment => "payment",
        }
    }
}

/// Fixed, environment-derived checkout settings
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Base URL of the storefront (e.g. "https://shop.example.com")
    pub client_domain: String,
    /// Success page path; the session id is appended as a query parameter
    pub success_path: String,
    pub cancel_path: String,
    pub currency: Currency,
    /// ISO 3166-1 alpha-2 codes accepted for shipping
    pub allowed_countries: Vec<String>,
    /// Provider shipping-rate reference (e.g. "shr_...")
    pub shipping_rate: Option<String>,
    pub payment_method_types: Vec<String>,
    /// Upper bound on the provider call
    pub provider_timeout: Duration,
}

impl CheckoutConfig {
    pub fn new(client_domain: impl Into<String>) -> Self {
        let client_domain: String = client_domain.into();
        Self {
            client_domain: client_domain.trim_end_matches('/').to_string(),
            success_path: "/success".to_string(),
            cancel_path: "/cancelled".to_string(),
            currency: Currency::USD,
            allowed_countries: vec!["US".to_string()],
            shipping_rate: None,
            payment_method_types: vec!["card".to_string(), "us_bank_account".to_string()],
            provider_timeout: Duration::from_secs(20),
        }
    }

    pub fn with_shipping_rate(mut self, rate: impl Into<String>) -> Self {
        self.shipping_rate = Some(rate.into());
        self
    }

    pub fn with_allowed_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_countries = countries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Success URL carrying the provider's session id placeholder
    pub fn success_url(&self) -> String {
        let base = format!("{}{}", self.client_domain, self.success_path);
        let separator = if base.contains('?') { '&' } else { '?' };
        format!("{}{}session_id={}", base, separator, SESSION_ID_PLACEHOLDER)
    }

    pub fn cancel_url(&self) -> String {
        format!("{}{}", self.client_domain, self.cancel_path)
    }
}

/// Everything the provider needs to open a hosted checkout session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionPayload {
    pub mode: CheckoutMode,
    pub line_items: Vec<LineItem>,
    pub customer_email: String,
    pub success_url: String,
    pub cancel_url: String,
    pub allowed_countries: Vec<String>,
    pub shipping_rate: Option<String>,
    pub payment_method_types: Vec<String>,
}

impl SessionPayload {
    pub fn new(line_items: Vec<LineItem>, customer_email: String, config: &CheckoutConfig) -> Self {
        Self {
            mode: CheckoutMode::Payment,
            line_items,
            customer_email,
            success_url: config.success_url(),
            cancel_url: config.cancel_url(),
            allowed_countries: config.allowed_countries.clone(),
            shipping_rate: config.shipping_rate.clone(),
            payment_method_types: config.payment_method_types.clone(),
        }
    }

    /// Sum of line totals in minor units (before shipping)
    pub fn subtotal(&self) -> i64 {
        self.line_items
            .iter()
            .fold(0i64, |acc, item| acc.saturating_add(item.total()))
    }

    pub fn item_count(&self) -> u64 {
        self.line_items
            .iter()
            .map(|item| u64::from(item.quantity))
            .sum()
    }
}

/// A hosted checkout session issued by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Opaque provider handle, redeemed once by the client redirect
    pub session_id: String,

    /// Hosted checkout page, when the provider returns one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl CheckoutSession {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            checkout_url: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_checkout_url(mut self, url: impl Into<String>) -> Self {
        self.checkout_url = Some(url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_urls() {
        let config = CheckoutConfig::new("https://shop.example.com/");

        assert_eq!(
            config.success_url(),
            "https://shop.example.com/success?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(config.cancel_url(), "https://shop.example.com/cancelled");
    }

    #[test]
    fn test_success_url_with_existing_query() {
        let mut config = CheckoutConfig::new("https://shop.example.com");
        config.success_path = "/success?ref=cart".to_string();

        assert_eq!(
            config.success_url(),
            "https://shop.example.com/success?ref=cart&session_id={CHECKOUT_SESSION_ID}"
        );
    }

    #[test]
    fn test_payload_carries_config() {
        let config = CheckoutConfig::new("https://shop.example.com")
            .with_shipping_rate("shr_standard")
            .with_allowed_countries(["US", "CA"]);
        let item = CartItem::new("p1", "Sunset", 50.0, 2);
        let line = LineItem::from_cart_item(&item, 5000, Currency::USD);

        let payload = SessionPayload::new(vec![line], "a@b.com".to_string(), &config);

        assert_eq!(payload.mode.as_str(), "payment");
        assert_eq!(payload.shipping_rate.as_deref(), Some("shr_standard"));
        assert_eq!(payload.allowed_countries, vec!["US", "CA"]);
        assert_eq!(payload.subtotal(), 10000);
        assert_eq!(payload.item_count(), 2);
    }

    #[test]
    fn test_payload_figures_with_extreme_lines() {
        let config = CheckoutConfig::new("https://shop.example.com");
        let big = CartItem::new("p1", "Sunset", 1.0, u32::MAX);
        let lines = vec![
            LineItem::from_cart_item(&big, i64::MAX, Currency::USD),
            LineItem::from_cart_item(&CartItem::new("p2", "Dunes", 1.0, 2), 100, Currency::USD),
        ];

        let payload = SessionPayload::new(lines, "a@b.com".to_string(), &config);

        assert_eq!(payload.item_count(), u64::from(u32::MAX) + 2);
        assert_eq!(payload.line_items[0].total(), i64::MAX);
        assert_eq!(payload.subtotal(), i64::MAX);
    }
}
