//! # Application State
//!
//! Shared state for the Axum application: the checkout service and the
//! configuration it was built from. Nothing in here is mutated after
//! start-up, so handlers only ever clone `Arc`s.

use shop_core::{
    BoxedCheckoutProvider, CheckoutConfig, CheckoutError, CheckoutService, ProductCatalog,
};
use shop_stripe::{StripeCheckoutProvider, StripeConfig};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Storefront base URL, used for redirect targets and CORS
    pub client_domain: String,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Countries accepted for shipping addresses
    pub allowed_countries: Vec<String>,
    /// Stripe shipping rate applied to every session
    pub shipping_rate: Option<String>,
    /// Upper bound on the provider call
    pub provider_timeout: Duration,
    /// Optional TOML catalog with authoritative prices
    pub product_catalog: Option<PathBuf>,
}

impl AppConfig {
    pub fn new(client_domain: impl Into<String>) -> Self {
        let client_domain: String = client_domain.into();
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            client_domain: client_domain.trim_end_matches('/').to_string(),
            environment: "development".to_string(),
            allowed_countries: vec!["US".to_string()],
            shipping_rate: None,
            provider_timeout: Duration::from_secs(20),
            product_catalog: None,
        }
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self, CheckoutError> {
        dotenvy::dotenv().ok();

        let client_domain = std::env::var("CLIENT_DOMAIN")
            .map_err(|_| CheckoutError::Configuration("CLIENT_DOMAIN not set".to_string()))?;

        let mut config = Self::new(client_domain);

        if let Ok(host) = std::env::var("HOST") {
            config.host = host;
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            config.port = port;
        }
        if let Ok(environment) = std::env::var("ENVIRONMENT") {
            config.environment = environment;
        }
        if let Ok(countries) = std::env::var("ALLOWED_COUNTRIES") {
            config.allowed_countries = parse_country_list(&countries);
        }
        config.shipping_rate = std::env::var("STRIPE_SHIPPING_RATE")
            .ok()
            .filter(|rate| !rate.trim().is_empty());
        if let Some(secs) = std::env::var("PROVIDER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
        {
            config.provider_timeout = Duration::from_secs(secs);
        }
        config.product_catalog = std::env::var("PRODUCT_CATALOG").ok().map(PathBuf::from);

        if config.allowed_countries.is_empty() {
            return Err(CheckoutError::Configuration(
                "ALLOWED_COUNTRIES must name at least one country".to_string(),
            ));
        }

        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, CheckoutError> {
        format!("{}:{}", self.host, self.port).parse().map_err(|_| {
            CheckoutError::Configuration(format!(
                "Invalid socket address: {}:{}",
                self.host, self.port
            ))
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Settings that are valid but probably not what an operator wants
    pub fn startup_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.shipping_rate.is_none() {
            warnings.push(
                "STRIPE_SHIPPING_RATE not set, sessions will be created without shipping options"
                    .to_string(),
            );
        }
        if self.is_production() && self.client_domain.starts_with("http://") {
            warnings.push(format!(
                "CLIENT_DOMAIN {} is not HTTPS in production",
                self.client_domain
            ));
        }
        warnings
    }

    /// Checkout settings derived from this configuration
    pub fn checkout_config(&self) -> CheckoutConfig {
        let mut checkout = CheckoutConfig::new(&self.client_domain)
            .with_allowed_countries(self.allowed_countries.clone())
            .with_provider_timeout(self.provider_timeout);
        if let Some(rate) = &self.shipping_rate {
            checkout = checkout.with_shipping_rate(rate.clone());
        }
        checkout
    }
}

fn parse_country_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .collect()
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Checkout session service
    pub checkout: Arc<CheckoutService>,
    /// Publishable key handed to the client for the hosted-checkout redirect
    pub publishable_key: String,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by Stripe, configured from the environment
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        for warning in config.startup_warnings() {
            warn!("{}", warning);
        }

        // Slightly above the service bound so the service reports the timeout
        let stripe_config = StripeConfig::from_env()?
            .with_request_timeout(config.provider_timeout + Duration::from_secs(1));
        let publishable_key = stripe_config.publishable_key.clone();
        let provider = StripeCheckoutProvider::new(stripe_config)?;

        let mut service = CheckoutService::new(Arc::new(provider), config.checkout_config());
        if let Some(path) = &config.product_catalog {
            service = service.with_catalog(load_product_catalog(path)?);
        }

        Ok(Self::from_parts(config, service, publishable_key))
    }

    /// Build state around an already-constructed provider
    pub fn with_provider(
        config: AppConfig,
        provider: BoxedCheckoutProvider,
        publishable_key: impl Into<String>,
    ) -> Self {
        let service = CheckoutService::new(provider, config.checkout_config());
        Self::from_parts(config, service, publishable_key)
    }

    pub fn from_parts(
        config: AppConfig,
        service: CheckoutService,
        publishable_key: impl Into<String>,
    ) -> Self {
        Self {
            checkout: Arc::new(service),
            publishable_key: publishable_key.into(),
            config,
        }
    }
}

/// Load the authoritative product catalog from a TOML file
fn load_product_catalog(path: &Path) -> anyhow::Result<ProductCatalog> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    let catalog = ProductCatalog::from_toml(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
    info!("Loaded {} products from {}", catalog.len(), path.display());
    Ok(catalog)
}
