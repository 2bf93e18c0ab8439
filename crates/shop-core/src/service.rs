//! # Checkout Session Service
//!
//! Turns a cart snapshot and contact email into a hosted checkout session.
//!
//! ```text
//! CheckoutRequest ─▶ validate ─▶ line items ─▶ SessionPayload ─▶ provider
//!        │               │             │                             │
//!        │         Validation    Validation                   Provider (generic)
//!        ▼                                                           ▼
//!                                                       CheckoutSession { session_id }
//! ```
//!
//! The service holds no mutable state. Each call makes at most one provider
//! request, bounded by `CheckoutConfig::provider_timeout`, and never retries:
//! two identical requests produce two distinct sessions.

use crate::cart::CartItem;
use crate::checkout::{CheckoutConfig, CheckoutRequest, CheckoutSession, LineItem, SessionPayload};
use crate::error::{CheckoutError, CheckoutResult, ProviderFailure, ValidationError};
use crate::product::ProductCatalog;
use crate::provider::BoxedCheckoutProvider;
use crate::validation::validate_request;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Creates checkout sessions against a single provider
#[derive(Clone)]
pub struct CheckoutService {
    provider: BoxedCheckoutProvider,
    config: CheckoutConfig,
    /// Authoritative prices; client prices are used when absent
    catalog: Option<Arc<ProductCatalog>>,
}

impl CheckoutService {
    pub fn new(provider: BoxedCheckoutProvider, config: CheckoutConfig) -> Self {
        Self {
            provider,
            config,
            catalog: None,
        }
    }

    /// Price line items from `catalog` instead of the cart
    pub fn with_catalog(mut self, catalog: ProductCatalog) -> Self {
        self.catalog = Some(Arc::new(catalog));
        self
    }

    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    pub fn catalog(&self) -> Option<&ProductCatalog> {
        self.catalog.as_deref()
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Convert cart entries into provider line items
    pub fn build_line_items(&self, items: &[CartItem]) -> Result<Vec<LineItem>, ValidationError> {
        items.iter().map(|item| self.line_item(item)).collect()
    }

    fn line_item(&self, item: &CartItem) -> Result<LineItem, ValidationError> {
        let invalid_price = || ValidationError::InvalidPrice {
            item_id: item.id.clone(),
        };

        if let Some(catalog) = &self.catalog {
            let product = catalog
                .get_active(&item.id)
                .ok_or_else(|| ValidationError::UnknownProduct {
                    item_id: item.id.clone(),
                })?;
            if !product.price.is_chargeable() {
                return Err(invalid_price());
            }
            return Ok(LineItem::from_product(product, item.quantity));
        }

        let currency = self.config.currency;
        let unit_amount = currency
            .to_minor_units(item.unit_price)
            .ok_or_else(invalid_price)?;

        Ok(LineItem::from_cart_item(item, unit_amount, currency))
    }

    /// Validate the request and build the provider payload, without any I/O
    pub fn build_payload(
        &self,
        request: &CheckoutRequest,
    ) -> Result<SessionPayload, ValidationError> {
        validate_request(request)?;
        let line_items = self.build_line_items(&request.items)?;
        Ok(SessionPayload::new(
            line_items,
            request.customer_email.trim().to_string(),
            &self.config,
        ))
    }

    /// Create a hosted checkout session for `request`.
    ///
    /// Validation failures return before the provider is contacted. Provider
    /// failures are logged here and surface as a generic
    /// [`CheckoutError::Provider`].
    #[instrument(
        skip(self, request),
        fields(provider = self.provider.provider_name(), items = request.items.len())
    )]
    pub async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> CheckoutResult<CheckoutSession> {
        let payload = self.build_payload(request).map_err(|e| {
            warn!("Rejected checkout request: {}", e);
            CheckoutError::from(e)
        })?;

        debug!(
            "Requesting checkout session: {} line items, {} units, subtotal={}",
            payload.line_items.len(),
            payload.item_count(),
            payload.subtotal()
        );

        let timeout = self.config.provider_timeout;
        let call = self.provider.create_session(&payload);
        let result = match tokio::time::timeout(timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ProviderFailure::Timeout(timeout)),
        };

        let session = result
            .and_then(|session| {
                if session.session_id.trim().is_empty() {
                    Err(ProviderFailure::InvalidResponse(
                        "provider returned an empty session id".to_string(),
                    ))
                } else {
                    Ok(session)
                }
            })
            .map_err(|failure| {
                error!(
                    timeout = failure.is_timeout(),
                    "Checkout session creation failed: {}", failure
                );
                CheckoutError::Provider(failure)
            })?;

        info!("Created checkout session: {}", session.session_id);
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MISSING_PARAMETERS_MESSAGE, PROVIDER_FAILURE_MESSAGE};
    use crate::product::{Currency, Price, Product, MAX_UNIT_AMOUNT};
    use crate::validation::MAX_QUANTITY;
    use crate::provider::CheckoutProvider;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    enum Behaviour {
        Succeed,
        EmptyId,
        Fail,
        Hang,
    }

    struct MockProvider {
        behaviour: Behaviour,
        calls: AtomicUsize,
        last_payload: Mutex<Option<SessionPayload>>,
    }

    impl MockProvider {
        fn new(behaviour: Behaviour) -> Arc<Self> {
            Arc::new(Self {
                behaviour,
                calls: AtomicUsize::new(0),
                last_payload: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_payload(&self) -> SessionPayload {
            self.last_payload.lock().unwrap().clone().unwrap()
        }
    }

    #[async_trait]
    impl CheckoutProvider for MockProvider {
        async fn create_session(
            &self,
            payload: &SessionPayload,
        ) -> Result<CheckoutSession, ProviderFailure> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            *self.last_payload.lock().unwrap() = Some(payload.clone());
            match self.behaviour {
                Behaviour::Succeed => Ok(CheckoutSession::new(format!("cs_test_{}", n))),
                Behaviour::EmptyId => Ok(CheckoutSession::new("")),
                Behaviour::Fail => Err(ProviderFailure::Authentication(
                    "Invalid API Key provided: sk_test_****".to_string(),
                )),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(CheckoutSession::new("cs_too_late"))
                }
            }
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }

    fn service(provider: &Arc<MockProvider>) -> CheckoutService {
        let config = CheckoutConfig::new("https://shop.example.com").with_shipping_rate("shr_flat");
        CheckoutService::new(provider.clone(), config)
    }

    fn usd(amount: i64) -> Price {
        Price::from_minor(amount, Currency::USD)
    }

    fn sunset_request() -> CheckoutRequest {
        CheckoutRequest::new(vec![CartItem::new("p1", "Sunset", 50.00, 2)], "a@b.com")
    }

    #[tokio::test]
    async fn test_single_item_checkout() {
        let provider = MockProvider::new(Behaviour::Succeed);
        let session = service(&provider)
            .create_checkout_session(&sunset_request())
            .await
            .unwrap();

        assert_eq!(session.session_id, "cs_test_1");
        assert_eq!(provider.calls(), 1);

        let payload = provider.last_payload();
        assert_eq!(payload.line_items.len(), 1);
        let line = &payload.line_items[0];
        assert_eq!(line.quantity, 2);
        assert_eq!(line.unit_amount, 5000);
        assert_eq!(line.currency.as_str(), "usd");
        assert_eq!(line.product_name, "Sunset");
        assert_eq!(payload.customer_email, "a@b.com");
        assert_eq!(
            payload.success_url,
            "https://shop.example.com/success?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(payload.cancel_url, "https://shop.example.com/cancelled");
        assert_eq!(payload.allowed_countries, vec!["US"]);
        assert_eq!(payload.shipping_rate.as_deref(), Some("shr_flat"));
    }

    #[tokio::test]
    async fn test_missing_fields_never_reach_provider() {
        let provider = MockProvider::new(Behaviour::Succeed);
        let service = service(&provider);

        let empty_items = CheckoutRequest::new(vec![], "a@b.com");
        let err = service.create_checkout_session(&empty_items).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), MISSING_PARAMETERS_MESSAGE);

        let no_email = CheckoutRequest::new(vec![CartItem::new("p1", "Sunset", 1.0, 1)], "");
        let err = service.create_checkout_session(&no_email).await.unwrap_err();
        assert_eq!(err.to_string(), MISSING_PARAMETERS_MESSAGE);

        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_price_never_reaches_provider() {
        let provider = MockProvider::new(Behaviour::Succeed);
        let request = CheckoutRequest::new(vec![CartItem::new("p1", "Sunset", -5.0, 1)], "a@b.com");

        let err = service(&provider)
            .create_checkout_session(&request)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Validation(ValidationError::InvalidPrice { .. })
        ));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_is_generic() {
        let provider = MockProvider::new(Behaviour::Fail);
        let err = service(&provider)
            .create_checkout_session(&sunset_request())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), PROVIDER_FAILURE_MESSAGE);
        assert!(matches!(
            err.provider_failure(),
            Some(ProviderFailure::Authentication(_))
        ));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_session_id_is_a_failure() {
        let provider = MockProvider::new(Behaviour::EmptyId);
        let err = service(&provider)
            .create_checkout_session(&sunset_request())
            .await
            .unwrap_err();

        assert!(matches!(
            err.provider_failure(),
            Some(ProviderFailure::InvalidResponse(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_timeout() {
        let provider = MockProvider::new(Behaviour::Hang);
        let service = CheckoutService::new(
            provider.clone(),
            CheckoutConfig::new("https://shop.example.com")
                .with_provider_timeout(Duration::from_secs(5)),
        );

        let err = service
            .create_checkout_session(&sunset_request())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), PROVIDER_FAILURE_MESSAGE);
        assert!(err.provider_failure().unwrap().is_timeout());
    }

    #[tokio::test]
    async fn test_identical_requests_create_distinct_sessions() {
        let provider = MockProvider::new(Behaviour::Succeed);
        let service = service(&provider);
        let request = sunset_request();

        let first = service.create_checkout_session(&request).await.unwrap();
        let second = service.create_checkout_session(&request).await.unwrap();

        assert_ne!(first.session_id, second.session_id);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_catalog_prices_override_cart() {
        let provider = MockProvider::new(Behaviour::Succeed);
        let catalog = ProductCatalog::new()
            .with_product(
                Product::new("p1", "Sunset (framed)", usd(7500))
                    .with_description("Framed giclée print"),
            )
            .with_product(Product::new("p2", "Sold Out", usd(100)).inactive());
        let service = service(&provider).with_catalog(catalog);

        // Client claims $0.01
        let request = CheckoutRequest::new(vec![CartItem::new("p1", "Sunset", 0.01, 1)], "a@b.com");
        service.create_checkout_session(&request).await.unwrap();

        let line = &provider.last_payload().line_items[0];
        assert_eq!(line.unit_amount, 7500);
        assert_eq!(line.product_name, "Sunset (framed)");
        assert_eq!(line.product_description.as_deref(), Some("Framed giclée print"));

        let unavailable =
            CheckoutRequest::new(vec![CartItem::new("p2", "Sold Out", 1.0, 1)], "a@b.com");
        let err = service.create_checkout_session(&unavailable).await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Validation(ValidationError::UnknownProduct { .. })
        ));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_unchargeable_catalog_price_never_reaches_provider() {
        let provider = MockProvider::new(Behaviour::Succeed);
        let catalog = ProductCatalog::new()
            .with_product(Product::new("refund", "Refund Voucher", usd(-500)))
            .with_product(Product::new("mural", "Mural", usd(MAX_UNIT_AMOUNT + 1)));
        let service = service(&provider).with_catalog(catalog);

        for id in ["refund", "mural"] {
            let request = CheckoutRequest::new(vec![CartItem::new(id, id, 10.0, 1)], "a@b.com");
            let err = service.create_checkout_session(&request).await.unwrap_err();
            assert!(matches!(
                err,
                CheckoutError::Validation(ValidationError::InvalidPrice { ref item_id })
                    if item_id == id
            ));
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_oversized_client_price_never_reaches_provider() {
        let provider = MockProvider::new(Behaviour::Succeed);
        let request = CheckoutRequest::new(vec![CartItem::new("p1", "Sunset", 5e16, 2)], "a@b.com");

        let err = service(&provider)
            .create_checkout_session(&request)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Validation(ValidationError::InvalidPrice { .. })
        ));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_extreme_quantities_with_debug_logging() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let provider = MockProvider::new(Behaviour::Succeed);
        let request = CheckoutRequest::new(
            vec![
                CartItem::new("p1", "Sunset", 999_999.99, MAX_QUANTITY),
                CartItem::new("p2", "Dunes", 999_999.99, MAX_QUANTITY),
            ],
            "a@b.com",
        );

        service(&provider)
            .create_checkout_session(&request)
            .await
            .unwrap();

        let payload = provider.last_payload();
        assert_eq!(payload.item_count(), 2 * u64::from(MAX_QUANTITY));
        assert_eq!(payload.subtotal(), 2 * MAX_UNIT_AMOUNT * i64::from(MAX_QUANTITY));

        let unbounded = CheckoutRequest::new(
            vec![
                CartItem::new("p1", "Sunset", 1.0, u32::MAX),
                CartItem::new("p2", "Dunes", 1.0, 2),
            ],
            "a@b.com",
        );
        let err = service(&provider)
            .create_checkout_session(&unbounded)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Validation(ValidationError::InvalidQuantity { .. })
        ));
        assert_eq!(provider.calls(), 1);
    }

    #[test]
    fn test_price_conversion() {
        let provider = MockProvider::new(Behaviour::Succeed);
        let items = vec![
            CartItem::new("a", "A", 19.99, 1),
            CartItem::new("b", "B", 10.0, 3).with_description("Limited edition"),
        ];

        let lines = service(&provider).build_line_items(&items).unwrap();

        assert_eq!(lines[0].unit_amount, 1999);
        assert_eq!(lines[1].unit_amount, 1000);
        assert_eq!(lines[1].quantity, 3);
        assert_eq!(lines[1].product_description.as_deref(), Some("Limited edition"));
    }
}
