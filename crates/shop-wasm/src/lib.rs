//! # shop-wasm
//!
//! WebAssembly bindings for the storefront cart.
//!
//! The browser owns a `WasmCart` (a thin wrapper over `shop_core::CartStore`)
//! and, at checkout, asks it for the request body to POST to
//! `/create-checkout-session`. The same validation the server runs is
//! applied here first, so an obviously bad request never leaves the page.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmCart } from 'shop-wasm';
//!
//! await init();
//!
//! const cart = new WasmCart();
//! cart.add_item('p1', 'Sunset', 50.0, 1, 'Acrylic on canvas');
//! console.log('Total:', cart.format_total());
//!
//! const body = cart.checkout_body(email);
//! const { sessionId } = await (await fetch('/create-checkout-session', {
//!   method: 'POST', headers: { 'Content-Type': 'application/json' }, body,
//! })).json();
//!
//! const { error } = await stripe.redirectToCheckout({ sessionId });
//! if (error) showNotice(cart.redirect_failed(error.message));
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use serde::Serialize;
use shop_core::{
    validate_request, CartItem, CartStore, CheckoutError, CheckoutRequest, Currency,
};
use wasm_bindgen::prelude::*;

/// Notice shown when a checkout attempt fails; the cart is kept for a retry
pub const CHECKOUT_FAILED_NOTICE: &str = "Couldn't create checkout session, please try again";

/// Body of `POST /create-checkout-session`
#[derive(Debug, Serialize)]
struct CheckoutBody<'a> {
    items: &'a [CartItem],
    customer_email: &'a str,
}

/// Validate the cart snapshot and encode it for the checkout endpoint
fn checkout_body_json(cart: &CartStore, email: &str) -> Result<String, CheckoutError> {
    let request = CheckoutRequest::new(cart.snapshot(), email.trim());
    validate_request(&request)?;

    serde_json::to_string(&CheckoutBody {
        items: &request.items,
        customer_email: &request.customer_email,
    })
    .map_err(|e| CheckoutError::Configuration(format!("Failed to encode cart: {}", e)))
}

/// Browser-side cart
#[wasm_bindgen]
pub struct WasmCart {
    inner: CartStore,
}

impl Default for WasmCart {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl WasmCart {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: CartStore::new(Currency::USD),
        }
    }

    /// Add an item; adding an id already present bumps its quantity
    pub fn add_item(
        &mut self,
        id: String,
        display_name: String,
        unit_price: f64,
        quantity: u32,
        description: Option<String>,
    ) {
        let mut item = CartItem::new(id, display_name, unit_price, quantity);
        item.description = description;
        self.inner.add_item(item);
    }

    /// Remove an entry; returns false if it was not in the cart
    pub fn remove_item(&mut self, id: &str) -> bool {
        self.inner.remove_item(id).is_some()
    }

    pub fn set_quantity(&mut self, id: &str, quantity: u32) -> bool {
        self.inner.set_quantity(id, quantity)
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    #[wasm_bindgen(getter)]
    pub fn total_quantity(&self) -> u32 {
        self.inner.totals().total_quantity
    }

    /// Cart total in cents
    #[wasm_bindgen(getter)]
    pub fn total_cents(&self) -> i64 {
        self.inner.totals().total_amount
    }

    pub fn format_total(&self) -> String {
        format_price(self.total_cents())
    }

    /// Read-only copy of the entries as plain JS objects
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.snapshot())
            .map_err(|e| JsValue::from_str(&format!("Failed to export cart: {}", e)))
    }

    /// JSON body for the checkout endpoint, or the validation message
    pub fn checkout_body(&self, email: &str) -> Result<String, JsValue> {
        checkout_body_json(&self.inner, email).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Record a failed hosted-checkout redirect and return the notice to show.
    /// The cart is left as it was.
    pub fn redirect_failed(&self, message: &str) -> String {
        let err = CheckoutError::Redirect(message.to_string());
        log(&err.to_string());
        CHECKOUT_FAILED_NOTICE.to_string()
    }
}

/// Format a price in cents to display string
#[wasm_bindgen]
pub fn format_price(cents: i64) -> String {
    format!("${:.2}", cents as f64 / 100.0)
}

/// Basic email shape check, same rule the server applies
#[wasm_bindgen]
pub fn validate_email(email: &str) -> bool {
    shop_core::is_valid_email(email.trim())
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
