//! # Product Types
//!
//! Money types and the optional authoritative product catalog.
//! When a catalog is configured it is loaded from a TOML file and used to
//! re-derive prices server-side instead of trusting the cart.

use serde::{Deserialize, Serialize};

/// Largest unit amount, in minor units, a hosted checkout line accepts (8 digits)
pub const MAX_UNIT_AMOUNT: i64 = 99_999_999;

/// Supported currencies (ISO 4217). Sessions are always priced in USD.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    USD,
}

impl Currency {
    /// Returns the lowercase ISO 4217 code the provider expects
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "usd",
        }
    }

    fn minor_units_per_major(&self) -> f64 {
        match self {
            Currency::USD => 100.0,
        }
    }

    /// Convert a major-unit amount to minor units, rounding half up.
    ///
    /// Returns `None` for negative or non-finite amounts, and for amounts
    /// above [`MAX_UNIT_AMOUNT`].
    pub fn to_minor_units(&self, amount: f64) -> Option<i64> {
        if !amount.is_finite() || amount < 0.0 {
            return None;
        }
        let minor = (amount * self.minor_units_per_major()).round();
        if minor > MAX_UNIT_AMOUNT as f64 {
            return None;
        }
        Some(minor as i64)
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Price in minor currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in minor units (cents for USD)
    pub amount: i64,
    #[serde(default)]
    pub currency: Currency,
}

impl Price {
    pub fn from_minor(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Whether a hosted checkout line can carry this amount
    pub fn is_chargeable(&self) -> bool {
        (0..=MAX_UNIT_AMOUNT).contains(&self.amount)
    }
}

/// A catalog product, as priced by the store owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    /// Whether this product can currently be purchased
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            active: true,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: mark as unavailable
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Authoritative product catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCatalog {
    #[serde(default)]
    pub products: Vec<Product>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Builder: add a product
    pub fn with_product(mut self, product: Product) -> Self {
        self.add(product);
        self
    }

    /// Find a product by ID
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Find a product that can be purchased
    pub fn get_active(&self, id: &str) -> Option<&Product> {
        self.get(id).filter(|p| p.active)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Load catalog from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}
