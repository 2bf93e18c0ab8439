//! # Cart Types
//!
//! The client-owned cart and the read-only snapshots it hands to checkout.
//!
//! `CartStore` is an ordinary value: whoever owns it (a browser session, a
//! test) passes it around explicitly. Checkout only ever sees a
//! `Vec<CartItem>` copy taken with [`CartStore::snapshot`].

use crate::product::Currency;
use serde::{Deserialize, Serialize};

/// A selected item, priced in major currency units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product identifier
    pub id: String,

    pub quantity: u32,

    /// Unit price in major units (e.g. dollars)
    pub unit_price: f64,

    pub display_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CartItem {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        unit_price: f64,
        quantity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            quantity,
            unit_price,
            display_name: display_name.into(),
            description: None,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Line total in minor units, `None` if the price is unusable.
    /// Saturates at `i64::MAX`.
    pub fn total_minor(&self, currency: Currency) -> Option<i64> {
        currency
            .to_minor_units(self.unit_price)
            .map(|unit| unit.saturating_mul(i64::from(self.quantity)))
    }
}

/// Aggregate cart figures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    /// Sum of quantities across entries
    pub total_quantity: u32,
    /// Sum of line totals in minor units
    pub total_amount: i64,
}

/// Client-side cart state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartStore {
    items: Vec<CartItem>,
    #[serde(default)]
    currency: Currency,
}

impl CartStore {
    pub fn new(currency: Currency) -> Self {
        Self {
            items: Vec::new(),
            currency,
        }
    }

    /// Add an item. Adding an id already in the cart increases its quantity
    /// and keeps the existing position, name and price.
    pub fn add_item(&mut self, item: CartItem) {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            }
            None => self.items.push(item),
        }
    }

    /// Remove an entry entirely. Returns the removed item, if present.
    pub fn remove_item(&mut self, id: &str) -> Option<CartItem> {
        let position = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(position))
    }

    /// Set an entry's quantity; zero removes it. Returns false if absent.
    pub fn set_quantity(&mut self, id: &str, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove_item(id).is_some();
        }
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn totals(&self) -> CartTotals {
        self.items.iter().fold(CartTotals::default(), |acc, item| CartTotals {
            total_quantity: acc.total_quantity.saturating_add(item.quantity),
            total_amount: acc
                .total_amount
                .saturating_add(item.total_minor(self.currency).unwrap_or(0)),
        })
    }

    /// Owned copy of the current entries, in insertion order
    pub fn snapshot(&self) -> Vec<CartItem> {
        self.items.clone()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
