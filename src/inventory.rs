//! Inventory service: the raw-input boundary over the item store.
//!
//! Both the billing engine and the front end call through this seam. Its
//! only added value over [`ItemStore`] is translating external text tokens
//! into validated typed arguments before delegating; every failure carries
//! the offending value in its message.

use crate::error::{InventoryError, Result};
use crate::record::Item;
use crate::store::{ItemPatch, ItemStore};
use rust_decimal::Decimal;

/// Parses an item code token: a positive integer.
pub(crate) fn parse_code(token: &str) -> Result<u32> {
    let token = token.trim();
    match token.parse::<u32>() {
        Ok(code) if code > 0 => Ok(code),
        _ => Err(InventoryError::Validation(format!(
            "item code must be a positive integer, got '{}'",
            token
        ))),
    }
}

/// Parses a price token: a non-negative decimal.
pub(crate) fn parse_price(token: &str) -> Result<Decimal> {
    let token = token.trim();
    let price: Decimal = token.parse().map_err(|_| {
        InventoryError::Validation(format!("price must be a number, got '{}'", token))
    })?;
    if price < Decimal::ZERO {
        return Err(InventoryError::Validation(format!(
            "price cannot be negative: {}",
            token
        )));
    }
    Ok(price)
}

/// Parses a quantity token: an integer with at least `min`.
pub(crate) fn parse_quantity(token: &str, min: u32) -> Result<u32> {
    let token = token.trim();
    // Parse through i64 so a negative quantity reports "negative" rather
    // than a generic integer failure.
    let quantity: i64 = token.parse().map_err(|_| {
        InventoryError::Validation(format!("quantity must be an integer, got '{}'", token))
    })?;
    if quantity < i64::from(min) {
        let what = if min > 0 { "positive" } else { "non-negative" };
        return Err(InventoryError::Validation(format!(
            "quantity must be a {} integer, got '{}'",
            what, token
        )));
    }
    u32::try_from(quantity).map_err(|_| {
        InventoryError::Validation(format!("quantity out of range: '{}'", token))
    })
}

/// Thin orchestration over [`ItemStore`] taking raw text arguments.
#[derive(Debug, Clone)]
pub struct InventoryService {
    store: ItemStore,
}

impl InventoryService {
    pub fn new(store: ItemStore) -> Self {
        InventoryService { store }
    }

    /// The underlying repository, for typed callers.
    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn add_item(&self, code: &str, name: &str, price: &str, quantity: &str) -> Result<Item> {
        let code = parse_code(code)?;
        let price = parse_price(price)?;
        let quantity = parse_quantity(quantity, 0)?;
        self.store.add(code, name, price, quantity)
    }

    pub fn remove_item(&self, code: &str) -> Result<Item> {
        self.store.remove(parse_code(code)?)
    }

    pub fn update_item(
        &self,
        code: &str,
        name: Option<&str>,
        price: Option<&str>,
        quantity: Option<&str>,
    ) -> Result<Item> {
        let code = parse_code(code)?;
        let patch = ItemPatch {
            name: name.map(str::to_string),
            price: price.map(parse_price).transpose()?,
            quantity: quantity.map(|q| parse_quantity(q, 0)).transpose()?,
        };
        self.store.update(code, patch)
    }

    pub fn find_item(&self, code: &str) -> Result<Option<Item>> {
        self.store.find_by_code(parse_code(code)?)
    }

    pub fn search_by_price_range(&self, low: &str, high: &str) -> Result<Vec<Item>> {
        self.store
            .search_by_price_range(parse_price(low)?, parse_price(high)?)
    }

    pub fn list_all_items(&self) -> Result<Vec<Item>> {
        self.store.list_all()
    }
}
