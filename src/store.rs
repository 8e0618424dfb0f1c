//! File-backed item and customer repositories.
//!
//! Each mutating operation runs a full load → mutate → save cycle against
//! its backing file; the whole record list is the unit of persistence and
//! every save is a full overwrite. A missing backing file loads as an empty
//! store. There is no cross-process locking: the tool is single-user and
//! single-threaded by scope.

use crate::error::{InventoryError, Result};
use crate::record::{self, Customer, Item};
use chrono::{DateTime, Local};
use log::{debug, warn};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Conventional item store file name.
pub const ITEMS_FILE: &str = "DATA.txt";

/// Conventional customer store file name.
pub const CUSTOMERS_FILE: &str = "customerData.txt";

/// Optional fields for [`ItemStore::update`].
///
/// `None` keeps the current value; an all-`None` patch is a
/// [`NoChange`](InventoryError::NoChange) error.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<u32>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.quantity.is_none()
    }
}

/// Repository over the `#`-delimited item store file.
#[derive(Debug, Clone)]
pub struct ItemStore {
    path: PathBuf,
}

impl ItemStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ItemStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the full item list, failing on the first malformed line.
    pub fn load(&self) -> Result<Vec<Item>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        record::parse_items(file)?.into_iter().collect()
    }

    /// Loads the item list, skipping malformed lines with a warning.
    fn load_lenient(&self) -> Result<Vec<Item>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut items = Vec::new();
        for parsed in record::parse_items(file)? {
            match parsed {
                Ok(item) => items.push(item),
                Err(e) => warn!("{}: skipping {}", self.path.display(), e),
            }
        }
        Ok(items)
    }

    /// Overwrites the backing file with the given items.
    pub fn save(&self, items: &[Item]) -> Result<()> {
        let file = BufWriter::new(File::create(&self.path)?);
        record::render_items(items, file)?;
        debug!("saved {} items to {}", items.len(), self.path.display());
        Ok(())
    }

    /// Adds a new item and persists the store.
    pub fn add(&self, code: u32, name: &str, price: Decimal, quantity: u32) -> Result<Item> {
        let name = validate_name(name)?;
        validate_code(code)?;
        validate_price(price)?;

        let mut items = self.load()?;
        if items.iter().any(|item| item.code == code) {
            return Err(InventoryError::DuplicateCode(code));
        }

        let item = Item {
            code,
            name,
            price,
            quantity,
        };
        items.push(item.clone());
        self.save(&items)?;
        debug!("added item {} ('{}')", item.code, item.name);
        Ok(item)
    }

    /// Removes the item with the given code, returning the removed record.
    pub fn remove(&self, code: u32) -> Result<Item> {
        let mut items = self.load()?;
        let index = items
            .iter()
            .position(|item| item.code == code)
            .ok_or(InventoryError::ItemNotFound(code))?;
        let removed = items.remove(index);
        self.save(&items)?;
        debug!("removed item {} ('{}')", removed.code, removed.name);
        Ok(removed)
    }

    /// Applies the supplied fields of `patch` to the item with the given
    /// code and persists the merged record.
    pub fn update(&self, code: u32, patch: ItemPatch) -> Result<Item> {
        let mut items = self.load()?;
        let item = items
            .iter_mut()
            .find(|item| item.code == code)
            .ok_or(InventoryError::ItemNotFound(code))?;

        if patch.is_empty() {
            return Err(InventoryError::NoChange(code));
        }
        if let Some(name) = patch.name {
            item.name = validate_name(&name)?;
        }
        if let Some(price) = patch.price {
            validate_price(price)?;
            item.price = price;
        }
        if let Some(quantity) = patch.quantity {
            item.quantity = quantity;
        }

        let updated = item.clone();
        self.save(&items)?;
        debug!("updated item {} ('{}')", updated.code, updated.name);
        Ok(updated)
    }

    pub fn find_by_code(&self, code: u32) -> Result<Option<Item>> {
        Ok(self.load()?.into_iter().find(|item| item.code == code))
    }

    /// Returns items with `low <= price <= high`, inclusive both ends, in
    /// file order. Malformed stored lines are skipped, not errored.
    pub fn search_by_price_range(&self, low: Decimal, high: Decimal) -> Result<Vec<Item>> {
        Ok(self
            .load_lenient()?
            .into_iter()
            .filter(|item| low <= item.price && item.price <= high)
            .collect())
    }

    /// Returns all items in file order.
    pub fn list_all(&self) -> Result<Vec<Item>> {
        self.load()
    }
}

/// Repository over the customer store file.
#[derive(Debug, Clone)]
pub struct CustomerStore {
    path: PathBuf,
}

impl CustomerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CustomerStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<Customer>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        record::parse_customers(file)
    }

    pub fn save(&self, customers: &[Customer]) -> Result<()> {
        let file = BufWriter::new(File::create(&self.path)?);
        record::render_customers(customers, file)?;
        debug!(
            "saved {} customers to {}",
            customers.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Appends a registration stamped with the given time. No duplicate check.
    pub fn register(&self, name: &str, at: DateTime<Local>) -> Result<Customer> {
        let mut customers = self.load()?;
        let customer = Customer::register(name, at);
        customers.push(customer.clone());
        self.save(&customers)?;
        debug!("registered customer '{}'", customer.name);
        Ok(customer)
    }

    /// Removes every customer whose name matches `name` case-insensitively
    /// after trimming, returning how many were removed.
    pub fn remove(&self, name: &str) -> Result<usize> {
        let customers = self.load()?;
        let before = customers.len();
        let kept: Vec<Customer> = customers
            .into_iter()
            .filter(|customer| !customer.name_matches(name))
            .collect();
        let removed = before - kept.len();
        if removed == 0 {
            return Err(InventoryError::CustomerNotFound(name.trim().to_string()));
        }
        self.save(&kept)?;
        debug!("removed {} registration(s) for '{}'", removed, name.trim());
        Ok(removed)
    }

    pub fn list_all(&self) -> Result<Vec<Customer>> {
        self.load()
    }
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(InventoryError::Validation(
            "item name cannot be empty".to_string(),
        ));
    }
    // Names must survive the #-delimited line format.
    if name.contains('#') || name.contains('\n') {
        return Err(InventoryError::Validation(format!(
            "item name '{}' must not contain '#' or line breaks",
            name
        )));
    }
    Ok(name.to_string())
}

fn validate_code(code: u32) -> Result<()> {
    if code == 0 {
        return Err(InventoryError::Validation(
            "item code must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

fn validate_price(price: Decimal) -> Result<()> {
    if price < Decimal::ZERO {
        return Err(InventoryError::Validation(format!(
            "price cannot be negative: {}",
            price
        )));
    }
    Ok(())
}
