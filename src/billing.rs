//! Billing transaction engine.
//!
//! A bill is collected through a resumable session rather than blocking
//! prompts: the caller drives `Start → CollectingLines → Finalizing →
//! Committed` with explicit [`BillingEngine::start`],
//! [`BillingSession::submit_line`], and [`BillingSession::finish`] calls, so
//! the same engine serves a CLI, a GUI, or a request/response service.
//!
//! Stock decrements during the session apply only to an in-memory working
//! copy; the backing item store is rewritten once, at commit. Ledger lines,
//! by contrast, are appended to the per-customer bill file as they are
//! accepted, so a session dropped before [`finish`](BillingSession::finish)
//! leaves those lines in the ledger while the store stays untouched.

use crate::error::{InventoryError, Result};
use crate::inventory::{parse_code, parse_quantity, InventoryService};
use crate::record::{Item, TIMESTAMP_FORMAT};
use crate::store::CustomerStore;
use chrono::Local;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One accepted line of a bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BillLine {
    pub code: u32,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub subtotal: Decimal,
}

impl fmt::Display for BillLine {
    /// Renders the line exactly as written to the ledger.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - ${} x {} = ${:.2}",
            self.name, self.code, self.unit_price, self.quantity, self.subtotal
        )
    }
}

/// The finalized (or in-progress) bill for one customer session.
///
/// Ephemeral: never persisted as a structured record, only rendered
/// line-by-line into the ledger.
#[derive(Debug, Clone, Serialize)]
pub struct Bill {
    pub customer_name: String,
    pub created_at: String,
    pub lines: Vec<BillLine>,
    pub total: Decimal,
}

/// Entry point for billing transactions.
#[derive(Debug, Clone)]
pub struct BillingEngine {
    inventory: InventoryService,
    customers: CustomerStore,
    ledger_dir: PathBuf,
}

impl BillingEngine {
    pub fn new(
        inventory: InventoryService,
        customers: CustomerStore,
        ledger_dir: impl Into<PathBuf>,
    ) -> Self {
        BillingEngine {
            inventory,
            customers,
            ledger_dir: ledger_dir.into(),
        }
    }

    /// Opens a billing session for the named customer.
    ///
    /// Optionally registers the customer with the current timestamp, opens
    /// the append-mode ledger (creating it if absent), writes the bill
    /// header, and snapshots the full item list as the session's working
    /// copy.
    pub fn start(&self, customer_name: &str, register: bool) -> Result<BillingSession> {
        let customer_name = customer_name.trim();
        if customer_name.is_empty() {
            return Err(InventoryError::Validation(
                "customer name cannot be empty".to_string(),
            ));
        }

        let now = Local::now();
        if register {
            self.customers.register(customer_name, now)?;
        }

        let created_at = now.format(TIMESTAMP_FORMAT).to_string();
        let ledger_path = self
            .ledger_dir
            .join(format!("BILL-{}.txt", customer_name.replace(' ', "_")));
        let mut ledger = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&ledger_path)?;
        writeln!(ledger, "--- Bill for {} ---", customer_name)?;
        writeln!(ledger, "Date: {}", created_at)?;
        writeln!(ledger)?;

        let working = self.inventory.store().load()?;
        debug!(
            "billing session for '{}' opened with {} items in stock",
            customer_name,
            working.len()
        );

        Ok(BillingSession {
            inventory: self.inventory.clone(),
            ledger,
            ledger_path,
            working,
            bill: Bill {
                customer_name: customer_name.to_string(),
                created_at,
                lines: Vec::new(),
                total: Decimal::ZERO,
            },
        })
    }
}

/// An open billing transaction in its line-collecting state.
///
/// Recoverable failures from [`submit_line`](Self::submit_line) (bad tokens,
/// unknown codes, insufficient stock) leave the session usable; the caller
/// re-prompts for the current line. Dropping the session aborts it: the
/// backing item store is never written, though ledger lines already accepted
/// are not retracted.
#[derive(Debug)]
pub struct BillingSession {
    inventory: InventoryService,
    ledger: std::fs::File,
    ledger_path: PathBuf,
    working: Vec<Item>,
    bill: Bill,
}

impl BillingSession {
    /// Looks up an item in the working copy, e.g. to show the available
    /// stock when prompting for a quantity.
    pub fn lookup(&self, code_token: &str) -> Result<&Item> {
        let code = parse_code(code_token)?;
        self.working
            .iter()
            .find(|item| item.code == code)
            .ok_or(InventoryError::ItemNotFound(code))
    }

    /// Collects one bill line.
    ///
    /// On success the line has been appended to the ledger, the working
    /// copy decremented, and the running total updated.
    pub fn submit_line(&mut self, code_token: &str, quantity_token: &str) -> Result<&BillLine> {
        let code = parse_code(code_token)?;
        let index = self
            .working
            .iter()
            .position(|item| item.code == code)
            .ok_or(InventoryError::ItemNotFound(code))?;
        let quantity = parse_quantity(quantity_token, 1)?;

        let item = &self.working[index];
        if quantity > item.quantity {
            return Err(InventoryError::Stock {
                name: item.name.clone(),
                requested: quantity,
                available: item.quantity,
            });
        }

        let line = BillLine {
            code: item.code,
            name: item.name.clone(),
            unit_price: item.price,
            quantity,
            subtotal: item.price * Decimal::from(quantity),
        };

        // Ledger first: a write failure must not leave the working copy
        // decremented for a line the ledger never saw.
        writeln!(self.ledger, "{}", line)?;

        self.working[index].quantity -= quantity;
        self.bill.total += line.subtotal;
        self.bill.lines.push(line);
        debug!(
            "billed {} x {} to '{}'",
            quantity, code, self.bill.customer_name
        );
        // Safety: a line was pushed immediately above
        Ok(self.bill.lines.last().expect("line just pushed"))
    }

    /// The bill collected so far.
    pub fn bill(&self) -> &Bill {
        &self.bill
    }

    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }

    /// Finalizes the transaction: writes the trailing total to the ledger,
    /// closes it, and persists the entire working copy back to the item
    /// store (a full overwrite, not just the items sold).
    pub fn finish(mut self) -> Result<Bill> {
        writeln!(self.ledger, "Total: ${:.2}", self.bill.total)?;
        self.ledger.flush()?;

        self.inventory.store().save(&self.working)?;
        debug!(
            "committed bill for '{}': {} line(s), total {:.2}",
            self.bill.customer_name,
            self.bill.lines.len(),
            self.bill.total
        );
        // Move the bill out field by field; the session has a Drop impl.
        Ok(Bill {
            customer_name: std::mem::take(&mut self.bill.customer_name),
            created_at: std::mem::take(&mut self.bill.created_at),
            lines: std::mem::take(&mut self.bill.lines),
            total: self.bill.total,
        })
    }
}

impl Drop for BillingSession {
    fn drop(&mut self) {
        // finish() moves the bill out by swapping in an empty Vec, so a
        // non-empty line list here means the session was abandoned.
        if !self.bill.lines.is_empty() {
            warn!(
                "billing session for '{}' dropped with {} uncommitted line(s); \
                 ledger {} retains them but stock was not persisted",
                self.bill.customer_name,
                self.bill.lines.len(),
                self.ledger_path.display()
            );
        }
    }
}
