//! # Stockbill
//!
//! A single-user inventory and billing core backed by flat record files.
//!
//! ## Design Principles
//!
//! - **Flat-file stores**: items persist as `#`-delimited lines, customers
//!   as `Name ---- reg on: <timestamp>` lines; every mutating operation is a
//!   full load → mutate → save cycle
//! - **Strict records**: one documented legacy fallback (a 3-field item line
//!   reads with quantity 0); anything else malformed is a format error
//! - **Fixed-point money**: prices and totals use `rust_decimal`
//! - **Resumable billing**: a bill is collected through explicit
//!   [`BillingEngine::start`] / [`BillingSession::submit_line`] /
//!   [`BillingSession::finish`] calls, never blocking prompts in the core
//!
//! ## Example
//!
//! ```no_run
//! use stockbill::{BillingEngine, CustomerStore, InventoryService, ItemStore};
//!
//! let inventory = InventoryService::new(ItemStore::new("DATA.txt"));
//! inventory.add_item("101", "Pen", "1.5", "100")?;
//!
//! let customers = CustomerStore::new("customerData.txt");
//! let engine = BillingEngine::new(inventory, customers, ".");
//! let mut session = engine.start("Ana", true)?;
//! session.submit_line("101", "3")?;
//! let bill = session.finish()?;
//! println!("total: ${:.2}", bill.total);
//! # Ok::<(), stockbill::InventoryError>(())
//! ```

pub mod billing;
pub mod error;
pub mod inventory;
pub mod record;
pub mod store;

pub use billing::{Bill, BillLine, BillingEngine, BillingSession};
pub use error::{InventoryError, Result};
pub use inventory::InventoryService;
pub use record::{Customer, Item, CUSTOMER_SEPARATOR, TIMESTAMP_FORMAT};
pub use store::{CustomerStore, ItemPatch, ItemStore, CUSTOMERS_FILE, ITEMS_FILE};
