//! Error types for the inventory and billing core.

use thiserror::Error;

/// Result type alias for store and billing operations
pub type Result<T> = std::result::Result<T, InventoryError>;

/// Errors that can occur during store or billing operations.
///
/// Validation, lookup, stock, and no-change failures are recoverable at the
/// operation boundary: the caller surfaces the message and retries the
/// current step. `Io` and `RecordFormat` are fatal for the operation that
/// raised them and are never retried.
#[derive(Error, Debug)]
pub enum InventoryError {
    /// Failed to read or write a backing store or ledger file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or out-of-range input
    #[error("invalid input: {0}")]
    Validation(String),

    /// Attempt to add an item under a code already in the store
    #[error("item code {0} already exists")]
    DuplicateCode(u32),

    /// No item with the given code in the store or working copy
    #[error("item with code {0} not found in stock")]
    ItemNotFound(u32),

    /// No registered customer matched the given name
    #[error("customer '{0}' not found")]
    CustomerNotFound(String),

    /// Requested quantity exceeds the available stock
    #[error("not enough stock for {name}: requested {requested}, available {available}")]
    Stock {
        name: String,
        requested: u32,
        available: u32,
    },

    /// Update with no fields supplied
    #[error("no changes supplied for item {0}")]
    NoChange(u32),

    /// Unparsable persisted record line
    #[error("malformed record at line {line}: {message}")]
    RecordFormat { line: u64, message: String },

    /// Missing or invalid command line arguments
    #[error("{0}")]
    Usage(String),
}
