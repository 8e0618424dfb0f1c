//! Record models and the flat-file codec.
//!
//! Items persist as `#`-delimited lines (`code#name#price#quantity`);
//! customers persist as free-text lines (`Name ---- reg on: <timestamp>`).
//! Parsing is strict: any line that is not the canonical 4-field format or
//! the legacy 3-field format (no quantity column, defaulted to 0) is a
//! [`RecordFormat`](crate::InventoryError::RecordFormat) error rather than
//! being silently coerced. Rendering always writes the canonical format.

use crate::error::{InventoryError, Result};
use chrono::{DateTime, Local};
use csv::{QuoteStyle, ReaderBuilder, StringRecord, WriterBuilder};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::{BufRead, BufReader, Read, Write};

/// Timestamp format written to customer records and ledger headers.
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y, %H:%M:%S";

/// Separator between the name and registration timestamp in customer lines.
pub const CUSTOMER_SEPARATOR: &str = "---- reg on:";

/// One stock-keeping entry.
///
/// Prices use [`Decimal`] and keep the scale they were written with, so a
/// stored `1.5` renders back as `1.5` and `12.00` as `12.00`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    /// Positive integer code, unique across the store
    pub code: u32,

    /// Non-empty display name
    pub name: String,

    /// Unit price, never negative after a committed operation
    pub price: Decimal,

    /// Current stock on hand
    pub quantity: u32,
}

/// One customer registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub name: String,

    /// Registration timestamp text. Validated on write only; read back as-is.
    pub registered_at: String,
}

impl Customer {
    /// Creates a registration record stamped with the given time.
    pub fn register(name: &str, at: DateTime<Local>) -> Self {
        Customer {
            name: name.trim().to_string(),
            registered_at: at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Parses one persisted customer line.
    ///
    /// A line without the separator yields the whole line as the name and an
    /// empty timestamp; the timestamp text itself is never validated on read.
    pub fn parse_line(line: &str) -> Self {
        match line.split_once(CUSTOMER_SEPARATOR) {
            Some((name, rest)) => Customer {
                name: name.trim().to_string(),
                registered_at: rest.trim().to_string(),
            },
            None => Customer {
                name: line.trim().to_string(),
                registered_at: String::new(),
            },
        }
    }

    /// Returns `true` if this record's name matches `name` after trimming
    /// and case folding. Removal uses this, never exact equality.
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }
}

/// Parses the item store, yielding one outcome per non-blank line.
///
/// Callers choose strictness: collecting propagates the first malformed
/// line, while lenient consumers (price-range search) skip `Err` entries.
pub fn parse_items<R: Read>(reader: R) -> Result<Vec<Result<Item>>> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(b'#')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut out = Vec::new();
    let mut record = StringRecord::new();
    loop {
        let line = csv_reader.position().line();
        match csv_reader.read_record(&mut record) {
            Ok(true) => {
                // A whitespace-only line reads as one blank field; treat it
                // like the empty lines the reader already skips.
                if record.len() == 1 && record[0].trim().is_empty() {
                    continue;
                }
                out.push(parse_item_record(&record, line));
            }
            Ok(false) => break,
            Err(e) => {
                return Err(InventoryError::RecordFormat {
                    line,
                    message: e.to_string(),
                })
            }
        }
    }
    Ok(out)
}

/// Parses one `#`-delimited record into an [`Item`].
fn parse_item_record(record: &StringRecord, line: u64) -> Result<Item> {
    let malformed = |message: String| InventoryError::RecordFormat { line, message };

    let quantity_field = match record.len() {
        4 => Some(&record[3]),
        // Legacy format without the quantity column.
        3 => None,
        n => {
            return Err(malformed(format!("expected 3 or 4 fields, found {}", n)));
        }
    };

    let code: u32 = record[0]
        .trim()
        .parse()
        .map_err(|_| malformed(format!("invalid item code '{}'", &record[0])))?;
    let price: Decimal = record[2]
        .trim()
        .parse()
        .map_err(|_| malformed(format!("invalid price '{}'", &record[2])))?;
    let quantity: u32 = match quantity_field {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| malformed(format!("invalid quantity '{}'", raw)))?,
        None => 0,
    };

    Ok(Item {
        code,
        name: record[1].to_string(),
        price,
        quantity,
    })
}

/// Renders items in the canonical 4-field format, one line per record.
pub fn render_items<W: Write>(items: &[Item], writer: W) -> Result<()> {
    let mut csv_writer = WriterBuilder::new()
        .delimiter(b'#')
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .from_writer(writer);

    for item in items {
        csv_writer
            .write_record([
                item.code.to_string(),
                item.name.clone(),
                item.price.to_string(),
                item.quantity.to_string(),
            ])
            .map_err(csv_write_error)?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn csv_write_error(e: csv::Error) -> InventoryError {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => InventoryError::Io(io),
        other => InventoryError::RecordFormat {
            line: 0,
            message: format!("{:?}", other),
        },
    }
}

/// Parses the customer store. Blank lines are skipped.
pub fn parse_customers<R: Read>(reader: R) -> Result<Vec<Customer>> {
    let mut out = Vec::new();
    for line in BufReader::new(reader).lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            out.push(Customer::parse_line(trimmed));
        }
    }
    Ok(out)
}

/// Renders customers in the canonical line format.
///
/// A record with no timestamp (read from a line without the separator)
/// renders as the bare name so it round-trips unchanged.
pub fn render_customers<W: Write>(customers: &[Customer], mut writer: W) -> Result<()> {
    for customer in customers {
        if customer.registered_at.is_empty() {
            writeln!(writer, "{}", customer.name)?;
        } else {
            writeln!(
                writer,
                "{} {} {}",
                customer.name, CUSTOMER_SEPARATOR, customer.registered_at
            )?;
        }
    }
    Ok(())
}
