//! Library-level edge case tests driving the stores and billing engine
//! directly against scratch files.

use rust_decimal::Decimal;
use std::fs;
use std::str::FromStr;
use stockbill::{
    BillingEngine, CustomerStore, InventoryError, InventoryService, ItemStore, CUSTOMERS_FILE,
    ITEMS_FILE,
};
use tempfile::TempDir;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn inventory(dir: &TempDir) -> InventoryService {
    InventoryService::new(ItemStore::new(dir.path().join(ITEMS_FILE)))
}

fn billing(dir: &TempDir) -> BillingEngine {
    BillingEngine::new(
        inventory(dir),
        CustomerStore::new(dir.path().join(CUSTOMERS_FILE)),
        dir.path(),
    )
}

// ==================== CODEC EDGE CASES ====================

#[test]
fn test_round_trip_preserves_well_formed_store() {
    let dir = TempDir::new().unwrap();
    let raw = "101#Pen#1.5#100\n102#Blue Book#12.00#5\n103#Clip#0.05#1000\n";
    fs::write(dir.path().join(ITEMS_FILE), raw).unwrap();

    let store = ItemStore::new(dir.path().join(ITEMS_FILE));
    let items = store.load().unwrap();
    store.save(&items).unwrap();

    assert_eq!(fs::read_to_string(dir.path().join(ITEMS_FILE)).unwrap(), raw);
}

#[test]
fn test_legacy_line_rewrites_to_canonical_four_fields() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(ITEMS_FILE), "7#Stapler#3.25\n").unwrap();

    let store = ItemStore::new(dir.path().join(ITEMS_FILE));
    let items = store.load().unwrap();
    store.save(&items).unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join(ITEMS_FILE)).unwrap(),
        "7#Stapler#3.25#0\n"
    );
}

#[test]
fn test_mutating_operation_fails_on_malformed_store() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(ITEMS_FILE), "garbage line\n").unwrap();
    let svc = inventory(&dir);

    let err = svc.add_item("101", "Pen", "1.5", "100").unwrap_err();
    assert!(matches!(err, InventoryError::RecordFormat { .. }));
    // The store is left as it was, not clobbered.
    assert_eq!(
        fs::read_to_string(dir.path().join(ITEMS_FILE)).unwrap(),
        "garbage line\n"
    );
}

// ==================== SEARCH EDGE CASES ====================

#[test]
fn test_search_concrete_scenario_returns_only_pen() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(ITEMS_FILE),
        "101#Pen#1.5#100\n102#Book#12.0#5\n",
    )
    .unwrap();

    let found = inventory(&dir).search_by_price_range("1", "2").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Pen");
}

#[test]
fn test_search_exact_boundary_price() {
    let dir = TempDir::new().unwrap();
    let svc = inventory(&dir);
    svc.add_item("1", "Exact", "2.0", "1").unwrap();

    assert_eq!(svc.search_by_price_range("2.0", "2.0").unwrap().len(), 1);
    assert_eq!(svc.search_by_price_range("2.01", "3").unwrap().len(), 0);
}

#[test]
fn test_search_on_empty_range_or_store() {
    let dir = TempDir::new().unwrap();
    let svc = inventory(&dir);
    assert!(svc.search_by_price_range("0", "100").unwrap().is_empty());

    svc.add_item("1", "Pen", "5.0", "1").unwrap();
    // Inverted range matches nothing.
    assert!(svc.search_by_price_range("10", "1").unwrap().is_empty());
}

// ==================== BILLING EDGE CASES ====================

#[test]
fn test_hundred_stock_sell_ten_at_one_fifty() {
    let dir = TempDir::new().unwrap();
    let svc = inventory(&dir);
    svc.add_item("1", "Widget", "1.50", "100").unwrap();

    let mut session = billing(&dir).start("Ana", false).unwrap();
    session.submit_line("1", "10").unwrap();
    let bill = session.finish().unwrap();

    assert_eq!(bill.total, dec("15.00"));
    assert_eq!(bill.lines.len(), 1);
    assert_eq!(bill.lines[0].subtotal, dec("15.00"));
    assert_eq!(svc.find_item("1").unwrap().unwrap().quantity, 90);
}

#[test]
fn test_bill_total_is_sum_of_subtotals() {
    let dir = TempDir::new().unwrap();
    let svc = inventory(&dir);
    svc.add_item("101", "Pen", "1.5", "100").unwrap();
    svc.add_item("102", "Book", "12.0", "5").unwrap();

    let mut session = billing(&dir).start("Ana", false).unwrap();
    session.submit_line("101", "3").unwrap();
    session.submit_line("102", "2").unwrap();
    session.submit_line("101", "1").unwrap();
    let bill = session.finish().unwrap();

    let sum: Decimal = bill.lines.iter().map(|line| line.subtotal).sum();
    assert_eq!(bill.total, sum);
    assert_eq!(bill.total, dec("30.0"));
    for line in &bill.lines {
        assert_eq!(line.subtotal, line.unit_price * Decimal::from(line.quantity));
    }
}

#[test]
fn test_same_item_billed_twice_drains_working_copy() {
    let dir = TempDir::new().unwrap();
    let svc = inventory(&dir);
    svc.add_item("1", "Pen", "1.0", "10").unwrap();

    let mut session = billing(&dir).start("Ana", false).unwrap();
    session.submit_line("1", "6").unwrap();

    // The second request sees the decremented working copy, not the store.
    let err = session.submit_line("1", "6").unwrap_err();
    assert!(matches!(
        err,
        InventoryError::Stock {
            requested: 6,
            available: 4,
            ..
        }
    ));

    session.submit_line("1", "4").unwrap();
    let bill = session.finish().unwrap();
    assert_eq!(bill.total, dec("10.0"));
    assert_eq!(svc.find_item("1").unwrap().unwrap().quantity, 0);
}

#[test]
fn test_selling_exact_stock_reaches_zero_never_negative() {
    let dir = TempDir::new().unwrap();
    let svc = inventory(&dir);
    svc.add_item("1", "Pen", "1.0", "5").unwrap();

    let mut session = billing(&dir).start("Ana", false).unwrap();
    session.submit_line("1", "5").unwrap();
    assert!(session.submit_line("1", "1").is_err());
    session.finish().unwrap();

    assert_eq!(svc.find_item("1").unwrap().unwrap().quantity, 0);
}

#[test]
fn test_empty_bill_commits_header_and_zero_total() {
    let dir = TempDir::new().unwrap();
    let svc = inventory(&dir);
    svc.add_item("1", "Pen", "1.0", "5").unwrap();

    let session = billing(&dir).start("Ana", false).unwrap();
    let ledger_path = session.ledger_path().to_path_buf();
    let bill = session.finish().unwrap();

    assert_eq!(bill.total, Decimal::ZERO);
    let ledger = fs::read_to_string(ledger_path).unwrap();
    assert!(ledger.contains("--- Bill for Ana ---"));
    assert!(ledger.ends_with("Total: $0.00\n"));
    // Commit still rewrites the store, stock unchanged.
    assert_eq!(svc.find_item("1").unwrap().unwrap().quantity, 5);
}

// ==================== CUSTOMER EDGE CASES ====================

#[test]
fn test_register_then_remove_with_padding_and_case() {
    let dir = TempDir::new().unwrap();
    let store = CustomerStore::new(dir.path().join(CUSTOMERS_FILE));

    store.register("Ana ", chrono::Local::now()).unwrap();
    assert_eq!(store.remove("ana").unwrap(), 1);
    assert!(store.list_all().unwrap().is_empty());
}

#[test]
fn test_remove_deletes_every_matching_registration() {
    let dir = TempDir::new().unwrap();
    let store = CustomerStore::new(dir.path().join(CUSTOMERS_FILE));

    let now = chrono::Local::now();
    store.register("Ana", now).unwrap();
    store.register("Bruno", now).unwrap();
    store.register(" ANA ", now).unwrap();
    store.register("ana", now).unwrap();

    assert_eq!(store.remove("Ana").unwrap(), 3);
    let remaining = store.list_all().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "Bruno");
}

#[test]
fn test_customer_timestamp_not_validated_on_read() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(CUSTOMERS_FILE),
        "Ana ---- reg on: whenever she showed up\n",
    )
    .unwrap();

    let store = CustomerStore::new(dir.path().join(CUSTOMERS_FILE));
    let customers = store.list_all().unwrap();
    assert_eq!(customers[0].registered_at, "whenever she showed up");
}
