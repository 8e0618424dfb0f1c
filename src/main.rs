//! Stockbill CLI
//!
//! Drives the inventory and billing core against the conventional files in
//! the current directory (`DATA.txt`, `customerData.txt`, `BILL-<name>.txt`).
//!
//! # Usage
//!
//! ```bash
//! stockbill add 101 Pen 1.5 100
//! stockbill bill Ana --register < lines.txt
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use std::io::{self, BufRead, Write};
use std::process;
use stockbill::{
    BillingEngine, Customer, CustomerStore, InventoryError, InventoryService, Item, ItemStore,
    Result, CUSTOMERS_FILE, ITEMS_FILE,
};

const USAGE: &str = "\
Usage: stockbill <command> [args...]

Commands:
  add <code> <name> <price> <quantity>       Add a new item
  remove <code>                              Remove an item
  update <code> <name|-> <price|-> <qty|->   Update an item ('-' keeps current)
  find <code>                                Show one item
  search <low> <high>                        Items with low <= price <= high
  list                                       Show all items
  register <name>                            Register a customer
  remove-customer <name>                     Remove all matching registrations
  customers                                  Show all customers
  bill <name> [--register]                   Interactive billing on stdin";

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        return Err(InventoryError::Usage(USAGE.to_string()));
    };

    let inventory = InventoryService::new(ItemStore::new(ITEMS_FILE));
    let customers = CustomerStore::new(CUSTOMERS_FILE);
    let rest = &args[1..];

    match command.as_str() {
        "add" => {
            let [code, name, price, quantity] = expect_args(rest, "add")?;
            let item = inventory.add_item(code, name, price, quantity)?;
            println!("Added item '{}' (code {})", item.name, item.code);
        }
        "remove" => {
            let [code] = expect_args(rest, "remove")?;
            let item = inventory.remove_item(code)?;
            println!("Removed item '{}' (code {})", item.name, item.code);
        }
        "update" => {
            let [code, name, price, quantity] = expect_args(rest, "update")?;
            let item = inventory.update_item(code, keep(name), keep(price), keep(quantity))?;
            println!("Updated item '{}' (code {})", item.name, item.code);
        }
        "find" => {
            let [code] = expect_args(rest, "find")?;
            match inventory.find_item(code)? {
                Some(item) => print_item(&item),
                None => println!("Item with code {} not found.", code.trim()),
            }
        }
        "search" => {
            let [low, high] = expect_args(rest, "search")?;
            let found = inventory.search_by_price_range(low, high)?;
            if found.is_empty() {
                println!("No items found in the specified price range.");
            }
            for item in &found {
                print_item(item);
            }
        }
        "list" => {
            let items = inventory.list_all_items()?;
            if items.is_empty() {
                println!("No items found in inventory.");
            }
            for item in &items {
                print_item(item);
            }
        }
        "register" => {
            let [name] = expect_args(rest, "register")?;
            let customer = customers.register(name, chrono::Local::now())?;
            println!("Registered customer '{}'", customer.name);
        }
        "remove-customer" => {
            let [name] = expect_args(rest, "remove-customer")?;
            let removed = customers.remove(name)?;
            println!("Removed {} registration(s) for '{}'", removed, name.trim());
        }
        "customers" => {
            for customer in &customers.list_all()? {
                print_customer(customer);
            }
        }
        "bill" => run_billing(inventory, customers, rest)?,
        other => {
            return Err(InventoryError::Usage(format!(
                "unknown command '{}'\n\n{}",
                other, USAGE
            )));
        }
    }

    Ok(())
}

/// Interactive billing loop: alternating item-code and quantity lines from
/// stdin; an empty code line (or EOF) finishes the bill. Recoverable errors
/// go to stderr and the loop re-prompts.
fn run_billing(
    inventory: InventoryService,
    customers: CustomerStore,
    args: &[String],
) -> Result<()> {
    let (name, register) = match args {
        [name] => (name, false),
        [name, flag] if flag == "--register" => (name, true),
        _ => {
            return Err(InventoryError::Usage(
                "usage: stockbill bill <name> [--register]".to_string(),
            ));
        }
    };

    let engine = BillingEngine::new(inventory, customers, ".");
    let mut session = engine.start(name, register)?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        prompt("Item code (empty to finish): ")?;
        let Some(code) = lines.next().transpose()? else {
            break;
        };
        let code = code.trim().to_string();
        if code.is_empty() {
            break;
        }

        let (item_name, available) = match session.lookup(&code) {
            Ok(item) => (item.name.clone(), item.quantity),
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        prompt(&format!(
            "Quantity for {} (available {}): ",
            item_name, available
        ))?;
        let Some(quantity) = lines.next().transpose()? else {
            break;
        };

        match session.submit_line(&code, &quantity) {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("{}", e),
        }
    }

    let ledger = session.ledger_path().display().to_string();
    let bill = session.finish()?;
    println!("Total: ${:.2}", bill.total);
    println!("Bill written to {}", ledger);
    Ok(())
}

/// Prompts on stderr so piped stdout stays machine-readable.
fn prompt(text: &str) -> Result<()> {
    eprint!("{}", text);
    io::stderr().flush()?;
    Ok(())
}

fn expect_args<'a, const N: usize>(args: &'a [String], command: &str) -> Result<[&'a str; N]> {
    if args.len() != N {
        return Err(InventoryError::Usage(format!(
            "'{}' takes {} argument(s), got {}\n\n{}",
            command,
            N,
            args.len(),
            USAGE
        )));
    }
    let mut out = [""; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg;
    }
    Ok(out)
}

/// Maps the `-` placeholder to "keep the current value".
fn keep(token: &str) -> Option<&str> {
    if token == "-" {
        None
    } else {
        Some(token)
    }
}

fn print_item(item: &Item) {
    println!(
        "Code: {} | Name: {} | Price: ${} | Qty: {}",
        item.code, item.name, item.price, item.quantity
    );
}

fn print_customer(customer: &Customer) {
    if customer.registered_at.is_empty() {
        println!("{}", customer.name);
    } else {
        println!("{} (registered {})", customer.name, customer.registered_at);
    }
}
