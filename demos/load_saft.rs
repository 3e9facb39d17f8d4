//! Load a SAF-T file (`.xml` or `.zip`) and print what was found.
//!
//! ```text
//! RUST_LOG=info cargo run --example load_saft -- SAF-T_2024.zip
//! ```

use saft_ledger::parser::Loader;
use saft_ledger::*;

fn main() {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: load_saft <file.xml|file.zip>");
        std::process::exit(2);
    };

    let loader = Loader::new(LoadConfig::default());
    let ledger = match loader.parse(&path) {
        Ok(ledger) => ledger,
        Err(e) => {
            eprintln!("cannot read {path}: {e}");
            std::process::exit(1);
        }
    };

    println!("=== {path} ===");
    println!("  namespace:    {}", ledger.namespace.as_deref().unwrap_or("(none)"));
    if let Some(h) = ledger.header() {
        println!("  company:      {}", h.company_name.as_deref().unwrap_or("-"));
        println!(
            "  period:       {} .. {}",
            h.selection_start.map(|d| d.to_string()).unwrap_or_default(),
            h.selection_end.map(|d| d.to_string()).unwrap_or_default()
        );
    }
    println!("  accounts:     {}", ledger.accounts.len());
    println!("  customers:    {}", ledger.customers.len());
    println!("  suppliers:    {}", ledger.suppliers.len());
    println!("  journals:     {}", ledger.journals.len());
    println!("  vouchers:     {}", ledger.vouchers.len());
    println!("  lines:        {}", ledger.lines.len());
    println!("  invoices:     {}", ledger.invoices.len());
    println!(
        "  numeric failures: {} of {}",
        ledger.stats.numeric_failures, ledger.stats.numeric_fields
    );

    let config = loader.config().clone();
    match validate(ledger, &config) {
        Ok(validated) => {
            println!("\n=== Balanced ===\n  {}", validated.balance());
            let refs = validated.references();
            if !refs.missing_accounts.is_empty() {
                println!("  missing accounts: {}", refs.missing_accounts.join(", "));
            }
            for v in &refs.unbalanced_vouchers {
                println!("  unbalanced voucher {v}");
            }
        }
        Err(e) => {
            println!("\n=== Rejected ===\n  {e}");
            std::process::exit(1);
        }
    }
}
