use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::Config;
use crate::db::Database;
use crate::ledger::{export, DateRange, ExportOutcome, TransactionView};
use crate::models::{parse_date, Category, NewTransaction, TxnType};
use crate::ui::util::{format_amount, truncate};

pub(crate) fn as_cli(args: &[String], config: &Config, db: &mut Database) -> Result<()> {
    match args[1].as_str() {
        "list" | "ls" => cli_list(&args[2..], db),
        "export" => cli_export(&args[2..], config, db),
        "add" => cli_add(&args[2..], db),
        "delete" | "rm" => cli_delete(&args[2..], db),
        "categories" => cli_categories(db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("ledgertui {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("LedgerTUI - local transaction ledger");
    println!();
    println!("Usage: ledgertui [command]");
    println!();
    println!("Commands:");
    println!("  (none)                                 Launch interactive TUI");
    println!("  list                                   Print one page of transactions");
    println!("    --from <date> --to <date>            Only dates in the range (both required)");
    println!("    --page <n>                           Page to print (default: 1)");
    println!("  export [dir]                           Write the list to transactions_<today>.csv");
    println!("    --from <date> --to <date>            Only dates in the range");
    println!("  add <date> <type> <category> <amount> <name...>");
    println!("                                         Add a transaction (category '-' for none)");
    println!("  delete <id>                            Delete a transaction");
    println!("  categories                             List categories");
    println!("  --help, -h                             Show this help");
    println!("  --version, -V                          Show version");
    println!();
    println!("Dates are dd/mm/yyyy or yyyy-mm-dd.");
}

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

fn range_from_flags(args: &[String]) -> Result<DateRange> {
    let start = flag(args, "--from").map(parse_date).transpose()?;
    let end = flag(args, "--to").map(parse_date).transpose()?;
    Ok(DateRange::new(start, end))
}

fn load_view(args: &[String], db: &Database) -> Result<TransactionView> {
    let mut view = TransactionView::new();
    view.load(db.get_all_transactions()?);
    view.set_range(range_from_flags(args)?);
    Ok(view)
}

fn cli_list(args: &[String], db: &mut Database) -> Result<()> {
    let mut view = load_view(args, db)?;

    let page: usize = flag(args, "--page")
        .map(|p| p.parse().with_context(|| format!("Invalid page: {p}")))
        .transpose()?
        .unwrap_or(1);
    while view.page() < page && view.next_page() {}

    if view.filtered().is_empty() {
        println!("No transactions found for selected range.");
        return Ok(());
    }

    println!(
        "{:<5} {:<30} {:<8} {:<18} {:<11} {:>14}",
        "ID", "Name", "Type", "Category", "Date", "Amount"
    );
    println!("{}", "─".repeat(91));
    for txn in view.page_rows() {
        println!(
            "{:<5} {:<30} {:<8} {:<18} {:<11} {:>14}",
            txn.id,
            truncate(&txn.name, 30),
            txn.kind,
            truncate(&txn.category, 18),
            txn.short_date(),
            format_amount(txn.amount),
        );
    }
    println!();
    println!(
        "Page {} of {} ({} shown, {} stored)",
        view.page(),
        view.page_count(),
        view.filtered().len(),
        db.get_transaction_count()?
    );
    Ok(())
}

fn cli_export(args: &[String], config: &Config, db: &mut Database) -> Result<()> {
    let view = load_view(args, db)?;

    // Output directory is the first argument when it is not a flag
    let dir = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| PathBuf::from(shellexpand(a)))
        .unwrap_or_else(|| config.export_dir.clone());

    let today = chrono::Utc::now().date_naive();
    match export::export(view.filtered(), &dir, today)? {
        ExportOutcome::Empty => println!("No transactions to export"),
        ExportOutcome::Written { path, count } => {
            println!("Exported {count} transactions to {}", path.display());
        }
    }
    Ok(())
}

fn cli_add(args: &[String], db: &mut Database) -> Result<()> {
    if args.len() < 5 {
        anyhow::bail!("Usage: ledgertui add <date> <type> <category> <amount> <name...>");
    }

    let date = parse_date(&args[0])?;
    let kind = TxnType::parse(&args[1])?;
    let category = if args[2] == "-" {
        String::new()
    } else {
        let categories = db.get_categories()?;
        Category::find_by_name(&categories, &args[2])
            .map(|c| c.name.clone())
            .ok_or_else(|| anyhow::anyhow!("Category '{}' not found", args[2]))?
    };
    let amount = Decimal::from_str(&args[3])
        .with_context(|| format!("Invalid amount: {}", args[3]))?;
    let name = args[4..].join(" ");

    let id = db.insert_transaction(&NewTransaction {
        name,
        kind,
        category,
        date,
        amount,
    })?;
    println!("Added transaction {id}");
    Ok(())
}

fn cli_delete(args: &[String], db: &mut Database) -> Result<()> {
    let Some(raw) = args.first() else {
        anyhow::bail!("Usage: ledgertui delete <id>");
    };
    let id: i64 = raw.parse().with_context(|| format!("Invalid id: {raw}"))?;

    if db.get_transaction(id)?.is_none() {
        anyhow::bail!("Transaction {id} not found");
    }
    db.delete_transaction(id)?;
    println!("Transaction deleted successfully");
    Ok(())
}

fn cli_categories(db: &mut Database) -> Result<()> {
    let categories = db.get_categories()?;
    if categories.is_empty() {
        println!("No categories");
        return Ok(());
    }
    for category in &categories {
        println!("  {category}");
    }
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
