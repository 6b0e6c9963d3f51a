#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::export::*;
use crate::models::{Transaction, TxnType};

fn txn(id: i64, name: &str, kind: TxnType, day: u32, amount: Decimal) -> Transaction {
    Transaction {
        id,
        name: name.into(),
        kind,
        category: "Other".into(),
        date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        amount,
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

#[test]
fn test_build_csv_header_and_rows() {
    let records = vec![
        txn(2, "Salary", TxnType::Income, 10, dec!(50)),
        txn(1, "Milk", TxnType::Expense, 5, dec!(100)),
    ];
    let csv = build_csv(&records).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), records.len() + 1);
    assert_eq!(lines[0], "Name,Type,Category,Date,Amount");
    assert_eq!(lines[1], "Salary,income,Other,10/1/2024,50");
    assert_eq!(lines[2], "Milk,expense,Other,5/1/2024,100");
}

#[test]
fn test_build_csv_amount_is_raw_number() {
    let records = vec![
        txn(1, "A", TxnType::Expense, 1, dec!(12.50)),
        txn(2, "B", TxnType::Expense, 2, dec!(0.05)),
    ];
    let csv = build_csv(&records).unwrap();
    let amounts: Vec<&str> = csv
        .lines()
        .skip(1)
        .map(|l| l.rsplit(',').next().unwrap())
        .collect();
    assert_eq!(amounts, vec!["12.5", "0.05"]);
}

#[test]
fn test_build_csv_quotes_embedded_commas() {
    let records = vec![txn(1, "Dinner, drinks", TxnType::Expense, 3, dec!(20))];
    let csv = build_csv(&records).unwrap();
    assert_eq!(
        csv.lines().nth(1).unwrap(),
        "\"Dinner, drinks\",expense,Other,3/1/2024,20"
    );

    let mut rdr = csv::ReaderBuilder::new().from_reader(csv.as_bytes());
    let row = rdr.records().next().unwrap().unwrap();
    assert_eq!(&row[0], "Dinner, drinks");
}

#[test]
fn test_build_csv_empty_is_header_only() {
    let csv = build_csv(&[]).unwrap();
    assert_eq!(csv, "Name,Type,Category,Date,Amount");
}

#[test]
fn test_build_csv_has_no_trailing_newline() {
    let records = vec![
        txn(1, "Milk", TxnType::Expense, 5, dec!(100)),
        txn(2, "Bread", TxnType::Expense, 6, dec!(40)),
    ];
    let csv = build_csv(&records).unwrap();
    assert_eq!(
        csv,
        "Name,Type,Category,Date,Amount\nMilk,expense,Other,5/1/2024,100\nBread,expense,Other,6/1/2024,40"
    );
}

#[test]
fn test_export_file_name_uses_date() {
    assert_eq!(export_file_name(today()), "transactions_2026-10-19.csv");
}

#[test]
fn test_export_empty_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = export(&[], dir.path(), today()).unwrap();
    assert_eq!(outcome, ExportOutcome::Empty);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_export_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let records = vec![
        txn(1, "Milk", TxnType::Expense, 5, dec!(100)),
        txn(2, "Bread", TxnType::Expense, 6, dec!(40)),
        txn(3, "Salary", TxnType::Income, 7, dec!(900)),
    ];
    let outcome = export(&records, dir.path(), today()).unwrap();

    let expected_path = dir.path().join("transactions_2026-10-19.csv");
    assert_eq!(
        outcome,
        ExportOutcome::Written {
            path: expected_path.clone(),
            count: 3
        }
    );
    let contents = std::fs::read_to_string(expected_path).unwrap();
    assert_eq!(contents.lines().count(), 4);
}

#[test]
fn test_export_creates_missing_dir() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("downloads");
    let records = vec![txn(1, "Milk", TxnType::Expense, 5, dec!(1))];
    export(&records, &nested, today()).unwrap();
    assert!(nested.join(export_file_name(today())).exists());
}
