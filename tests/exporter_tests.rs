// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use budgetclip::export::{default_export_name, write_csv};
use budgetclip::mirror::Mirror;
use budgetclip::models::{RecordId, Transaction, TxKind};
use budgetclip::notify::MemoryNotifier;
use budgetclip::sync::Session;
use budgetclip::{cli, commands::exporter};
use chrono::{NaiveDate, Utc};
use tempfile::tempdir;

fn tx_with_id(id: RecordId, category: &str, amount: &str, date: &str, note: Option<&str>) -> Transaction {
    let now = Utc::now();
    Transaction {
        id,
        kind: TxKind::Expense,
        category: category.to_string(),
        amount: amount.parse().unwrap(),
        currency: "INR".to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        note: note.map(|n| n.to_string()),
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn csv_matches_fixed_format() {
    let rows = vec![
        tx_with_id(
            RecordId::Remote("a".to_string()),
            "Food",
            "12.5",
            "2024-01-05",
            Some(r#"lunch "out""#),
        ),
        tx_with_id(
            RecordId::Remote("b".to_string()),
            "Rent",
            "800",
            "2024-01-01",
            None,
        ),
    ];

    let mut out = Vec::new();
    write_csv(&mut out, &rows).unwrap();
    let text = String::from_utf8(out).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "id,type,category,amount,currency,date,note");
    assert_eq!(lines[1], r#"a,expense,Food,12.5,INR,2024-01-05,"lunch ""out""""#);
    assert_eq!(lines[2], r#"b,expense,Rent,800,INR,2024-01-01,"""#);
}

#[test]
fn export_file_name_carries_the_export_date() {
    let date = NaiveDate::parse_from_str("2024-01-05", "%Y-%m-%d").unwrap();
    assert_eq!(default_export_name(date), "budget_export_2024-01-05.csv");
}

#[test]
fn export_command_writes_collection_order() {
    let mirror = Mirror::open_in_memory().unwrap();
    let mut session = Session::new(mirror, Box::new(MemoryNotifier::new())).unwrap();
    session
        .add_transaction(
            Transaction::new(
                TxKind::Expense,
                "Food",
                "10".parse().unwrap(),
                "INR",
                NaiveDate::parse_from_str("2024-01-05", "%Y-%m-%d").unwrap(),
                Some("weekly run".to_string()),
            )
            .unwrap(),
        )
        .unwrap();
    session
        .add_transaction(
            Transaction::new(
                TxKind::Income,
                "Salary",
                "5000".parse().unwrap(),
                "INR",
                NaiveDate::parse_from_str("2024-01-31", "%Y-%m-%d").unwrap(),
                None,
            )
            .unwrap(),
        )
        .unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "budgetclip",
        "export",
        "transactions",
        "--out",
        &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&session, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    // Collection order is date descending, so the salary row comes first.
    assert!(lines[1].contains("Salary"));
    assert!(lines[2].contains("Food"));
}
