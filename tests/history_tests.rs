// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use budgetclip::mirror::Mirror;
use budgetclip::models::{Transaction, TxKind};
use budgetclip::notify::MemoryNotifier;
use budgetclip::sync::Session;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tempfile::tempdir;

fn setup() -> Session {
    let mirror = Mirror::open_in_memory().unwrap();
    Session::new(mirror, Box::new(MemoryNotifier::new())).unwrap()
}

fn expense(category: &str, amount: &str, date: &str) -> Transaction {
    Transaction::new(
        TxKind::Expense,
        category,
        amount.parse::<Decimal>().unwrap(),
        "INR",
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        None,
    )
    .unwrap()
}

#[test]
fn undo_add_restores_pre_add_state() {
    let mut session = setup();
    session
        .add_transaction(expense("Food", "12.50", "2024-01-05"))
        .unwrap();
    assert_eq!(session.store().transactions().len(), 1);

    assert!(session.undo().unwrap());
    assert!(session.store().transactions().is_empty());
}

#[test]
fn undo_delete_restores_identical_snapshot() {
    let mut session = setup();
    session
        .add_transaction(expense("Rent", "800", "2024-01-01"))
        .unwrap();
    let snapshot = session.store().transactions()[0].clone();
    let id = snapshot.id.clone();

    assert!(session.delete_transaction(&id).unwrap());
    assert!(session.store().transactions().is_empty());

    assert!(session.undo().unwrap());
    assert_eq!(session.store().transactions(), &[snapshot]);
}

#[test]
fn edit_undo_redo_round_trip() {
    let mut session = setup();
    session
        .add_transaction(expense("Food", "10", "2024-01-05"))
        .unwrap();
    let before = session.store().transactions()[0].clone();
    let after = before
        .with_updates(
            TxKind::Expense,
            "Food",
            "25".parse().unwrap(),
            "INR",
            before.date,
            Some("bigger lunch".to_string()),
        )
        .unwrap();

    session
        .update_transaction(before.clone(), after.clone())
        .unwrap();
    assert_eq!(session.store().transactions(), &[after.clone()]);

    assert!(session.undo().unwrap());
    assert_eq!(session.store().transactions(), &[before]);

    assert!(session.redo().unwrap());
    assert_eq!(session.store().transactions(), &[after]);
}

#[test]
fn history_capped_at_fifty_entries() {
    let mut session = setup();
    for i in 0..55u32 {
        session
            .add_transaction(expense("Food", &format!("{}", i + 1), "2024-01-05"))
            .unwrap();
    }
    assert_eq!(session.history().undo_len(), 50);
}

#[test]
fn new_action_clears_redo() {
    let mut session = setup();
    session
        .add_transaction(expense("Food", "10", "2024-01-05"))
        .unwrap();
    session
        .add_transaction(expense("Rent", "500", "2024-01-01"))
        .unwrap();
    assert!(session.undo().unwrap());
    assert_eq!(session.history().redo_len(), 1);

    session
        .add_transaction(expense("Transport", "30", "2024-01-07"))
        .unwrap();
    assert_eq!(session.history().redo_len(), 0);
}

#[test]
fn undo_and_redo_on_empty_stacks_are_noops() {
    let mut session = setup();
    assert!(!session.undo().unwrap());
    assert!(!session.redo().unwrap());
}

#[test]
fn history_survives_across_sessions() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mirror.sqlite");

    {
        let mirror = Mirror::open(&path).unwrap();
        let mut session = Session::new(mirror, Box::new(MemoryNotifier::new())).unwrap();
        session
            .add_transaction(expense("Food", "12.50", "2024-01-05"))
            .unwrap();
    }

    let mirror = Mirror::open(&path).unwrap();
    let mut session = Session::new(mirror, Box::new(MemoryNotifier::new())).unwrap();
    assert_eq!(session.store().transactions().len(), 1);

    assert!(session.undo().unwrap());
    assert!(session.store().transactions().is_empty());
}
