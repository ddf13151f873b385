// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::RefCell;
use std::rc::Rc;

use budgetclip::mirror::Mirror;
use budgetclip::models::{Budget, BudgetScope, RecordId, Transaction, TxKind};
use budgetclip::notify::{MemoryNotifier, Severity};
use budgetclip::remote::{Collection, MemoryRemote};
use budgetclip::sync::Session;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tempfile::tempdir;

fn setup() -> (Session, MemoryNotifier) {
    let notifier = MemoryNotifier::new();
    let mirror = Mirror::open_in_memory().unwrap();
    let session = Session::new(mirror, Box::new(notifier.clone())).unwrap();
    (session, notifier)
}

fn shared_remote() -> Rc<RefCell<MemoryRemote>> {
    Rc::new(RefCell::new(MemoryRemote::new()))
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
fn first_snapshot_replaces_mirror_derived_state() {
    let (mut session, _) = setup();
    session
        .add_transaction(expense("Food", "12.50", "2024-01-05"))
        .unwrap();
    assert_eq!(session.store().transactions().len(), 1);

    let remote = shared_remote();
    let seeded = expense("Rent", "800", "2024-02-01");
    remote.borrow_mut().seed(
        Collection::Transactions,
        "r-1",
        seeded.remote_payload().unwrap(),
    );

    session.sign_in("u1", Box::new(remote.clone())).unwrap();

    // Remote is authoritative once signed in; the mirror-derived row is gone.
    let txs = session.store().transactions();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].id, RecordId::Remote("r-1".to_string()));
    assert_eq!(txs[0].category, "Rent");
}

#[test]
fn add_while_signed_in_confirms_via_snapshot() {
    let (mut session, _) = setup();
    let remote = shared_remote();
    session.sign_in("u1", Box::new(remote.clone())).unwrap();

    session
        .add_transaction(expense("Food", "12.50", "2024-01-05"))
        .unwrap();

    // The store holds the remote-assigned id delivered by the snapshot.
    let txs = session.store().transactions();
    assert_eq!(txs.len(), 1);
    assert!(matches!(txs[0].id, RecordId::Remote(_)));

    // The created document carries no id field in its payload.
    let store = remote.borrow();
    let docs = store.docs(Collection::Transactions);
    assert_eq!(docs.len(), 1);
    assert!(docs[0].1.get("id").is_none());
}

#[test]
fn delete_by_remote_id_routes_to_backend() {
    let (mut session, _) = setup();
    let remote = shared_remote();
    let seeded = expense("Rent", "800", "2024-02-01");
    remote.borrow_mut().seed(
        Collection::Transactions,
        "r-1",
        seeded.remote_payload().unwrap(),
    );
    session.sign_in("u1", Box::new(remote.clone())).unwrap();

    let id = RecordId::Remote("r-1".to_string());
    assert!(session.delete_transaction(&id).unwrap());

    assert!(session.store().transactions().is_empty());
    assert!(remote.borrow().docs(Collection::Transactions).is_empty());
}

#[test]
fn sign_out_rehydrates_from_mirror_shadow() {
    let (mut session, _) = setup();
    let remote = shared_remote();
    session.sign_in("u1", Box::new(remote.clone())).unwrap();
    session
        .add_transaction(expense("Food", "12.50", "2024-01-05"))
        .unwrap();

    session.sign_out().unwrap();

    // The listener persisted the confirmed snapshot into the mirror, so the
    // data survives the switch back to the local strategy.
    let txs = session.store().transactions();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].category, "Food");
}

#[test]
fn failed_remote_write_keeps_store_unchanged_and_shadow_optimistic() {
    let (mut session, notifier) = setup();
    let remote = shared_remote();
    session.sign_in("u1", Box::new(remote.clone())).unwrap();
    remote.borrow_mut().fail_writes = true;

    session
        .add_transaction(expense("Food", "12.50", "2024-01-05"))
        .unwrap();

    // Store only changes on snapshots, and no snapshot confirmed the write.
    assert!(session.store().transactions().is_empty());
    assert!(remote.borrow().docs(Collection::Transactions).is_empty());

    // The shadow copy still reflects the optimistic state.
    let shadow = session.mirror().load_state().unwrap();
    assert_eq!(shadow.transactions.len(), 1);
    assert!(shadow.transactions[0].id.is_local());

    let log = notifier.log();
    assert!(log
        .toasts
        .iter()
        .any(|(m, s)| *s == Severity::Warning && m.contains("Failed to sync")));
}

#[test]
fn second_sign_in_tears_down_previous_subscriptions() {
    let (mut session, _) = setup();
    let first = shared_remote();
    let second = shared_remote();

    session.sign_in("u1", Box::new(first.clone())).unwrap();
    assert_eq!(first.borrow().subscriber_count(), 2);

    session.sign_in("u2", Box::new(second.clone())).unwrap();
    assert_eq!(first.borrow().subscriber_count(), 0);
    assert_eq!(second.borrow().subscriber_count(), 2);
}

#[test]
fn replay_routes_through_currently_active_backend() {
    let (mut session, _) = setup();

    // Recorded while signed out: the entry snapshots a local-minted id.
    session
        .add_transaction(expense("Food", "12.50", "2024-01-05"))
        .unwrap();

    let remote = shared_remote();
    session.sign_in("u1", Box::new(remote.clone())).unwrap();
    assert!(session.store().transactions().is_empty());

    // Undo of the add deletes by the local id, which falls back to the local
    // strategy; the remote store is untouched.
    assert!(session.undo().unwrap());
    assert!(remote.borrow().docs(Collection::Transactions).is_empty());

    // Redo replays the add against the backend active now: a remote create.
    assert!(session.redo().unwrap());
    assert_eq!(remote.borrow().docs(Collection::Transactions).len(), 1);
    let txs = session.store().transactions();
    assert_eq!(txs.len(), 1);
    assert!(matches!(txs[0].id, RecordId::Remote(_)));
}

#[test]
fn clear_budgets_deletes_every_remote_document() {
    let (mut session, _) = setup();
    let remote = shared_remote();
    session.sign_in("u1", Box::new(remote.clone())).unwrap();

    let b1 = Budget::new(
        BudgetScope::Monthly,
        Some("2024-03".to_string()),
        None,
        "100".parse().unwrap(),
    )
    .unwrap();
    let b2 = Budget::new(
        BudgetScope::Category,
        None,
        Some("Food".to_string()),
        "50".parse().unwrap(),
    )
    .unwrap();
    session.add_budget(b1).unwrap();
    session.add_budget(b2).unwrap();
    assert_eq!(session.store().budgets().len(), 2);

    session.clear_budgets().unwrap();
    assert!(remote.borrow().docs(Collection::Budgets).is_empty());
    assert!(session.store().budgets().is_empty());
}

#[test]
fn mirror_change_from_another_session_forces_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mirror.sqlite");

    let notifier = MemoryNotifier::new();
    let mut reader = Session::new(
        Mirror::open(&path).unwrap(),
        Box::new(notifier.clone()),
    )
    .unwrap();
    let mut writer = Session::new(
        Mirror::open(&path).unwrap(),
        Box::new(MemoryNotifier::new()),
    )
    .unwrap();

    assert!(!reader.poll_mirror().unwrap());

    writer
        .add_transaction(expense("Food", "12.50", "2024-01-05"))
        .unwrap();

    assert!(reader.poll_mirror().unwrap());
    assert_eq!(reader.store().transactions().len(), 1);
    assert!(notifier
        .log()
        .toasts
        .iter()
        .any(|(m, _)| m.starts_with("Sync:")));
}
