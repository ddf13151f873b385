// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use budgetclip::mirror::Mirror;
use budgetclip::models::RecordId;
use budgetclip::notify::MemoryNotifier;
use budgetclip::sync::Session;
use budgetclip::{cli, commands::transactions};

fn setup() -> Session {
    let mirror = Mirror::open_in_memory().unwrap();
    Session::new(mirror, Box::new(MemoryNotifier::new())).unwrap()
}

fn run_tx(session: &mut Session, args: &[&str]) {
    let mut argv = vec!["budgetclip", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(session, tx_m).unwrap();
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn add_then_list_round_trip() {
    let mut session = setup();
    run_tx(
        &mut session,
        &[
            "add", "--type", "expense", "--category", "Food", "--amount", "12.5", "--date",
            "2024-01-05", "--note", "lunch",
        ],
    );

    let matches = cli::build_cli().get_matches_from(["budgetclip", "tx", "list"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&session, list_m).unwrap();
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].amount, "12.5");
            assert_eq!(rows[0].category, "Food");
            assert_eq!(rows[0].currency, "INR");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_limit_respected_and_sorted_date_desc() {
    let mut session = setup();
    for i in 1..=3 {
        run_tx(
            &mut session,
            &[
                "add",
                "--type",
                "expense",
                "--category",
                "Food",
                "--amount",
                "10",
                "--date",
                &format!("2025-01-0{}", i),
            ],
        );
    }

    let matches = cli::build_cli().get_matches_from(["budgetclip", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&session, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date, "2025-01-03");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn custom_category_is_registered() {
    let mut session = setup();
    run_tx(
        &mut session,
        &[
            "add", "--type", "expense", "--category", "Gadgets", "--amount", "99", "--date",
            "2024-01-05",
        ],
    );
    assert!(session.store().categories().contains("Gadgets"));
}

#[test]
fn edit_and_remove_via_cli() {
    let mut session = setup();
    run_tx(
        &mut session,
        &[
            "add", "--type", "expense", "--category", "Food", "--amount", "10", "--date",
            "2024-01-05",
        ],
    );
    let id = session.store().transactions()[0].id.to_string();

    run_tx(&mut session, &["edit", &id, "--amount", "25"]);
    assert_eq!(
        session.store().transactions()[0].amount,
        "25".parse().unwrap()
    );

    run_tx(&mut session, &["rm", &id]);
    assert!(session.store().transactions().is_empty());
}

#[test]
fn invalid_amount_is_rejected_before_any_mutation() {
    let mut session = setup();
    let matches = cli::build_cli().get_matches_from([
        "budgetclip",
        "tx",
        "add",
        "--type",
        "expense",
        "--category",
        "Food",
        "--amount",
        "0",
        "--date",
        "2024-01-05",
    ]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        assert!(transactions::handle(&mut session, tx_m).is_err());
    } else {
        panic!("no tx subcommand");
    }
    assert!(session.store().transactions().is_empty());
    assert_eq!(session.history().undo_len(), 0);
}

#[test]
fn record_id_display_round_trips() {
    let local = RecordId::mint();
    assert_eq!(RecordId::parse(&local.to_string()), local);

    let remote = RecordId::Remote("abc123".to_string());
    assert_eq!(RecordId::parse(&remote.to_string()), remote);
}
