// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use budgetclip::mirror::Mirror;
use budgetclip::models::BudgetScope;
use budgetclip::notify::MemoryNotifier;
use budgetclip::sync::Session;
use budgetclip::{cli, commands};

fn setup() -> (Session, MemoryNotifier) {
    let notifier = MemoryNotifier::new();
    let mirror = Mirror::open_in_memory().unwrap();
    let session = Session::new(mirror, Box::new(notifier.clone())).unwrap();
    (session, notifier)
}

fn run(session: &mut Session, args: &[&str]) {
    let matches = cli::build_cli().get_matches_from(args);
    match matches.subcommand() {
        Some(("budget", sub)) => commands::budgets::handle(session, sub).unwrap(),
        Some(("tx", sub)) => commands::transactions::handle(session, sub).unwrap(),
        _ => panic!("unexpected subcommand"),
    }
}

#[test]
fn set_accepts_currency_symbols_in_the_limit() {
    let (mut session, _) = setup();
    run(
        &mut session,
        &[
            "budgetclip", "budget", "set", "--scope", "monthly", "--month", "2025-08",
            "--limit", "₹1,000",
        ],
    );
    let budgets = session.store().budgets();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].scope, BudgetScope::Monthly);
    assert_eq!(budgets[0].month.as_deref(), Some("2025-08"));
    assert_eq!(budgets[0].limit, "1000".parse().unwrap());
}

#[test]
fn monthly_budget_set_from_a_full_date_projects_the_month() {
    let (mut session, _) = setup();
    run(
        &mut session,
        &[
            "budgetclip", "budget", "set", "--scope", "monthly", "--month", "2025-08-15",
            "--limit", "500",
        ],
    );
    assert_eq!(
        session.store().budgets()[0].month.as_deref(),
        Some("2025-08")
    );
}

#[test]
fn exceeding_a_budget_raises_a_persistent_alert_once() {
    let (mut session, notifier) = setup();
    run(
        &mut session,
        &[
            "budgetclip", "budget", "set", "--scope", "monthly", "--month", "2025-08",
            "--limit", "100",
        ],
    );
    run(
        &mut session,
        &[
            "budgetclip", "tx", "add", "--type", "expense", "--category", "Food",
            "--amount", "120", "--date", "2025-08-10",
        ],
    );
    // The add already evaluated budgets; report again must not duplicate.
    run(&mut session, &["budgetclip", "budget", "report"]);

    assert_eq!(notifier.log().alerts.len(), 1);
    let statuses = session.check_budgets().unwrap();
    assert!(statuses[0].exceeded);
}

#[test]
fn category_budget_sums_every_month() {
    let (mut session, _) = setup();
    run(
        &mut session,
        &[
            "budgetclip", "budget", "set", "--scope", "category", "--category", "Food",
            "--limit", "100",
        ],
    );
    run(
        &mut session,
        &[
            "budgetclip", "tx", "add", "--type", "expense", "--category", "Food",
            "--amount", "60", "--date", "2025-01-10",
        ],
    );
    run(
        &mut session,
        &[
            "budgetclip", "tx", "add", "--type", "expense", "--category", "Food",
            "--amount", "60", "--date", "2025-06-10",
        ],
    );

    let statuses = session.check_budgets().unwrap();
    assert_eq!(statuses[0].spent, "120".parse().unwrap());
    assert!(statuses[0].exceeded);
}

#[test]
fn clear_empties_the_collection() {
    let (mut session, _) = setup();
    run(
        &mut session,
        &[
            "budgetclip", "budget", "set", "--scope", "monthly", "--month", "2025-08",
            "--limit", "100",
        ],
    );
    run(
        &mut session,
        &[
            "budgetclip", "budget", "set", "--scope", "category", "--category", "Food",
            "--limit", "50",
        ],
    );
    assert_eq!(session.store().budgets().len(), 2);

    run(&mut session, &["budgetclip", "budget", "clear"]);
    assert!(session.store().budgets().is_empty());
}

#[test]
fn budget_edit_is_undoable() {
    let (mut session, _) = setup();
    run(
        &mut session,
        &[
            "budgetclip", "budget", "set", "--scope", "monthly", "--month", "2025-08",
            "--limit", "100",
        ],
    );
    let before = session.store().budgets()[0].clone();
    let id = before.id.to_string();

    run(
        &mut session,
        &["budgetclip", "budget", "edit", &id, "--limit", "250"],
    );
    assert_eq!(session.store().budgets()[0].limit, "250".parse().unwrap());

    assert!(session.undo().unwrap());
    assert_eq!(session.store().budgets(), &[before]);
}
