// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};

use crate::models::{Budget, BudgetScope, RecordId};
use crate::sync::Session;
use crate::utils::{fmt_money, maybe_print_json, parse_limit, parse_month_arg, pretty_table};

pub fn handle(session: &mut Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(session, sub)?,
        Some(("edit", sub)) => edit(session, sub)?,
        Some(("rm", sub)) => rm(session, sub)?,
        Some(("clear", _)) => clear(session)?,
        Some(("list", sub)) => list(session, sub)?,
        Some(("report", sub)) => report(session, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(session: &mut Session, sub: &clap::ArgMatches) -> Result<()> {
    let scope = BudgetScope::parse(sub.get_one::<String>("scope").unwrap())?;
    let month = match sub.get_one::<String>("month") {
        Some(m) => Some(parse_month_arg(m)?),
        None => None,
    };
    let category = sub.get_one::<String>("category").map(|s| s.to_string());
    let limit = parse_limit(sub.get_one::<String>("limit").unwrap())?;

    let budget = Budget::new(scope, month, category, limit)?;
    let target = budget_target(&budget);
    let limit = budget.limit;
    session.add_budget(budget)?;
    session.check_budgets()?;
    println!(
        "Budget set for {} = {}",
        target,
        fmt_money(&limit, session.base_currency())
    );
    Ok(())
}

fn edit(session: &mut Session, sub: &clap::ArgMatches) -> Result<()> {
    let id = RecordId::parse(sub.get_one::<String>("id").unwrap());
    let Some(before) = session.store().budget(&id).cloned() else {
        bail!("Budget '{}' not found", id);
    };
    let month = match sub.get_one::<String>("month") {
        Some(m) => Some(parse_month_arg(m)?),
        None => None,
    };
    let category = sub.get_one::<String>("category").map(|s| s.to_string());
    let limit = parse_limit(sub.get_one::<String>("limit").unwrap())?;

    let after = before.with_updates(month, category, limit)?;
    session.update_budget(before, after)?;
    session.check_budgets()?;
    println!("Budget updated");
    Ok(())
}

fn rm(session: &mut Session, sub: &clap::ArgMatches) -> Result<()> {
    let id = RecordId::parse(sub.get_one::<String>("id").unwrap());
    if session.delete_budget(&id)? {
        println!("Budget removed");
    } else {
        println!("Budget '{}' not found", id);
    }
    Ok(())
}

fn clear(session: &mut Session) -> Result<()> {
    session.clear_budgets()?;
    println!("All budgets cleared");
    Ok(())
}

fn budget_target(b: &Budget) -> String {
    match b.scope {
        BudgetScope::Monthly => format!("month {}", b.month.as_deref().unwrap_or("unknown")),
        BudgetScope::Category => {
            format!("category '{}'", b.category.as_deref().unwrap_or("unknown"))
        }
    }
}

fn list(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let budgets = session.store().budgets();
    if maybe_print_json(json_flag, jsonl_flag, &budgets)? {
        return Ok(());
    }
    if budgets.is_empty() {
        println!("No budgets yet");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = budgets
        .iter()
        .map(|b| {
            vec![
                b.id.to_string(),
                b.scope.to_string(),
                b.month
                    .clone()
                    .or_else(|| b.category.clone())
                    .unwrap_or_default(),
                fmt_money(&b.limit, session.base_currency()),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Scope", "Target", "Limit"], rows)
    );
    Ok(())
}

fn report(session: &mut Session, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let statuses = session.check_budgets()?;
    if maybe_print_json(json_flag, jsonl_flag, &statuses)? {
        return Ok(());
    }
    if statuses.is_empty() {
        println!("No budgets yet");
        return Ok(());
    }
    let ccy = session.base_currency().to_string();
    let rows: Vec<Vec<String>> = statuses
        .iter()
        .map(|s| {
            let state = if s.exceeded {
                "EXCEEDED"
            } else if s.near_limit {
                "NEAR"
            } else {
                "OK"
            };
            vec![
                s.budget.scope.to_string(),
                s.budget
                    .month
                    .clone()
                    .or_else(|| s.budget.category.clone())
                    .unwrap_or_default(),
                fmt_money(&s.budget.limit, &ccy),
                fmt_money(&s.spent, &ccy),
                state.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Scope", "Target", "Limit", "Spent", "State"], rows)
    );
    Ok(())
}
