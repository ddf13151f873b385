// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};
use serde::Serialize;

use crate::models::{RecordId, Transaction, TxKind};
use crate::report::{filter_transactions, TxFilter};
use crate::store::is_default_category;
use crate::sync::Session;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table};

pub fn handle(session: &mut Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(session, sub)?,
        Some(("edit", sub)) => edit(session, sub)?,
        Some(("rm", sub)) => rm(session, sub)?,
        Some(("list", sub)) => list(session, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(session: &mut Session, sub: &clap::ArgMatches) -> Result<()> {
    let kind = TxKind::parse(sub.get_one::<String>("type").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let currency = sub
        .get_one::<String>("currency")
        .map(|s| s.to_uppercase())
        .unwrap_or_else(|| session.base_currency().to_string());
    let note = sub.get_one::<String>("note").map(|s| s.to_string());

    let tx = Transaction::new(kind, category, amount, &currency, date, note)?;
    if !is_default_category(&tx.category) {
        session.register_category(&tx.category)?;
    }
    let summary = format!(
        "Recorded {} of {} {} in '{}' on {}",
        tx.kind, tx.currency, tx.amount, tx.category, tx.date
    );
    session.add_transaction(tx)?;
    session.check_budgets()?;
    println!("{}", summary);
    Ok(())
}

fn edit(session: &mut Session, sub: &clap::ArgMatches) -> Result<()> {
    let id = RecordId::parse(sub.get_one::<String>("id").unwrap());
    let Some(before) = session.store().transaction(&id).cloned() else {
        bail!("Transaction '{}' not found", id);
    };

    let kind = match sub.get_one::<String>("type") {
        Some(s) => TxKind::parse(s)?,
        None => before.kind,
    };
    let category = sub
        .get_one::<String>("category")
        .map(|s| s.to_string())
        .unwrap_or_else(|| before.category.clone());
    let amount = match sub.get_one::<String>("amount") {
        Some(s) => parse_decimal(s)?,
        None => before.amount,
    };
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => before.date,
    };
    let currency = sub
        .get_one::<String>("currency")
        .map(|s| s.to_uppercase())
        .unwrap_or_else(|| before.currency.clone());
    let note = sub
        .get_one::<String>("note")
        .map(|s| s.to_string())
        .or_else(|| before.note.clone());

    let after = before.with_updates(kind, &category, amount, &currency, date, note)?;
    if !is_default_category(&after.category) {
        session.register_category(&after.category)?;
    }
    session.update_transaction(before, after)?;
    session.check_budgets()?;
    println!("Transaction updated");
    Ok(())
}

fn rm(session: &mut Session, sub: &clap::ArgMatches) -> Result<()> {
    let id = RecordId::parse(sub.get_one::<String>("id").unwrap());
    if session.delete_transaction(&id)? {
        session.check_budgets()?;
        println!("Transaction deleted");
    } else {
        println!("Transaction '{}' not found", id);
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub kind: String,
    pub category: String,
    pub amount: String,
    pub currency: String,
    pub date: String,
    pub note: String,
}

pub fn query_rows(session: &Session, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let filter = TxFilter {
        month: match sub.get_one::<String>("month") {
            Some(m) => Some(parse_month(m)?),
            None => None,
        },
        category: sub.get_one::<String>("category").map(|s| s.to_string()),
        query: sub.get_one::<String>("search").map(|s| s.to_string()),
    };
    let mut rows = filter_transactions(session.store().transactions(), &filter);
    if let Some(limit) = sub.get_one::<usize>("limit") {
        rows.truncate(*limit);
    }
    Ok(rows
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id.to_string(),
            kind: t.kind.to_string(),
            category: t.category.clone(),
            amount: t.amount.to_string(),
            currency: t.currency.clone(),
            date: t.date.to_string(),
            note: t.note.clone().unwrap_or_default(),
        })
        .collect())
}

fn list(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(session, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                // Notes are truncated for display only, never in storage.
                let note: String = r.note.chars().take(60).collect();
                vec![
                    r.id.clone(),
                    r.kind.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.currency.clone(),
                    r.date.clone(),
                    note,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Type", "Category", "Amount", "CCY", "Date", "Note"],
                rows,
            )
        );
    }
    Ok(())
}
