// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::report::{
    filter_transactions, monthly_series, recent_months, spend_by_category, totals, TxFilter,
};
use crate::sync::Session;
use crate::utils::{fmt_money, maybe_print_json, month_of, parse_month, pretty_table};

pub fn handle(session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(session, sub)?,
        Some(("cashflow", sub)) => cashflow(session, sub)?,
        Some(("spend-by-category", sub)) => by_category(session, sub)?,
        _ => {}
    }
    Ok(())
}

fn summary(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let filter = TxFilter {
        month: match sub.get_one::<String>("month") {
            Some(m) => Some(parse_month(m)?),
            None => None,
        },
        category: sub.get_one::<String>("category").map(|s| s.to_string()),
        query: sub.get_one::<String>("search").map(|s| s.to_string()),
    };
    let rows = filter_transactions(session.store().transactions(), &filter);
    let t = totals(&rows);
    if maybe_print_json(json_flag, jsonl_flag, &t)? {
        return Ok(());
    }
    let ccy = session.base_currency();
    let data = vec![
        vec!["Income".to_string(), fmt_money(&t.income, ccy)],
        vec!["Expense".to_string(), fmt_money(&t.expense, ccy)],
        vec!["Balance".to_string(), fmt_money(&t.balance, ccy)],
        vec!["Savings Rate".to_string(), format!("{}%", t.savings_rate)],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], data));
    Ok(())
}

fn cashflow(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let anchor = match sub.get_one::<String>("month") {
        Some(m) => parse_month(m)?,
        None => month_of(chrono::Utc::now().date_naive()),
    };
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&6);
    let buckets = recent_months(&anchor, months)?;
    let series = monthly_series(session.store().transactions(), &buckets);
    if maybe_print_json(json_flag, jsonl_flag, &series)? {
        return Ok(());
    }
    let data: Vec<Vec<String>> = series
        .iter()
        .map(|f| {
            vec![
                f.month.clone(),
                format!("{:.2}", f.income),
                format!("{:.2}", f.expense),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Month", "Income", "Expense"], data));
    Ok(())
}

fn by_category(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let filter = TxFilter {
        month: match sub.get_one::<String>("month") {
            Some(m) => Some(parse_month(m)?),
            None => None,
        },
        ..Default::default()
    };
    let rows = filter_transactions(session.store().transactions(), &filter);
    let items = spend_by_category(&rows);
    if maybe_print_json(json_flag, jsonl_flag, &items)? {
        return Ok(());
    }
    let data: Vec<Vec<String>> = items
        .into_iter()
        .map(|(cat, amt)| vec![cat, format!("{:.2}", amt)])
        .collect();
    println!("{}", pretty_table(&["Category", "Spent"], data));
    Ok(())
}
