// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::{Transaction, TxKind};

#[derive(Debug, Clone, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
    pub savings_rate: Decimal,
}

pub fn totals(rows: &[&Transaction]) -> Totals {
    let income: Decimal = rows
        .iter()
        .filter(|t| t.kind == TxKind::Income)
        .map(|t| t.amount)
        .sum();
    let expense: Decimal = rows
        .iter()
        .filter(|t| t.kind == TxKind::Expense)
        .map(|t| t.amount)
        .sum();
    let balance = income - expense;
    let savings_rate = if income > Decimal::ZERO {
        (balance / income * Decimal::from(100))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    } else {
        Decimal::ZERO
    };
    Totals {
        income,
        expense,
        balance,
        savings_rate,
    }
}

#[derive(Debug, Default)]
pub struct TxFilter {
    pub month: Option<String>,
    pub category: Option<String>,
    pub query: Option<String>,
}

/// Filter the (already date-descending) collection by month bucket, exact
/// category, and a free-text query over note and amount.
pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    filter: &TxFilter,
) -> Vec<&'a Transaction> {
    let query = filter.query.as_deref().map(|q| q.trim().to_lowercase());
    transactions
        .iter()
        .filter(|t| match &filter.month {
            Some(m) => t.month() == *m,
            None => true,
        })
        .filter(|t| match &filter.category {
            Some(c) => t.category == *c,
            None => true,
        })
        .filter(|t| match &query {
            Some(q) if !q.is_empty() => {
                let in_note = t
                    .note
                    .as_deref()
                    .map(|n| n.to_lowercase().contains(q))
                    .unwrap_or(false);
                in_note || t.amount.to_string().contains(q)
            }
            _ => true,
        })
        .collect()
}

/// Expense totals per category, largest first.
pub fn spend_by_category(rows: &[&Transaction]) -> Vec<(String, Decimal)> {
    let mut agg: HashMap<String, Decimal> = HashMap::new();
    for t in rows {
        if t.kind == TxKind::Expense {
            *agg.entry(t.category.clone()).or_insert(Decimal::ZERO) += t.amount;
        }
    }
    let mut items: Vec<_> = agg.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1));
    items
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthFlow {
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
}

/// Income/expense totals per requested month bucket, in the given order.
pub fn monthly_series(transactions: &[Transaction], months: &[String]) -> Vec<MonthFlow> {
    months
        .iter()
        .map(|m| {
            let mut income = Decimal::ZERO;
            let mut expense = Decimal::ZERO;
            for t in transactions.iter().filter(|t| t.month() == *m) {
                match t.kind {
                    TxKind::Income => income += t.amount,
                    TxKind::Expense => expense += t.amount,
                }
            }
            MonthFlow {
                month: m.clone(),
                income,
                expense,
            }
        })
        .collect()
}

/// The `n` month buckets ending at `anchor` (YYYY-MM), oldest first.
pub fn recent_months(anchor: &str, n: usize) -> Result<Vec<String>> {
    let parts: Vec<&str> = anchor.split('-').collect();
    if parts.len() != 2 {
        return Err(anyhow!("Invalid month '{}'", anchor));
    }
    let y: i32 = parts[0].parse()?;
    let m: u32 = parts[1].parse()?;
    if !(1..=12).contains(&m) {
        return Err(anyhow!("Invalid month number {}", m));
    }
    let mut months = Vec::with_capacity(n);
    for back in (0..n as i32).rev() {
        let total = y * 12 + (m as i32 - 1) - back;
        let yy = total.div_euclid(12);
        let mm = total.rem_euclid(12) + 1;
        months.push(format!("{:04}-{:02}", yy, mm));
    }
    Ok(months)
}
