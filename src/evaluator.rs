// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::alerts::AlertCenter;
use crate::models::{Budget, BudgetScope, Transaction, TxKind};
use crate::notify::{Notifier, Severity};
use crate::utils::fmt_money;

#[derive(Debug, Clone, Serialize)]
pub struct BudgetStatus {
    pub budget: Budget,
    pub spent: Decimal,
    pub exceeded: bool,
    pub near_limit: bool,
}

/// Pure evaluation of spend against every budget. Exceeding is `spent >=
/// limit`; near-limit is 90% of the limit and not exceeded.
pub fn evaluate(transactions: &[Transaction], budgets: &[Budget]) -> Vec<BudgetStatus> {
    budgets
        .iter()
        .map(|b| {
            let spent = spent_against(transactions, b);
            let exceeded = spent >= b.limit;
            let near_limit = !exceeded && spent >= b.limit * Decimal::new(9, 1);
            BudgetStatus {
                budget: b.clone(),
                spent,
                exceeded,
                near_limit,
            }
        })
        .collect()
}

/// Expense total matching the budget's scope: same month for monthly
/// budgets, same category (any month) for category budgets. Income never
/// counts.
pub fn spent_against(transactions: &[Transaction], budget: &Budget) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.kind == TxKind::Expense)
        .filter(|t| match budget.scope {
            BudgetScope::Monthly => budget.month.as_deref() == Some(t.month().as_str()),
            BudgetScope::Category => budget.category.as_deref() == Some(t.category.as_str()),
        })
        .map(|t| t.amount)
        .sum()
}

/// Stable composite identifying an exceeded condition for alert
/// de-duplication.
pub fn alert_key(budget: &Budget) -> String {
    match budget.scope {
        BudgetScope::Monthly => format!(
            "monthly:{}:limit:{}",
            budget.month.as_deref().unwrap_or("unknown"),
            budget.limit
        ),
        BudgetScope::Category => format!(
            "category:{}:limit:{}",
            budget.category.as_deref().unwrap_or("unknown"),
            budget.limit
        ),
    }
}

/// Surface alerts for a set of statuses: exceeded budgets raise a persistent
/// keyed alert, near-limit budgets a transient toast on every run.
pub fn raise_alerts(
    statuses: &[BudgetStatus],
    currency: &str,
    alerts: &mut AlertCenter,
    notifier: &mut dyn Notifier,
) {
    for status in statuses {
        let b = &status.budget;
        let spent = fmt_money(&status.spent, currency);
        let limit = fmt_money(&b.limit, currency);
        if status.exceeded {
            let message = match b.scope {
                BudgetScope::Monthly => format!(
                    "Monthly budget exceeded for {}: spent {} (limit {})",
                    b.month.as_deref().unwrap_or("unknown"),
                    spent,
                    limit
                ),
                BudgetScope::Category => format!(
                    "Budget exceeded for category '{}': spent {} (limit {})",
                    b.category.as_deref().unwrap_or("unknown"),
                    spent,
                    limit
                ),
            };
            alerts.trigger(&alert_key(b), &message, notifier);
        } else if status.near_limit {
            let message = match b.scope {
                BudgetScope::Monthly => {
                    format!("Monthly spend near budget ({} / {})", spent, limit)
                }
                BudgetScope::Category => format!(
                    "{} nearing budget ({} / {})",
                    b.category.as_deref().unwrap_or("unknown"),
                    spent,
                    limit
                ),
            };
            notifier.toast(&message, Severity::Info);
        }
    }
}
