// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashSet;

use anyhow::Result;

use crate::models::BudgetScope;
use crate::sync::Session;
use crate::utils::pretty_table;

pub fn handle(session: &Session) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Records violating their own invariants
    for t in session.store().transactions() {
        if t.validate().is_err() {
            rows.push(vec!["invalid_transaction".into(), t.id.to_string()]);
        }
    }
    for b in session.store().budgets() {
        let mismatch = match b.scope {
            BudgetScope::Monthly => b.month.is_none(),
            BudgetScope::Category => b.category.is_none(),
        };
        if mismatch {
            rows.push(vec!["budget_scope_mismatch".into(), b.id.to_string()]);
        }
    }

    // 2) Duplicate ids within a collection
    let mut seen = HashSet::new();
    for t in session.store().transactions() {
        if !seen.insert(t.id.clone()) {
            rows.push(vec!["duplicate_transaction_id".into(), t.id.to_string()]);
        }
    }
    let mut seen = HashSet::new();
    for b in session.store().budgets() {
        if !seen.insert(b.id.clone()) {
            rows.push(vec!["duplicate_budget_id".into(), b.id.to_string()]);
        }
    }

    // 3) Identity settings half-present
    let identity = session.mirror().sync_identity()?;
    if identity.is_none() && session.identity().user().is_some() {
        rows.push(vec![
            "identity_not_persisted".into(),
            session.identity().user().unwrap_or_default().to_string(),
        ]);
    }

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
