// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;

use crate::models::{Budget, RecordId, Transaction, TxKind};

pub const DEFAULT_CATEGORIES: [&str; 10] = [
    "Salary",
    "Food",
    "Rent",
    "Transport",
    "Shopping",
    "Entertainment",
    "Utilities",
    "Savings",
    "Health",
    "Other",
];

pub fn is_default_category(name: &str) -> bool {
    DEFAULT_CATEGORIES.contains(&name)
}

/// In-memory authoritative cache for the active session: the two record
/// collections plus the user-registered category set. Everything else in the
/// system reads from here.
#[derive(Debug, Default)]
pub struct RecordStore {
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
    categories: BTreeSet<String>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    pub fn transaction(&self, id: &RecordId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| &t.id == id)
    }

    pub fn budget(&self, id: &RecordId) -> Option<&Budget> {
        self.budgets.iter().find(|b| &b.id == id)
    }

    // Replace-all: contents afterwards equal the given set exactly, no merge.

    pub fn replace_transactions(&mut self, items: Vec<Transaction>) {
        self.transactions = items;
        self.sort_transactions();
    }

    pub fn replace_budgets(&mut self, items: Vec<Budget>) {
        self.budgets = items;
    }

    pub fn replace_categories(&mut self, categories: BTreeSet<String>) {
        self.categories = categories;
    }

    pub fn upsert_transaction(&mut self, tx: Transaction) {
        match self.transactions.iter().position(|t| t.id == tx.id) {
            Some(idx) => self.transactions[idx] = tx,
            None => self.transactions.push(tx),
        }
        self.sort_transactions();
    }

    pub fn remove_transaction(&mut self, id: &RecordId) -> Option<Transaction> {
        let idx = self.transactions.iter().position(|t| &t.id == id)?;
        Some(self.transactions.remove(idx))
    }

    pub fn upsert_budget(&mut self, budget: Budget) {
        match self.budgets.iter().position(|b| b.id == budget.id) {
            Some(idx) => self.budgets[idx] = budget,
            None => self.budgets.push(budget),
        }
    }

    pub fn remove_budget(&mut self, id: &RecordId) -> Option<Budget> {
        let idx = self.budgets.iter().position(|b| &b.id == id)?;
        Some(self.budgets.remove(idx))
    }

    pub fn clear_budgets(&mut self) {
        self.budgets.clear();
    }

    /// Append-only during a session; returns false if already present.
    pub fn register_category(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.categories.insert(name.to_string())
    }

    /// Category choices offered for a transaction type: income picks from a
    /// short fixed list, expenses from the remaining defaults plus any
    /// user-registered categories, with Other always last.
    pub fn category_options(&self, kind: TxKind) -> Vec<String> {
        let mut options: Vec<String> = match kind {
            TxKind::Income => vec!["Salary".to_string()],
            TxKind::Expense => DEFAULT_CATEGORIES
                .iter()
                .filter(|c| **c != "Salary" && **c != "Other")
                .map(|c| c.to_string())
                .collect(),
        };
        if kind == TxKind::Expense {
            for c in &self.categories {
                if !options.iter().any(|o| o == c) {
                    options.push(c.clone());
                }
            }
        }
        options.push("Other".to_string());
        options
    }

    // Keep the remote subscription's ordering locally too: date descending,
    // stable for same-day entries.
    fn sort_transactions(&mut self) {
        self.transactions.sort_by(|a, b| b.date.cmp(&a.date));
    }
}
