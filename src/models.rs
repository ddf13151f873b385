// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Identifier for a record in either ownership regime: minted on this client
/// and not yet backed by the remote store, or assigned by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordId {
    Local(String),
    Remote(String),
}

impl RecordId {
    pub fn mint() -> Self {
        RecordId::Local(Uuid::new_v4().to_string())
    }

    pub fn is_local(&self) -> bool {
        matches!(self, RecordId::Local(_))
    }

    /// Parse a user-supplied id string. `local-` marks a client-minted token;
    /// anything else is taken as a remote id.
    pub fn parse(s: &str) -> Self {
        match s.strip_prefix("local-") {
            Some(token) => RecordId::Local(token.to_string()),
            None => RecordId::Remote(s.to_string()),
        }
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Local(token) => write!(f, "local-{}", token),
            RecordId::Remote(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.to_lowercase().as_str() {
            "income" => Ok(TxKind::Income),
            "expense" => Ok(TxKind::Expense),
            other => Err(ValidationError::BadKind(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Income => "income",
            TxKind::Expense => "expense",
        }
    }
}

impl std::fmt::Display for TxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetScope {
    Monthly,
    Category,
}

impl BudgetScope {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.to_lowercase().as_str() {
            "monthly" => Ok(BudgetScope::Monthly),
            "category" => Ok(BudgetScope::Category),
            other => Err(ValidationError::BadScope(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetScope::Monthly => "monthly",
            BudgetScope::Category => "category",
        }
    }
}

impl std::fmt::Display for BudgetScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: RecordId,
    pub kind: TxKind,
    pub category: String,
    pub amount: Decimal,
    pub currency: String,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Build a new transaction with a freshly minted local id. Timestamps are
    /// owned by the core and never user-supplied.
    pub fn new(
        kind: TxKind,
        category: &str,
        amount: Decimal,
        currency: &str,
        date: NaiveDate,
        note: Option<String>,
    ) -> Result<Self, ValidationError> {
        let now = Utc::now();
        let tx = Transaction {
            id: RecordId::mint(),
            kind,
            category: category.trim().to_string(),
            amount,
            currency: currency.to_uppercase(),
            date,
            note,
            created_at: now,
            updated_at: now,
        };
        tx.validate()?;
        Ok(tx)
    }

    /// Edited copy: same id and created_at, fresh updated_at.
    pub fn with_updates(
        &self,
        kind: TxKind,
        category: &str,
        amount: Decimal,
        currency: &str,
        date: NaiveDate,
        note: Option<String>,
    ) -> Result<Self, ValidationError> {
        let tx = Transaction {
            id: self.id.clone(),
            kind,
            category: category.trim().to_string(),
            amount,
            currency: currency.to_uppercase(),
            date,
            note,
            created_at: self.created_at,
            updated_at: Utc::now(),
        };
        tx.validate()?;
        Ok(tx)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount);
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        Ok(())
    }

    /// YYYY-MM bucket of the transaction date.
    pub fn month(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    /// Document payload for the remote store; the id is stripped because the
    /// store either assigns one (create) or takes it from the path (upsert).
    pub fn remote_payload(&self) -> serde_json::Result<serde_json::Value> {
        let mut value = serde_json::to_value(self)?;
        if let serde_json::Value::Object(ref mut map) = value {
            map.remove("id");
        }
        Ok(value)
    }

    pub fn from_remote_doc(id: &str, mut doc: serde_json::Value) -> serde_json::Result<Self> {
        if let serde_json::Value::Object(ref mut map) = doc {
            map.insert("id".to_string(), serde_json::json!({ "remote": id }));
        }
        serde_json::from_value(doc)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: RecordId,
    pub scope: BudgetScope,
    pub month: Option<String>,
    pub category: Option<String>,
    pub limit: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Budget {
    pub fn new(
        scope: BudgetScope,
        month: Option<String>,
        category: Option<String>,
        limit: Decimal,
    ) -> Result<Self, ValidationError> {
        if limit <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveLimit);
        }
        let (month, category) = match scope {
            BudgetScope::Monthly => {
                let month = month.ok_or(ValidationError::MissingMonth)?;
                (Some(month), None)
            }
            BudgetScope::Category => {
                let category = category
                    .filter(|c| !c.trim().is_empty())
                    .ok_or(ValidationError::MissingCategory)?;
                (None, Some(category.trim().to_string()))
            }
        };
        Ok(Budget {
            id: RecordId::mint(),
            scope,
            month,
            category,
            limit,
            created_at: Utc::now(),
        })
    }

    /// Edited copy: same id, scope and created_at.
    pub fn with_updates(
        &self,
        month: Option<String>,
        category: Option<String>,
        limit: Decimal,
    ) -> Result<Self, ValidationError> {
        let mut edited = Budget::new(
            self.scope,
            month.or_else(|| self.month.clone()),
            category.or_else(|| self.category.clone()),
            limit,
        )?;
        edited.id = self.id.clone();
        edited.created_at = self.created_at;
        Ok(edited)
    }

    pub fn remote_payload(&self) -> serde_json::Result<serde_json::Value> {
        let mut value = serde_json::to_value(self)?;
        if let serde_json::Value::Object(ref mut map) = value {
            map.remove("id");
        }
        Ok(value)
    }

    pub fn from_remote_doc(id: &str, mut doc: serde_json::Value) -> serde_json::Result<Self> {
        if let serde_json::Value::Object(ref mut map) = doc {
            map.insert("id".to_string(), serde_json::json!({ "remote": id }));
        }
        serde_json::from_value(doc)
    }
}

/// One reversible user action. Every variant carries complete owned
/// snapshots so replay is independent of later mutation of the live records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionEntry {
    TransactionAdded { tx: Transaction },
    TransactionDeleted { tx: Transaction },
    TransactionEdited { before: Transaction, after: Transaction },
    BudgetAdded { budget: Budget },
    BudgetDeleted { budget: Budget },
    BudgetEdited { before: Budget, after: Budget },
}
