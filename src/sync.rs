// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::alerts::AlertCenter;
use crate::error::RemoteError;
use crate::evaluator::{self, BudgetStatus};
use crate::history::ActionLog;
use crate::mirror::Mirror;
use crate::models::{ActionEntry, Budget, RecordId, Transaction};
use crate::notify::{Notifier, Severity};
use crate::remote::{Collection, HttpRemote, RemoteStore, SubscriptionId};
use crate::store::RecordStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    SignedOut,
    SignedIn { user: String },
}

impl Identity {
    pub fn user(&self) -> Option<&str> {
        match self {
            Identity::SignedOut => None,
            Identity::SignedIn { user } => Some(user),
        }
    }
}

struct Listeners {
    transactions: SubscriptionId,
    budgets: SubscriptionId,
}

/// The session: owns the record store, the local mirror, the optional remote
/// store with its subscription pair, the action log and the alert center.
/// Every mutation routes through here; which strategy a write takes depends
/// only on the identity active at the time of the write.
pub struct Session {
    store: RecordStore,
    mirror: Mirror,
    remote: Option<Box<dyn RemoteStore>>,
    listeners: Option<Listeners>,
    history: ActionLog,
    alerts: AlertCenter,
    notifier: Box<dyn Notifier>,
    identity: Identity,
    base_currency: String,
}

impl Session {
    /// Session over the mirror only; stays signed out until told otherwise.
    pub fn new(mirror: Mirror, notifier: Box<dyn Notifier>) -> Result<Self> {
        let base_currency = mirror.base_currency()?;
        let history = mirror.load_history()?;
        let alerts = AlertCenter::from_keys(mirror.load_alerts()?);
        let mut session = Session {
            store: RecordStore::new(),
            mirror,
            remote: None,
            listeners: None,
            history,
            alerts,
            notifier,
            identity: Identity::SignedOut,
            base_currency,
        };
        session.load_local_state();
        Ok(session)
    }

    /// Session restored from persisted settings: if a sync identity is
    /// recorded, sign in against its HTTP remote. An unreachable remote is
    /// not fatal; the session continues on the mirror.
    pub fn open(mirror: Mirror, notifier: Box<dyn Notifier>) -> Result<Self> {
        let mut session = Self::new(mirror, notifier)?;
        if let Some((user, server)) = session.mirror.sync_identity()? {
            match HttpRemote::new(&server, &user) {
                Ok(remote) => session.sign_in(&user, Box::new(remote))?,
                Err(err) => {
                    tracing::warn!(error = %err, "remote unavailable, staying on local mirror");
                    session
                        .notifier
                        .toast("Remote store unavailable, using local data", Severity::Warning);
                }
            }
        }
        Ok(session)
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn mirror(&self) -> &Mirror {
        &self.mirror
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    pub fn set_base_currency(&mut self, ccy: &str) -> Result<()> {
        self.mirror.set_base_currency(ccy)?;
        self.base_currency = ccy.to_uppercase();
        Ok(())
    }

    pub fn history(&self) -> &ActionLog {
        &self.history
    }

    pub fn active_alerts(&self) -> Vec<String> {
        self.alerts.keys().iter().cloned().collect()
    }

    // ----- identity transitions -----

    /// Sign in and persist the identity. Tears down any previous
    /// subscriptions first, then opens the pair and pumps once so the first
    /// snapshot wholesale-replaces whatever the mirror had hydrated.
    pub fn sign_in(&mut self, user: &str, remote: Box<dyn RemoteStore>) -> Result<()> {
        self.stop_listeners();
        self.identity = Identity::SignedIn {
            user: user.to_string(),
        };
        self.remote = Some(remote);
        self.start_listeners()
    }

    /// Sign in against the HTTP remote and remember user and server for the
    /// next session.
    pub fn sign_in_http(&mut self, user: &str, server: &str) -> Result<()> {
        let remote = HttpRemote::new(server, user)?;
        self.mirror.set_sync_identity(user, server)?;
        self.sign_in(user, Box::new(remote))
    }

    /// Cancel subscriptions, drop the remote, re-hydrate from the mirror.
    pub fn sign_out(&mut self) -> Result<()> {
        self.stop_listeners();
        self.remote = None;
        self.identity = Identity::SignedOut;
        self.mirror.clear_sync_identity()?;
        self.load_local_state();
        Ok(())
    }

    fn start_listeners(&mut self) -> Result<()> {
        // Opening always tears down first; at most one pair is ever live.
        self.stop_listeners();
        if let Some(remote) = self.remote.as_mut() {
            let transactions = remote.subscribe(Collection::Transactions);
            let budgets = remote.subscribe(Collection::Budgets);
            self.listeners = Some(Listeners {
                transactions,
                budgets,
            });
        }
        self.pump()
    }

    fn stop_listeners(&mut self) {
        if let Some(listeners) = self.listeners.take() {
            if let Some(remote) = self.remote.as_mut() {
                remote.unsubscribe(listeners.transactions);
                remote.unsubscribe(listeners.budgets);
            }
        }
    }

    /// Drain pending snapshots from both subscriptions. Each snapshot
    /// replaces its collection wholesale, persists the mirror and signals a
    /// view refresh. Last write wins by arrival order.
    pub fn pump(&mut self) -> Result<()> {
        let Some(listeners) = self.listeners.as_ref() else {
            return Ok(());
        };
        let (tx_sub, bud_sub) = (listeners.transactions, listeners.budgets);
        let Some(remote) = self.remote.as_mut() else {
            return Ok(());
        };
        let tx_snapshot = remote.poll(tx_sub);
        let bud_snapshot = remote.poll(bud_sub);

        match tx_snapshot {
            Ok(Some(docs)) => self.apply_transaction_snapshot(docs)?,
            Ok(None) => {}
            Err(err) => self.report_remote_failure(&err, "transaction subscription"),
        }
        match bud_snapshot {
            Ok(Some(docs)) => self.apply_budget_snapshot(docs)?,
            Ok(None) => {}
            Err(err) => self.report_remote_failure(&err, "budget subscription"),
        }
        Ok(())
    }

    fn apply_transaction_snapshot(&mut self, docs: Vec<(String, Value)>) -> Result<()> {
        let mut items = Vec::with_capacity(docs.len());
        for (id, payload) in docs {
            match Transaction::from_remote_doc(&id, payload) {
                Ok(tx) => items.push(tx),
                Err(err) => {
                    tracing::warn!(id = %id, error = %err, "skipping malformed remote transaction")
                }
            }
        }
        self.store.replace_transactions(items);
        self.persist_local_state()?;
        self.notifier.changed();
        Ok(())
    }

    fn apply_budget_snapshot(&mut self, docs: Vec<(String, Value)>) -> Result<()> {
        let mut items = Vec::with_capacity(docs.len());
        for (id, payload) in docs {
            match Budget::from_remote_doc(&id, payload) {
                Ok(b) => items.push(b),
                Err(err) => tracing::warn!(id = %id, error = %err, "skipping malformed remote budget"),
            }
        }
        self.store.replace_budgets(items);
        self.persist_local_state()?;
        self.notifier.changed();
        Ok(())
    }

    /// When signed out, pick up writes made to the mirror by another process.
    /// Any externally observed change forces a full re-load.
    pub fn poll_mirror(&mut self) -> Result<bool> {
        if self.remote.is_some() {
            return Ok(false);
        }
        if !self.mirror.externally_changed()? {
            return Ok(false);
        }
        self.load_local_state();
        self.notifier
            .toast("Sync: local data updated in another session", Severity::Info);
        Ok(true)
    }

    // ----- recorded user operations -----

    pub fn add_transaction(&mut self, tx: Transaction) -> Result<()> {
        self.history
            .record(ActionEntry::TransactionAdded { tx: tx.clone() });
        self.persist_history()?;
        self.write_transaction(tx)
    }

    pub fn update_transaction(&mut self, before: Transaction, after: Transaction) -> Result<()> {
        self.history.record(ActionEntry::TransactionEdited {
            before,
            after: after.clone(),
        });
        self.persist_history()?;
        self.write_transaction(after)
    }

    pub fn delete_transaction(&mut self, id: &RecordId) -> Result<bool> {
        let Some(tx) = self.store.transaction(id).cloned() else {
            return Ok(false);
        };
        self.history
            .record(ActionEntry::TransactionDeleted { tx: tx.clone() });
        self.persist_history()?;
        self.erase_transaction(&tx.id)?;
        Ok(true)
    }

    pub fn add_budget(&mut self, budget: Budget) -> Result<()> {
        self.history.record(ActionEntry::BudgetAdded {
            budget: budget.clone(),
        });
        self.persist_history()?;
        self.write_budget(budget)
    }

    pub fn update_budget(&mut self, before: Budget, after: Budget) -> Result<()> {
        self.history.record(ActionEntry::BudgetEdited {
            before,
            after: after.clone(),
        });
        self.persist_history()?;
        self.write_budget(after)
    }

    pub fn delete_budget(&mut self, id: &RecordId) -> Result<bool> {
        let Some(budget) = self.store.budget(id).cloned() else {
            return Ok(false);
        };
        self.history.record(ActionEntry::BudgetDeleted {
            budget: budget.clone(),
        });
        self.persist_history()?;
        self.erase_budget(&budget.id)?;
        Ok(true)
    }

    /// Full-collection clear; intentionally not recorded in the action log.
    pub fn clear_budgets(&mut self) -> Result<()> {
        if self.remote.is_some() {
            self.persist_shadow(self.store.transactions(), &[])?;
            let outcome = self.remote_clear(Collection::Budgets);
            if let Err(err) = outcome {
                self.report_remote_failure(&err, "budget clear");
            }
            return self.pump();
        }
        self.store.clear_budgets();
        self.persist_local_state()?;
        self.notifier.changed();
        Ok(())
    }

    pub fn register_category(&mut self, name: &str) -> Result<bool> {
        if !self.store.register_category(name) {
            return Ok(false);
        }
        // The category set is always persisted locally, whichever strategy
        // the record collections use.
        self.persist_local_state()?;
        Ok(true)
    }

    // ----- undo / redo -----

    pub fn undo(&mut self) -> Result<bool> {
        if !self.history.begin_replay() {
            return Ok(false);
        }
        let Some(entry) = self.history.pop_undo() else {
            self.history.end_replay();
            return Ok(false);
        };
        let outcome = self.apply_inverse(&entry);
        self.history.end_replay();
        match outcome {
            Ok(()) => {
                self.history.push_redo(entry);
                self.persist_history()?;
                Ok(true)
            }
            Err(err) => {
                self.history.restore_undo(entry);
                self.persist_history()?;
                Err(err)
            }
        }
    }

    pub fn redo(&mut self) -> Result<bool> {
        if !self.history.begin_replay() {
            return Ok(false);
        }
        let Some(entry) = self.history.pop_redo() else {
            self.history.end_replay();
            return Ok(false);
        };
        let outcome = self.apply_forward(&entry);
        self.history.end_replay();
        match outcome {
            Ok(()) => {
                self.history.restore_undo(entry);
                self.persist_history()?;
                Ok(true)
            }
            Err(err) => {
                self.history.push_redo(entry);
                self.persist_history()?;
                Err(err)
            }
        }
    }

    fn apply_forward(&mut self, entry: &ActionEntry) -> Result<()> {
        match entry {
            ActionEntry::TransactionAdded { tx } => self.write_transaction(tx.clone()),
            ActionEntry::TransactionDeleted { tx } => self.erase_transaction(&tx.id),
            ActionEntry::TransactionEdited { after, .. } => self.write_transaction(after.clone()),
            ActionEntry::BudgetAdded { budget } => self.write_budget(budget.clone()),
            ActionEntry::BudgetDeleted { budget } => self.erase_budget(&budget.id),
            ActionEntry::BudgetEdited { after, .. } => self.write_budget(after.clone()),
        }
    }

    fn apply_inverse(&mut self, entry: &ActionEntry) -> Result<()> {
        match entry {
            ActionEntry::TransactionAdded { tx } => self.erase_transaction(&tx.id),
            ActionEntry::TransactionDeleted { tx } => self.write_transaction(tx.clone()),
            ActionEntry::TransactionEdited { before, .. } => {
                self.write_transaction(before.clone())
            }
            ActionEntry::BudgetAdded { budget } => self.erase_budget(&budget.id),
            ActionEntry::BudgetDeleted { budget } => self.write_budget(budget.clone()),
            ActionEntry::BudgetEdited { before, .. } => self.write_budget(before.clone()),
        }
    }

    // ----- budget evaluation -----

    /// Re-run the evaluator over current state and surface alerts. Exceeded
    /// keys persist across invocations via the mirror.
    pub fn check_budgets(&mut self) -> Result<Vec<BudgetStatus>> {
        let statuses = evaluator::evaluate(self.store.transactions(), self.store.budgets());
        let currency = self.base_currency.clone();
        evaluator::raise_alerts(
            &statuses,
            &currency,
            &mut self.alerts,
            self.notifier.as_mut(),
        );
        self.mirror.save_alerts(self.alerts.keys())?;
        Ok(statuses)
    }

    pub fn dismiss_alert(&mut self, key: &str) -> Result<bool> {
        let removed = self.alerts.dismiss(key);
        if removed {
            self.mirror.save_alerts(self.alerts.keys())?;
        }
        Ok(removed)
    }

    // ----- write/delete routing, shared by user operations and replay -----

    /// Uniform write: local strategy applies to the store and persists; the
    /// remote strategy routes by id ownership (Local -> create with id
    /// stripped, Remote -> upsert-by-id), writing the optimistic shadow
    /// before the remote call. The store itself only changes when a snapshot
    /// replays.
    fn write_transaction(&mut self, tx: Transaction) -> Result<()> {
        if self.remote.is_none() {
            self.store.upsert_transaction(tx);
            self.persist_local_state()?;
            self.notifier.changed();
            return Ok(());
        }
        let mut shadow = self.store.transactions().to_vec();
        upsert_tx(&mut shadow, tx.clone());
        self.persist_shadow(&shadow, self.store.budgets())?;
        let payload = tx
            .remote_payload()
            .context("serialize transaction for remote")?;
        let outcome = self.remote_write(Collection::Transactions, &tx.id, &payload);
        if let Err(err) = outcome {
            self.report_remote_failure(&err, "transaction write");
        }
        self.pump()
    }

    /// Delete routes remote only for remote-backed ids; a local-minted id
    /// falls back to local strategy semantics even while signed in.
    fn erase_transaction(&mut self, id: &RecordId) -> Result<()> {
        let remote_target = match id {
            RecordId::Remote(rid) if self.remote.is_some() => Some(rid.clone()),
            _ => None,
        };
        if let Some(remote_id) = remote_target {
            let mut shadow = self.store.transactions().to_vec();
            shadow.retain(|t| &t.id != id);
            self.persist_shadow(&shadow, self.store.budgets())?;
            if let Err(err) = self.remote_delete(Collection::Transactions, &remote_id) {
                self.report_remote_failure(&err, "transaction delete");
            }
            return self.pump();
        }
        self.store.remove_transaction(id);
        self.persist_local_state()?;
        self.notifier.changed();
        Ok(())
    }

    fn write_budget(&mut self, budget: Budget) -> Result<()> {
        if self.remote.is_none() {
            self.store.upsert_budget(budget);
            self.persist_local_state()?;
            self.notifier.changed();
            return Ok(());
        }
        let mut shadow = self.store.budgets().to_vec();
        upsert_budget(&mut shadow, budget.clone());
        self.persist_shadow(self.store.transactions(), &shadow)?;
        let payload = budget
            .remote_payload()
            .context("serialize budget for remote")?;
        let outcome = self.remote_write(Collection::Budgets, &budget.id, &payload);
        if let Err(err) = outcome {
            self.report_remote_failure(&err, "budget write");
        }
        self.pump()
    }

    fn erase_budget(&mut self, id: &RecordId) -> Result<()> {
        let remote_target = match id {
            RecordId::Remote(rid) if self.remote.is_some() => Some(rid.clone()),
            _ => None,
        };
        if let Some(remote_id) = remote_target {
            let mut shadow = self.store.budgets().to_vec();
            shadow.retain(|b| &b.id != id);
            self.persist_shadow(self.store.transactions(), &shadow)?;
            if let Err(err) = self.remote_delete(Collection::Budgets, &remote_id) {
                self.report_remote_failure(&err, "budget delete");
            }
            return self.pump();
        }
        self.store.remove_budget(id);
        self.persist_local_state()?;
        self.notifier.changed();
        Ok(())
    }

    fn remote_write(
        &mut self,
        collection: Collection,
        id: &RecordId,
        payload: &Value,
    ) -> Result<(), RemoteError> {
        let Some(remote) = self.remote.as_mut() else {
            return Ok(());
        };
        match id {
            RecordId::Local(_) => remote.create(collection, payload).map(|_| ()),
            RecordId::Remote(remote_id) => remote.upsert(collection, remote_id, payload),
        }
    }

    fn remote_delete(&mut self, collection: Collection, id: &str) -> Result<(), RemoteError> {
        let Some(remote) = self.remote.as_mut() else {
            return Ok(());
        };
        remote.delete(collection, id)
    }

    fn remote_clear(&mut self, collection: Collection) -> Result<(), RemoteError> {
        let Some(remote) = self.remote.as_mut() else {
            return Ok(());
        };
        let docs = remote.fetch_all(collection)?;
        for (id, _) in docs {
            remote.delete(collection, &id)?;
        }
        Ok(())
    }

    /// Write and delete failures degrade: log, toast, keep running. The
    /// store is unchanged (only snapshots update it) and the shadow already
    /// reflects the optimistic state; the gap is not retried.
    fn report_remote_failure(&mut self, err: &RemoteError, what: &str) {
        tracing::warn!(error = %err, "remote {} failed", what);
        self.notifier.toast(
            &format!("Failed to sync {} with the remote store", what),
            Severity::Warning,
        );
    }

    // ----- mirror plumbing -----

    fn persist_local_state(&mut self) -> Result<()> {
        self.mirror.save_state(
            self.store.transactions(),
            self.store.budgets(),
            self.store.categories(),
        )
    }

    fn persist_shadow(&self, transactions: &[Transaction], budgets: &[Budget]) -> Result<()> {
        self.mirror
            .save_state(transactions, budgets, self.store.categories())
    }

    fn persist_history(&self) -> Result<()> {
        self.mirror.save_history(&self.history)
    }

    fn load_local_state(&mut self) {
        match self.mirror.load_state() {
            Ok(state) => {
                if state.recovered {
                    self.notifier.toast(
                        "Warning: failed to read local data (corrupt or unsupported)",
                        Severity::Warning,
                    );
                }
                self.store.replace_transactions(state.transactions);
                self.store.replace_budgets(state.budgets);
                self.store.replace_categories(state.categories);
            }
            Err(err) => {
                tracing::error!(error = %err, "mirror unreadable, starting empty");
                self.notifier.toast(
                    "Warning: unable to read local data (storage may be unavailable)",
                    Severity::Warning,
                );
                self.store.replace_transactions(Vec::new());
                self.store.replace_budgets(Vec::new());
                self.store.replace_categories(Default::default());
            }
        }
        self.notifier.changed();
    }
}

fn upsert_tx(items: &mut Vec<Transaction>, tx: Transaction) {
    match items.iter().position(|t| t.id == tx.id) {
        Some(idx) => items[idx] = tx,
        None => items.push(tx),
    }
    items.sort_by(|a, b| b.date.cmp(&a.date));
}

fn upsert_budget(items: &mut Vec<Budget>, budget: Budget) {
    match items.iter().position(|b| b.id == budget.id) {
        Some(idx) => items[idx] = budget,
        None => items.push(budget),
    }
}
