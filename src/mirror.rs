// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection, OptionalExtension};

use crate::history::ActionLog;
use crate::models::{Budget, Transaction};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Budgetclip", "budgetclip"));

const KEY_TRANSACTIONS: &str = "transactions";
const KEY_BUDGETS: &str = "budgets";
const KEY_CATEGORIES: &str = "categories";
const KEY_HISTORY: &str = "history";
const KEY_ALERTS: &str = "alerts";

pub const BASE_CURRENCY_DEFAULT: &str = "INR";

pub fn mirror_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("budgetclip.sqlite"))
}

/// State read back from the mirror. `recovered` is set when a record failed
/// to decode and was replaced by an empty collection.
#[derive(Debug, Default)]
pub struct MirrorState {
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub categories: BTreeSet<String>,
    pub recovered: bool,
}

/// Durable per-user key-value mirror: three JSON records (transactions,
/// budgets, categories) fully replaced on every save, plus settings and the
/// serialized action log and alert keys. One SQLite file backs it all.
pub struct Mirror {
    conn: Connection,
    data_version: i64,
}

impl Mirror {
    pub fn open_default() -> Result<Self> {
        let path = mirror_path()?;
        Self::open(&path)
    }

    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Open mirror at {}", path.display()))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        let data_version = read_data_version(&conn)?;
        Ok(Mirror { conn, data_version })
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let v: Option<String> = self
            .conn
            .query_row("SELECT value FROM mirror WHERE key=?1", params![key], |r| {
                r.get(0)
            })
            .optional()?;
        Ok(v)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO mirror(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value,
                 updated_at=datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// Full replace of all three records; never an append.
    pub fn save_state(
        &self,
        transactions: &[Transaction],
        budgets: &[Budget],
        categories: &BTreeSet<String>,
    ) -> Result<()> {
        self.put(KEY_TRANSACTIONS, &serde_json::to_string(transactions)?)?;
        self.put(KEY_BUDGETS, &serde_json::to_string(budgets)?)?;
        self.put(KEY_CATEGORIES, &serde_json::to_string(categories)?)?;
        Ok(())
    }

    /// Read back the three records. A record that fails to decode degrades to
    /// empty rather than failing the load.
    pub fn load_state(&self) -> Result<MirrorState> {
        let mut state = MirrorState::default();
        state.transactions =
            self.decode_or_empty(KEY_TRANSACTIONS, &mut state.recovered)?;
        state.budgets = self.decode_or_empty(KEY_BUDGETS, &mut state.recovered)?;
        state.categories = self.decode_or_empty(KEY_CATEGORIES, &mut state.recovered)?;
        Ok(state)
    }

    fn decode_or_empty<T: serde::de::DeserializeOwned + Default>(
        &self,
        key: &str,
        recovered: &mut bool,
    ) -> Result<T> {
        match self.get(key)? {
            None => Ok(T::default()),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(v) => Ok(v),
                Err(err) => {
                    tracing::warn!(key, error = %err, "mirror record corrupt, using empty");
                    *recovered = true;
                    Ok(T::default())
                }
            },
        }
    }

    pub fn save_history(&self, log: &ActionLog) -> Result<()> {
        self.put(KEY_HISTORY, &serde_json::to_string(log)?)
    }

    pub fn load_history(&self) -> Result<ActionLog> {
        let mut recovered = false;
        self.decode_or_empty(KEY_HISTORY, &mut recovered)
    }

    pub fn save_alerts(&self, keys: &BTreeSet<String>) -> Result<()> {
        self.put(KEY_ALERTS, &serde_json::to_string(keys)?)
    }

    pub fn load_alerts(&self) -> Result<BTreeSet<String>> {
        let mut recovered = false;
        self.decode_or_empty(KEY_ALERTS, &mut recovered)
    }

    // Settings

    pub fn base_currency(&self) -> Result<String> {
        let v = self.get_setting("base_currency")?;
        Ok(v.unwrap_or_else(|| BASE_CURRENCY_DEFAULT.to_string()))
    }

    pub fn set_base_currency(&self, ccy: &str) -> Result<()> {
        self.set_setting("base_currency", &ccy.to_uppercase())
    }

    pub fn sync_identity(&self) -> Result<Option<(String, String)>> {
        match (self.get_setting("sync_user")?, self.get_setting("sync_server")?) {
            (Some(user), Some(server)) => Ok(Some((user, server))),
            _ => Ok(None),
        }
    }

    pub fn set_sync_identity(&self, user: &str, server: &str) -> Result<()> {
        self.set_setting("sync_user", user)?;
        self.set_setting("sync_server", server)
    }

    pub fn clear_sync_identity(&self) -> Result<()> {
        self.conn
            .execute("DELETE FROM settings WHERE key IN ('sync_user','sync_server')", [])?;
        Ok(())
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let v: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key=?1",
                params![key],
                |r| r.get(0),
            )
            .optional()?;
        Ok(v)
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// True when another connection has written the mirror since the last
    /// check. Readers must then re-load fully, never patch incrementally.
    pub fn externally_changed(&mut self) -> Result<bool> {
        let current = read_data_version(&self.conn)?;
        let changed = current != self.data_version;
        self.data_version = current;
        Ok(changed)
    }
}

fn read_data_version(conn: &Connection) -> Result<i64> {
    let v: i64 = conn.query_row("PRAGMA data_version", [], |r| r.get(0))?;
    Ok(v)
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS mirror(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
    "#,
    )?;
    Ok(())
}
