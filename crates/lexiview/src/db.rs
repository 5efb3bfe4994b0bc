// SQLite persistence for panel state and UI preferences.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

/// Key under which the active theme is stored.
pub const THEME_KEY: &str = "ui_theme_v1";

/// Key/value store of JSON documents.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path`. Pass `":memory:"` for an
    /// ephemeral database.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS panel_state (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Database {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Store a JSON value under `key`, replacing any previous value.
    pub fn save_state(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn();
        let json_str =
            serde_json::to_string(value).context("failed to serialize state value")?;
        conn.execute(
            "INSERT OR REPLACE INTO panel_state (key, value, updated_at)
             VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))",
            params![key, json_str],
        )
        .context("failed to save state")?;
        Ok(())
    }

    /// Load the JSON value stored under `key`.
    ///
    /// Returns `None` for a missing key. A stored value that is not valid JSON
    /// is an error; callers that can recover treat it like a missing key.
    pub fn load_state(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn();
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM panel_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .context("failed to query panel state")?;

        match raw {
            Some(json_str) => {
                let value = serde_json::from_str(&json_str)
                    .with_context(|| format!("stored value for {key} is not valid JSON"))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub fn delete_state(&self, key: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute("DELETE FROM panel_state WHERE key = ?1", params![key])
            .context("failed to delete state")?;
        Ok(())
    }

    /// Write a raw (possibly non-JSON) string. Used by tests to simulate a
    /// corrupted entry.
    #[cfg(test)]
    pub(crate) fn save_raw(&self, key: &str, raw: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "INSERT OR REPLACE INTO panel_state (key, value) VALUES (?1, ?2)",
            params![key, raw],
        )?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
