//! User settings backed by SQLite.
//!
//! Shares a database with [`KeyStore`](crate::keys::KeyStore). Pass the
//! same path to both.

use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use std::sync::{Mutex, MutexGuard};

use crate::language::Language;

const LANGUAGE_KEY: &str = "language";
const MODEL_KEY: &str = "model";

/// Persistent key-value settings store.
pub struct Config {
    conn: Mutex<Connection>,
}

impl Config {
    /// Open or create the config table in the given database.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).context("failed to open config database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS config (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .context("failed to create config table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("config lock poisoned"))
    }

    /// Get a config value by key.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT value FROM config WHERE key = ?1")?;
        let mut rows = stmt.query([key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Set a config value (upsert).
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }

    /// Remove a config key.
    pub fn remove(&self, key: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM config WHERE key = ?1", [key])?;
        Ok(())
    }

    /// Saved display language. Unreadable values fall back to English.
    pub fn language(&self) -> Result<Language> {
        Ok(match self.get(LANGUAGE_KEY)? {
            Some(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!(%value, error = %e, "ignoring saved language");
                Language::default()
            }),
            None => Language::default(),
        })
    }

    pub fn set_language(&self, language: Language) -> Result<()> {
        self.set(LANGUAGE_KEY, language.code())
    }

    /// Saved generator model, if any.
    pub fn model(&self) -> Result<Option<String>> {
        self.get(MODEL_KEY)
    }

    pub fn set_model(&self, model: &str) -> Result<()> {
        self.set(MODEL_KEY, model)
    }
}
