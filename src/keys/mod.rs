//! API keys for the external services.
//!
//! Keys typed in at the prompt are stored in SQLite alongside the config;
//! otherwise the usual environment variables apply.

use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;

/// Services that need a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Gemini,
    YouTube,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::Gemini, Provider::YouTube];

    /// Storage key.
    pub fn id(self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::YouTube => "youtube",
        }
    }

    /// Environment variable consulted when nothing is stored.
    pub fn env_var(self) -> &'static str {
        match self {
            Provider::Gemini => "GOOGLE_API_KEY",
            Provider::YouTube => "YOUTUBE_API_KEY",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Provider::Gemini),
            "youtube" | "yt" => Ok(Provider::YouTube),
            other => Err(format!("unknown provider: {other} (expected gemini or youtube)")),
        }
    }
}

/// Where a key came from, for status display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Stored,
    Env,
    Missing,
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeySource::Stored => "stored ✓",
            KeySource::Env => "env ✓",
            KeySource::Missing => "not set",
        })
    }
}

/// Manages API-key storage in SQLite.
///
/// Shares a database with [`Config`](crate::config::Config).
pub struct KeyStore {
    conn: Mutex<Connection>,
}

impl KeyStore {
    /// Open or create the keys table in the given database path.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).context("failed to open key database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS api_keys (
                provider TEXT PRIMARY KEY,
                key      TEXT NOT NULL
            )",
        )
        .context("failed to create api_keys table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("key store lock poisoned"))
    }

    /// Stored key only, ignoring the environment.
    pub fn get(&self, provider: Provider) -> Result<Option<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key FROM api_keys WHERE provider = ?1")?;
        let mut rows = stmt.query([provider.id()])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Store a key (upsert).
    pub fn set(&self, provider: Provider, key: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO api_keys (provider, key) VALUES (?1, ?2)
             ON CONFLICT(provider) DO UPDATE SET key = excluded.key",
            [provider.id(), key],
        )?;
        Ok(())
    }

    /// Remove a stored key. The environment variable, if any, still applies.
    pub fn remove(&self, provider: Provider) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM api_keys WHERE provider = ?1", [provider.id()])?;
        Ok(())
    }

    /// The key to use. Priority: stored → environment variable.
    pub fn api_key(&self, provider: Provider) -> Result<Option<String>> {
        if let Some(key) = self.get(provider)? {
            return Ok(Some(key));
        }
        Ok(env_key(provider))
    }

    pub fn source(&self, provider: Provider) -> Result<KeySource> {
        if self.get(provider)?.is_some() {
            return Ok(KeySource::Stored);
        }
        Ok(match env_key(provider) {
            Some(_) => KeySource::Env,
            None => KeySource::Missing,
        })
    }
}

fn env_key(provider: Provider) -> Option<String> {
    std::env::var(provider.env_var())
        .ok()
        .filter(|k| !k.is_empty())
}
