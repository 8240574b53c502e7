//! Project-wide constants.

use std::path::PathBuf;

use anyhow::{Context, Result};

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");
pub const REPO: &str = env!("CARGO_PKG_REPOSITORY");

/// Default Gemini model when none is specified.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Video recommendations attached to a plan or chat reply.
pub const DEFAULT_MAX_VIDEOS: usize = 3;

/// HTTP host defaults.
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

/// Sessions untouched for this long are evicted by the server.
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 30 * 60;

/// Upper bound on enrichment per completed plan in the server.
pub const DEFAULT_ENRICH_TIMEOUT_SECS: u64 = 60;

/// Default database path: `~/.moodtrip/moodtrip.db`.
/// Single DB for settings and API keys.
pub fn default_db_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("cannot determine home directory")?;
    Ok(home.join(".moodtrip").join("moodtrip.db"))
}

/// Human-readable duration, e.g. `1h 5m`, `45s`.
pub fn format_duration(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    match (h, m, s) {
        (0, 0, s) => format!("{s}s"),
        (0, m, 0) => format!("{m}m"),
        (0, m, s) => format!("{m}m {s}s"),
        (h, 0, _) => format!("{h}h"),
        (h, m, _) => format!("{h}h {m}m"),
    }
}
