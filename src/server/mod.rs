//! The HTTP host: one request per turn, state kept per session id.

mod handlers;
pub mod types;

pub use handlers::{AppError, create_router};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;

use crate::enrich::{Enricher, Translator};
use crate::guide::GuideEngine;
use crate::language::Language;
use crate::session::SessionStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<GuideEngine<String>>,
    pub enricher: Arc<Enricher>,
    pub translator: Arc<dyn Translator>,
    pub enrich_timeout: Duration,
    /// Used when a request names no language.
    pub default_language: Language,
}

impl AppState {
    fn language(&self, requested: Option<&str>) -> Result<Language, AppError> {
        match requested {
            Some(lang) => lang.parse().map_err(AppError::BadRequest),
            None => Ok(self.default_language),
        }
    }
}

/// How often the reaper looks for idle sessions.
fn reap_interval(idle_timeout: Duration) -> Duration {
    (idle_timeout / 4).clamp(Duration::from_secs(1), Duration::from_secs(60))
}

/// Evict sessions idle longer than `idle_timeout`, forever.
pub fn spawn_reaper(
    store: Arc<dyn SessionStore<String>>,
    idle_timeout: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(reap_interval(idle_timeout));
        loop {
            ticker.tick().await;
            let evicted = store.evict_idle(idle_timeout);
            if evicted > 0 {
                tracing::info!(evicted, remaining = store.len(), "reaped idle sessions");
            }
        }
    })
}

/// Bind, start the reaper, and serve until Ctrl+C.
pub async fn serve(state: AppState, addr: SocketAddr, idle_timeout: Duration) -> Result<()> {
    let reaper = spawn_reaper(state.engine.store().clone(), idle_timeout);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("moodtrip listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await
        .context("server error")?;

    reaper.abort();
    Ok(())
}
