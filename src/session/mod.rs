//! Where per-conversant state lives between turns.
//!
//! The store owns the identity → state mapping; the engine only borrows a
//! slot for the duration of one call. Each slot carries its own lock so
//! two turns for the same conversant serialize, while different
//! conversants never wait on each other.

pub mod memory;

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::guide::ConversationState;

/// A conversant's state plus bookkeeping for eviction.
#[derive(Debug, Clone)]
pub struct Session {
    pub state: ConversationState,
    pub last_seen: Instant,
    /// Set under the slot lock when the store drops this session. A holder
    /// of a stale handle must look the conversant up again.
    pub evicted: bool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: ConversationState::new(),
            last_seen: Instant::now(),
            evicted: false,
        }
    }

    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_seen)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// A lockable handle to one conversant's session.
pub type Slot = Arc<Mutex<Session>>;

/// The identity → session mapping. Could be in-process, Redis, etc.
pub trait SessionStore<K>: Send + Sync {
    /// The slot for `id`, if one exists.
    fn get(&self, id: &K) -> Option<Slot>;

    /// The slot for `id`, creating an empty one if needed.
    /// The flag is `true` when this call created it.
    fn get_or_create(&self, id: &K) -> (Slot, bool);

    /// Drop a conversant's session, marking it evicted. Returns whether
    /// one existed.
    fn remove(&self, id: &K) -> bool;

    /// Drop every session idle for longer than `max_idle`.
    /// Returns how many were evicted.
    fn evict_idle(&self, max_idle: Duration) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub use memory::MemoryStore;
