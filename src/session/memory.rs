use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use super::{Session, SessionStore, Slot};

/// In-process session store. Lost on restart.
pub struct MemoryStore<K> {
    slots: Mutex<HashMap<K, Slot>>,
}

impl<K> MemoryStore<K> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<K, Slot>> {
        // a panic elsewhere must not wedge every conversant
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K> Default for MemoryStore<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Lock a slot, recovering from poisoning.
pub fn lock(slot: &Slot) -> MutexGuard<'_, Session> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<K> SessionStore<K> for MemoryStore<K>
where
    K: Eq + Hash + Clone + Send + Sync,
{
    fn get(&self, id: &K) -> Option<Slot> {
        self.slots().get(id).map(Arc::clone)
    }

    fn get_or_create(&self, id: &K) -> (Slot, bool) {
        let mut slots = self.slots();
        if let Some(slot) = slots.get(id) {
            return (Arc::clone(slot), false);
        }
        let slot: Slot = Arc::new(Mutex::new(Session::new()));
        slots.insert(id.clone(), Arc::clone(&slot));
        (slot, true)
    }

    // the map lock is held while marking, so no lookup can hand out the
    // slot afterwards
    fn remove(&self, id: &K) -> bool {
        let mut slots = self.slots();
        match slots.remove(id) {
            Some(slot) => {
                lock(&slot).evicted = true;
                true
            }
            None => false,
        }
    }

    fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut slots = self.slots();
        let before = slots.len();
        slots.retain(|_, slot| {
            let mut session = lock(slot);
            let keep = session.idle_for(now) <= max_idle;
            session.evicted = !keep;
            keep
        });
        before - slots.len()
    }

    fn len(&self) -> usize {
        self.slots().len()
    }
}
