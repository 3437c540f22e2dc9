//! In-memory shuffle sessions.
//!
//! Re-shuffling a rendered preview must not touch the network, so the item
//! keys of each preview are parked here, behind an explicit cache type that
//! gets injected where it is needed. Single-instance deployments use this
//! in-process map; a multi-instance deployment would back the same type
//! with an external key-value store.

use std::collections::HashMap;
use std::sync::Mutex;

use rand::Rng;
use uuid::Uuid;

use tubeforge_lineup::{build_lineup, Lineup};

/// The cached inputs of one preview: everything a re-shuffle needs.
#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub owner_key: String,
    pub third_party_keys: Vec<String>,
}

/// Session cache keyed by preview id.
#[derive(Debug, Default)]
pub struct ShuffleSessions {
    inner: Mutex<HashMap<Uuid, SessionEntry>>,
}

impl ShuffleSessions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parks a preview's item keys and returns its session id.
    pub fn insert(&self, owner_key: String, third_party_keys: Vec<String>) -> Uuid {
        let id = Uuid::new_v4();
        self.inner
            .lock()
            .expect("shuffle session lock poisoned")
            .insert(
                id,
                SessionEntry {
                    owner_key,
                    third_party_keys,
                },
            );
        id
    }

    /// Re-randomizes a parked preview. Pure computation over cached keys —
    /// no fetch, no store access. `None` when the session is unknown or
    /// expired.
    pub fn reshuffle(&self, id: Uuid, rng: &mut impl Rng) -> Option<Lineup> {
        let entry = {
            let sessions = self.inner.lock().expect("shuffle session lock poisoned");
            sessions.get(&id).cloned()
        }?;

        Some(build_lineup(
            &entry.owner_key,
            entry.third_party_keys,
            rng,
        ))
    }

    /// Drops a session once its preview is gone.
    pub fn remove(&self, id: Uuid) {
        self.inner
            .lock()
            .expect("shuffle session lock poisoned")
            .remove(&id);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .expect("shuffle session lock poisoned")
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
