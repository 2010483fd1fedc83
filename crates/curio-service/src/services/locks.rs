//! Per-key async mutual exclusion
//!
//! Toggles read the actor's current row and then write based on it. Holding
//! the lock for (actor, target) across that read and write keeps two toggles
//! from the same actor from both seeing "absent" and both inserting.

use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use curio_core::{ActorKey, ReactionTarget};

/// Async mutexes keyed by string, created on demand and dropped when idle
#[derive(Default)]
pub struct KeyedLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key for an actor's reactions on one target
    pub fn reaction_key(actor: &ActorKey, target: &ReactionTarget) -> String {
        format!("reaction|{actor}|{target}")
    }

    /// Key for an actor's favorite on one post
    pub fn favorite_key(actor: &ActorKey, post_id: Uuid) -> String {
        format!("favorite|{actor}|{post_id}")
    }

    /// Wait for the lock on `key`; it is released when the guard drops
    pub async fn lock(&self, key: String) -> KeyedGuard<'_> {
        let mutex = self
            .locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();

        let guard = mutex.lock_owned().await;

        KeyedGuard {
            locks: self,
            key,
            guard: Some(guard),
        }
    }

    /// Number of keys currently held or waited on
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl fmt::Debug for KeyedLocks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedLocks")
            .field("active_keys", &self.locks.len())
            .finish()
    }
}

/// Holds one key of a [`KeyedLocks`]
pub struct KeyedGuard<'a> {
    locks: &'a KeyedLocks,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyedGuard<'_> {
    fn drop(&mut self) {
        // Release first so the map's Arc is the only one left when nobody waits
        drop(self.guard.take());
        self.locks
            .locks
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
