//! Per-key mutual exclusion for reconciliation.
//!
//! Keys hash onto a fixed set of mutexes. Two keys may share a shard, which
//! only costs contention; one key always maps to the same shard. The guard
//! releases on drop, so every exit path of the locked scope unlocks.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const DEFAULT_SHARDS: usize = 64;

#[derive(Debug)]
pub struct KeyedLocks {
    shards: Vec<Mutex<()>>,
}

impl Default for KeyedLocks {
    fn default() -> Self {
        Self::new(DEFAULT_SHARDS)
    }
}

impl KeyedLocks {
    pub fn new(n_shards: usize) -> Self {
        let n = n_shards.max(1);
        Self {
            shards: (0..n).map(|_| Mutex::new(())).collect(),
        }
    }

    /// Block until the (player, day) key is free, then hold it until the
    /// guard drops.
    pub fn lock(&self, player_id: &str, date_key: &str) -> MutexGuard<'_, ()> {
        let idx = self.index(player_id, date_key);
        // The mutex guards no data; a panic elsewhere leaves nothing torn.
        self.shards[idx].lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn index(&self, player_id: &str, date_key: &str) -> usize {
        let mut h = DefaultHasher::new();
        (player_id, date_key).hash(&mut h);
        (h.finish() as usize) % self.shards.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_same_shard() {
        let locks = KeyedLocks::new(8);
        assert_eq!(locks.index("p1", "2024-05-01"), locks.index("p1", "2024-05-01"));
        assert!(locks.index("p1", "2024-05-01") < 8);
    }

    #[test]
    fn zero_shards_still_locks() {
        let locks = KeyedLocks::new(0);
        let _g = locks.lock("p1", "2024-05-01");
    }

    #[test]
    fn guard_releases_on_drop() {
        let locks = KeyedLocks::new(1);
        drop(locks.lock("a", "d"));
        let _again = locks.lock("b", "d");
    }
}
