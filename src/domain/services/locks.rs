//! Per-key mutex registry
//!
//! The borrow critical section serializes on two keys (book id, then
//! borrower email) without one global lock. Each distinct key lazily gets
//! its own mutex; the registry never shrinks, which is acceptable for an
//! in-process engine whose key space is the catalog and the membership.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub struct KeyedLocks<K> {
    registry: Mutex<HashMap<K, Arc<Mutex<()>>>>,
}

impl<K: Eq + Hash + Clone> KeyedLocks<K> {
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(HashMap::new()),
        }
    }

    /// The mutex guarding `key`. Callers lock the returned handle; two
    /// calls with equal keys always yield the same mutex.
    pub fn for_key(&self, key: &K) -> Arc<Mutex<()>> {
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(
            registry
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    /// Number of keys seen so far
    pub fn len(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
