//! Keyed mutual exclusion for merge invocations.
//!
//! Two callers discovering the same duplicate set must not race: one could
//! hard-delete a profile the other is still rebinding sessions onto. The
//! orchestrator derives a key from the sorted candidate id set and holds
//! this lock for the whole merge, so identical merges serialize while
//! unrelated ones proceed in parallel.

use std::collections::HashSet;
use std::sync::{Condvar, Mutex};

pub(crate) struct KeyedLock {
    held: Mutex<HashSet<String>>,
    released: Condvar,
}

impl KeyedLock {
    pub(crate) fn new() -> Self {
        Self {
            held: Mutex::new(HashSet::new()),
            released: Condvar::new(),
        }
    }

    /// Blocks until the key is free, then holds it until the guard drops.
    pub(crate) fn acquire(&self, key: String) -> KeyedGuard<'_> {
        let mut held = self.held.lock().unwrap_or_else(|e| e.into_inner());
        while held.contains(&key) {
            held = self
                .released
                .wait(held)
                .unwrap_or_else(|e| e.into_inner());
        }
        held.insert(key.clone());
        KeyedGuard { lock: self, key }
    }
}

pub(crate) struct KeyedGuard<'a> {
    lock: &'a KeyedLock,
    key: String,
}

impl Drop for KeyedGuard<'_> {
    fn drop(&mut self) {
        let mut held = self.lock.held.lock().unwrap_or_else(|e| e.into_inner());
        held.remove(&self.key);
        self.lock.released.notify_all();
    }
}
