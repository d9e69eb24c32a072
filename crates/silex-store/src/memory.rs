//! In-memory session storage.
//!
//! Suitable for tests and for processes that don't need the session to
//! survive a restart.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;

use crate::{CookieOptions, SessionStore, StoreError, StoredEntry};

/// In-memory store.
///
/// Entries live in a `HashMap` behind a `RwLock`. Cloning a `MemoryStore`
/// yields a handle onto the same map, so a test can keep one clone to
/// inspect what the session layer wrote through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, StoredEntry>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw entry for `key`, expired or not.
    pub fn entry(&self, key: &str) -> Option<StoredEntry> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    /// Number of entries currently held, including expired ones not yet
    /// evicted by a read.
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Returns `true` if the store holds nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = Utc::now();
        {
            let entries =
                self.entries.read().map_err(|_| StoreError::Poisoned)?;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(now) => {
                    return Ok(Some(entry.value.clone()));
                }
                Some(_) => {}
            }
        }

        // Expired: evict under the write lock.
        let mut entries =
            self.entries.write().map_err(|_| StoreError::Poisoned)?;
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
            tracing::debug!(key, "evicted expired entry");
        }
        Ok(None)
    }

    fn set(
        &self,
        key: &str,
        value: &str,
        options: &CookieOptions,
    ) -> Result<(), StoreError> {
        let entry = StoredEntry::new(value, options, Utc::now());
        self.entries
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .insert(key.to_string(), entry);
        tracing::debug!(key, max_age = ?options.max_age, "entry stored");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let removed = self
            .entries
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .remove(key)
            .is_some();
        tracing::debug!(key, removed, "entry removed");
        Ok(())
    }
}
