//! Session storage abstraction for the silex client.
//!
//! Provides the [`SessionStore`] trait: a small key-value contract with
//! cookie-style options (max age, path, domain, secure). The session layer
//! only ever needs `get`, `set` and `remove`; where the bytes end up is this
//! crate's concern.
//!
//! # Implementations
//!
//! - [`MemoryStore`]: process-local, shared between clones
//! - [`FileStore`]: a single JSON document on disk, survives restarts

mod error;
mod file;
mod memory;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Persists string values under string keys.
///
/// Reads of an entry whose max age has elapsed behave as if the entry were
/// never written.
pub trait SessionStore: Send + Sync + 'static {
    /// Returns the value stored under `key`, if any (and not expired).
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(
        &self,
        key: &str,
        value: &str,
        options: &CookieOptions,
    ) -> Result<(), StoreError>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// CookieOptions
// ---------------------------------------------------------------------------

/// Attributes attached to a stored value, mirroring cookie attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieOptions {
    /// How long the value stays readable. `None` keeps it until removed.
    pub max_age: Option<Duration>,

    /// Path scope. Defaults to `/`.
    pub path: String,

    /// Domain scope. `None` means the current host.
    pub domain: Option<String>,

    /// Only send over secure transports.
    pub secure: bool,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            max_age: None,
            path: "/".to_string(),
            domain: None,
            secure: false,
        }
    }
}

impl CookieOptions {
    /// Sets the max age.
    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// Sets the domain.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Sets the secure flag.
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// The instant at which a value written at `now` stops being readable.
    ///
    /// A max age too large to represent is treated as "never".
    pub fn expires_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let max_age = TimeDelta::from_std(self.max_age?).ok()?;
        now.checked_add_signed(max_age)
    }
}

// ---------------------------------------------------------------------------
// StoredEntry
// ---------------------------------------------------------------------------

/// A value as it sits in a store, with the attributes it was written with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub value: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub path: String,
    pub domain: Option<String>,
    pub secure: bool,
}

impl StoredEntry {
    /// Builds the entry for a write happening at `now`.
    pub fn new(value: &str, options: &CookieOptions, now: DateTime<Utc>) -> Self {
        Self {
            value: value.to_string(),
            expires_at: options.expires_at(now),
            path: options.path.clone(),
            domain: options.domain.clone(),
            secure: options.secure,
        }
    }

    /// Returns `true` once the entry's max age has elapsed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}
