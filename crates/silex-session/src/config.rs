//! Session configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use silex_store::CookieOptions;

/// Name of the stored token when nothing else is configured.
pub const DEFAULT_COOKIE_NAME: &str = "opensilex-token";

/// Configuration for where and how the session token is persisted.
///
/// Every field has a default, so a config file only needs to mention what
/// it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Key the raw token is stored under.
    pub cookie_name: String,

    /// Path scope of the stored token.
    pub cookie_path: String,

    /// Domain scope of the stored token. `None` means the current host.
    pub cookie_domain: Option<String>,

    /// Mark the stored token secure-only. Set this when the server is
    /// reached over `https`.
    pub secure: bool,

    /// How long a user may stay idle before an expiring token is left to
    /// expire instead of being renewed.
    ///
    /// Default: 10 minutes.
    pub inactivity_period: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_path: "/".to_string(),
            cookie_domain: None,
            secure: false,
            inactivity_period: Duration::from_secs(10 * 60),
        }
    }
}

impl SessionConfig {
    /// Store options for a token that stays valid for `max_age`.
    pub fn cookie_options(&self, max_age: Duration) -> CookieOptions {
        CookieOptions {
            max_age: Some(max_age),
            path: self.cookie_path.clone(),
            domain: self.cookie_domain.clone(),
            secure: self.secure,
        }
    }

    /// Returns `true` if the last activity at `last_activity_ms` is older
    /// than the inactivity period, as seen at `now_ms`.
    pub fn is_inactive(&self, last_activity_ms: i64, now_ms: i64) -> bool {
        let period_ms =
            i64::try_from(self.inactivity_period.as_millis()).unwrap_or(i64::MAX);
        now_ms.saturating_sub(last_activity_ms) > period_ms
    }
}
