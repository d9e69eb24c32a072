//! Building, restoring and discarding the current user's session.
//!
//! [`Sessions`] sits between the token decoder and the session store:
//!
//! ```text
//! login ──→ from_token() ──→ decode ──→ User ──→ store.set(token)
//!
//! startup ──→ from_cookie() ──→ store.get(token) ──→ from_token() ─┐
//!                  │                                               │
//!                  └── nothing stored / bad token ──→ anonymous ◄──┘ (on error)
//!
//! logout() ──→ store.remove(token) ──→ anonymous
//! ```
//!
//! `from_token` reports a bad token to its caller; `from_cookie` never does.
//! A stale or corrupted token at startup degrades to the anonymous user.

use std::time::Duration;

use silex_store::SessionStore;
use silex_token::TokenDecoder;

use crate::user::now_ms;
use crate::{SessionConfig, SessionError, User};

/// Owns the decoder, the store and the configuration for user sessions.
pub struct Sessions<D: TokenDecoder, S: SessionStore> {
    decoder: D,
    store: S,
    config: SessionConfig,
}

#[allow(clippy::wrong_self_convention)]
impl<D: TokenDecoder, S: SessionStore> Sessions<D, S> {
    /// Creates a session layer over `decoder` and `store`.
    pub fn new(decoder: D, store: S, config: SessionConfig) -> Self {
        Self {
            decoder,
            store,
            config,
        }
    }

    /// Decodes `token` into a logged-in user and persists the token.
    ///
    /// The token is stored under the configured cookie name for as long as
    /// it stays valid. A failed write is logged and otherwise ignored: the
    /// returned user is valid either way, it just won't survive a restart.
    ///
    /// # Errors
    /// Returns [`SessionError::Decode`] if the token is malformed. The
    /// caller should treat the credential as invalid.
    pub fn from_token(&self, token: &str) -> Result<User, SessionError> {
        self.open(token).map_err(|e| {
            tracing::error!(error = %e, "invalid token");
            e
        })
    }

    /// Restores the user from the stored token, if there is one.
    ///
    /// Returns the anonymous user when nothing is stored, when the store
    /// can't be read, or when the stored token doesn't decode. Errors are
    /// logged, never returned.
    pub fn from_cookie(&self) -> User {
        let token = match self.store.get(&self.config.cookie_name) {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::debug!("no stored session token");
                return User::anonymous().clone();
            }
            Err(e) => {
                tracing::error!(error = %e, "could not read session store");
                return User::anonymous().clone();
            }
        };

        match self.open(&token) {
            Ok(user) => user,
            Err(e) => {
                tracing::error!(error = %e, "stored session token rejected");
                User::anonymous().clone()
            }
        }
    }

    /// Forgets the stored token and returns the anonymous user.
    ///
    /// Purely local: the server is not contacted. A store failure is logged.
    pub fn logout(&self) -> User {
        match self.store.remove(&self.config.cookie_name) {
            Ok(()) => tracing::info!("session closed"),
            Err(e) => {
                tracing::error!(error = %e, "could not remove session token")
            }
        }
        User::anonymous().clone()
    }

    /// Whether `user`'s token should be renewed now, given that the user
    /// was last active at `last_activity_ms`.
    ///
    /// A token past its renewal point is only renewed for a user who has
    /// been active within the configured inactivity period; an idle user's
    /// session is left to expire.
    pub fn should_renew(&self, user: &User, last_activity_ms: i64) -> bool {
        self.should_renew_at(user, last_activity_ms, now_ms())
    }

    /// [`should_renew`](Self::should_renew) with an explicit clock.
    pub fn should_renew_at(
        &self,
        user: &User,
        last_activity_ms: i64,
        now_ms: i64,
    ) -> bool {
        user.need_renew_at(now_ms)
            && !self.config.is_inactive(last_activity_ms, now_ms)
    }

    /// The configuration in use.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The underlying decoder.
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Decodes and persists without reporting decode failures; each caller
    /// logs them in its own terms.
    fn open(&self, token: &str) -> Result<User, SessionError> {
        let now = now_ms();
        let user = User::decode_at(token, &self.decoder, now)?;

        if let Err(e) = self.persist(&user, now) {
            tracing::warn!(error = %e, "could not persist session token");
        }

        tracing::info!(
            email = user.email(),
            admin = user.is_admin(),
            expires_in_ms = user.expiration_ms_at(now),
            "session opened"
        );
        Ok(user)
    }

    fn persist(&self, user: &User, now_ms: i64) -> Result<(), SessionError> {
        let remaining_ms = u64::try_from(user.expiration_ms_at(now_ms)).unwrap_or(0);
        let options = self
            .config
            .cookie_options(Duration::from_millis(remaining_ms));
        self.store
            .set(&self.config.cookie_name, user.token(), &options)?;
        Ok(())
    }
}

// =========================================================================
// Tests
// =========================================================================
