//! Error types for the session layer.

use silex_store::StoreError;
use silex_token::TokenError;

/// Errors that can occur while building or persisting a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The token couldn't be decoded into a user. The credential should be
    /// treated as invalid.
    #[error("invalid token: {0}")]
    Decode(#[from] TokenError),

    /// The session store refused a read or write.
    #[error("session store failed: {0}")]
    Store(#[from] StoreError),
}
