//! Error types for the token layer.
//!
//! Everything that can go wrong between "here is a compact token string"
//! and "here are typed claims" ends up in [`TokenError`].

/// Errors that can occur while decoding a token.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The token is not a well-formed compact token: wrong number of
    /// segments, invalid base64, or an unparseable header.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// The token payload decoded, but the claims it carries don't match
    /// what we expect (a required claim is missing, or has the wrong type).
    ///
    /// The inner `serde_json::Error` names the offending field.
    #[error("invalid claims: {0}")]
    Claims(#[source] serde_json::Error),

    /// The token string was empty (or only whitespace).
    #[error("token is empty")]
    Empty,
}
