//! Error types for the API layer.

/// Errors that can occur while calling the REST API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required argument was missing. Raised before any request is sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The request never produced a response (connection refused, DNS,
    /// TLS, timeout, ...).
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body wasn't the JSON we expected.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request body couldn't be serialized.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}
