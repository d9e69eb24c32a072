//! Unified error type for the silex client.

use silex_api::ApiError;
use silex_session::SessionError;
use silex_store::StoreError;
use silex_token::TokenError;

use crate::config::ConfigError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `silex` crate you deal with this single error type
/// instead of importing errors from each sub-crate; `?` converts them.
#[derive(Debug, thiserror::Error)]
pub enum SilexError {
    /// A token could not be decoded.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// The session store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A session could not be built from a token.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A REST call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The client configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token_error() {
        let err: SilexError = TokenError::Malformed("two segments".into()).into();
        assert!(matches!(err, SilexError::Token(_)));
        assert!(err.to_string().contains("two segments"));
    }

    #[test]
    fn test_from_store_error() {
        let err: SilexError = StoreError::Poisoned.into();
        assert!(matches!(err, SilexError::Store(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err: SilexError = SessionError::Decode(TokenError::Empty).into();
        assert!(matches!(err, SilexError::Session(_)));
        assert_eq!(err.to_string(), "invalid token: token is empty");
    }

    #[test]
    fn test_from_api_error() {
        let err: SilexError = ApiError::Status {
            status: 403,
            body: "forbidden".into(),
        }
        .into();
        assert!(matches!(err, SilexError::Api(_)));
        assert!(err.to_string().contains("403"));
    }

    #[test]
    fn test_from_config_error() {
        let err: SilexError = ConfigError::Invalid {
            var: "SILEX_BASE_PATH".into(),
            reason: "not a URL".into(),
        }
        .into();
        assert!(matches!(err, SilexError::Config(_)));
        assert!(err.to_string().contains("SILEX_BASE_PATH"));
    }
}
