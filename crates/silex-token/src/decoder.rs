//! Decoders that turn a compact token string into claims.
//!
//! The client never verifies a token's signature: it has no key, and it
//! doesn't need one. The server is the only party that trusts the token;
//! the client just reads what the server told it about the user (name,
//! expiry, rights) to drive the UI and decide when to renew.
//!
//! Decoding is a strategy behind the [`TokenDecoder`] trait, the same way
//! serialization formats sit behind a codec. Production code uses
//! [`JwtDecoder`]; tests can plug in anything that maps a string to claims.

use serde::de::DeserializeOwned;

use crate::{Claims, TokenError};

/// Decodes a token string into a typed payload.
///
/// `decode` is generic over the payload type so a caller can ask for the
/// typed [`Claims`], a raw `serde_json::Map`, or its own struct.
///
/// ## Trait bounds
///
/// - `Send + Sync` → a decoder can be shared by every task that needs to
///   rebuild a session.
/// - `'static` → it owns everything it needs.
pub trait TokenDecoder: Send + Sync + 'static {
    /// Decodes the payload of `token` into `T`.
    ///
    /// # Errors
    /// - [`TokenError::Empty`] if the token is blank
    /// - [`TokenError::Malformed`] if the token structure is broken
    /// - [`TokenError::Claims`] if the payload doesn't fit `T`
    fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError>;

    /// Decodes the claims a session is built from.
    fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        self.decode(token)
    }
}

// ---------------------------------------------------------------------------
// JwtDecoder
// ---------------------------------------------------------------------------

/// A [`TokenDecoder`] for JSON Web Tokens, backed by `jsonwebtoken`.
///
/// Signature, expiry, audience and issuer checks are all disabled: an
/// already-expired token still decodes (the session model answers "is it
/// expired?" itself). Only the token's shape is checked: three segments,
/// a parseable header, and a JSON payload.
///
/// This is behind the `jwt` feature flag (enabled by default).
///
/// ```rust
/// use jsonwebtoken::{encode, EncodingKey, Header};
/// use silex_token::{JwtDecoder, TokenDecoder};
///
/// let payload = serde_json::json!({
///     "exp": 1_700_000_000,
///     "given_name": "Ada",
///     "family_name": "Lovelace",
///     "email": "ada@example.org",
/// });
/// let token = encode(
///     &Header::default(),
///     &payload,
///     &EncodingKey::from_secret(b"server-only"),
/// )
/// .unwrap();
///
/// let claims = JwtDecoder.decode_claims(&token).unwrap();
/// assert_eq!(claims.email, "ada@example.org");
/// ```
#[cfg(feature = "jwt")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtDecoder;

#[cfg(feature = "jwt")]
impl JwtDecoder {
    fn validation() -> jsonwebtoken::Validation {
        let mut validation =
            jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        validation
    }
}

#[cfg(feature = "jwt")]
impl TokenDecoder for JwtDecoder {
    fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::Empty);
        }

        // With signature validation off the key is never consulted.
        let key = jsonwebtoken::DecodingKey::from_secret(&[]);
        let data = jsonwebtoken::decode::<serde_json::Value>(
            token,
            &key,
            &Self::validation(),
        )
        .map_err(|e| TokenError::Malformed(e.to_string()))?;

        tracing::trace!(alg = ?data.header.alg, "token payload decoded");

        // Claims are mapped in a second step so a payload that parsed as
        // JSON but is missing fields reports which field.
        serde_json::from_value(data.claims).map_err(TokenError::Claims)
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(all(test, feature = "jwt"))]
mod tests {
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
    use serde_json::{Value, json};

    use super::*;

    fn sign(payload: &Value) -> String {
        encode(
            &Header::default(),
            payload,
            &EncodingKey::from_secret(b"server-side-secret"),
        )
        .expect("encoding a test token should succeed")
    }

    fn payload(exp: i64) -> Value {
        json!({
            "exp": exp,
            "given_name": "Grace",
            "family_name": "Hopper",
            "email": "grace@example.org",
            "is_admin": false,
            "credentials_list": ["read"],
        })
    }

    #[test]
    fn test_decode_claims_valid_token_returns_claims() {
        let token = sign(&payload(4_000_000_000));

        let claims = JwtDecoder.decode_claims(&token).unwrap();

        assert_eq!(claims.exp, 4_000_000_000);
        assert_eq!(claims.first_name, "Grace");
        assert!(claims.credentials.contains("read"));
    }

    #[test]
    fn test_decode_claims_expired_token_still_decodes() {
        // Expiry is the session model's question, not the decoder's.
        let token = sign(&payload(1));

        let claims = JwtDecoder.decode_claims(&token).unwrap();

        assert_eq!(claims.exp, 1);
    }

    #[test]
    fn test_decode_claims_ignores_signing_key_and_algorithm() {
        let header = Header::new(Algorithm::HS512);
        let token = encode(
            &header,
            &payload(4_000_000_000),
            &EncodingKey::from_secret(b"some-other-key"),
        )
        .unwrap();

        assert!(JwtDecoder.decode_claims(&token).is_ok());
    }

    #[test]
    fn test_decode_claims_with_audience_still_decodes() {
        let mut body = payload(4_000_000_000);
        body["aud"] = json!("opensilex");
        let token = sign(&body);

        assert!(JwtDecoder.decode_claims(&token).is_ok());
    }

    #[test]
    fn test_decode_raw_map_keeps_unknown_claims() {
        let mut body = payload(4_000_000_000);
        body["sub"] = json!("http://opensilex.org/users#grace");
        let token = sign(&body);

        let map: serde_json::Map<String, Value> =
            JwtDecoder.decode(&token).unwrap();

        assert_eq!(map["sub"], "http://opensilex.org/users#grace");
    }

    #[test]
    fn test_decode_claims_empty_token_returns_empty() {
        assert!(matches!(
            JwtDecoder.decode_claims("   "),
            Err(TokenError::Empty)
        ));
    }

    #[test]
    fn test_decode_claims_garbage_returns_malformed() {
        assert!(matches!(
            JwtDecoder.decode_claims("not-a-token"),
            Err(TokenError::Malformed(_))
        ));
        assert!(matches!(
            JwtDecoder.decode_claims("a.b.c"),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_claims_missing_claim_returns_claims_error() {
        let token = sign(&json!({ "exp": 4_000_000_000_i64 }));

        let err = JwtDecoder.decode_claims(&token).unwrap_err();

        assert!(matches!(err, TokenError::Claims(_)));
        assert!(err.to_string().contains("given_name"));
    }
}
