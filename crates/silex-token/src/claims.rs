//! Typed claims carried by an access token.
//!
//! The server issues a signed token whose payload is a flat JSON object.
//! The names of the fields in that object are a wire contract: if the
//! server renames `given_name`, every client breaks. They live here as
//! constants so that contract is written down in exactly one place.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Claim names
// ---------------------------------------------------------------------------

/// Expiration instant, in seconds since the Unix epoch.
pub const CLAIM_EXPIRE: &str = "exp";
/// Issue instant, in seconds since the Unix epoch.
pub const CLAIM_ISSUED_AT: &str = "iat";
/// The user's first name.
pub const CLAIM_FIRST_NAME: &str = "given_name";
/// The user's last name.
pub const CLAIM_LAST_NAME: &str = "family_name";
/// The user's email address.
pub const CLAIM_EMAIL: &str = "email";
/// The user's display name.
pub const CLAIM_FULL_NAME: &str = "name";
/// Whether the user has administrator rights.
pub const CLAIM_IS_ADMIN: &str = "is_admin";
/// The capability identifiers granted to the user.
pub const CLAIM_CREDENTIALS_LIST: &str = "credentials_list";

// ---------------------------------------------------------------------------
// Claims
// ---------------------------------------------------------------------------

/// The claims the client cares about, extracted field by field.
///
/// Required claims (`exp`, `given_name`, `family_name`, `email`) fail the
/// decode when absent. Optional ones fall back to a neutral value: no
/// display name, not an admin, no credentials.
///
/// Any other claim in the payload (`sub`, `iss`, `aud`, ...) is ignored.
///
/// ```rust
/// use silex_token::Claims;
///
/// let claims: Claims = serde_json::from_value(serde_json::json!({
///     "exp": 1_700_000_000,
///     "given_name": "Ada",
///     "family_name": "Lovelace",
///     "email": "ada@example.org",
///     "credentials_list": ["read", "write"],
/// }))
/// .unwrap();
///
/// assert_eq!(claims.first_name, "Ada");
/// assert!(!claims.is_admin);
/// assert!(claims.credentials.contains("write"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Expiration instant (seconds since epoch).
    ///
    /// Some issuers serialize this as a string; both `1700000000` and
    /// `"1700000000"` are accepted.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub exp: i64,

    /// Issue instant (seconds since epoch), when the issuer sets it.
    ///
    /// Together with `exp` this gives the token's total lifetime.
    #[serde(
        default,
        deserialize_with = "deserialize_optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub iat: Option<i64>,

    #[serde(rename = "given_name")]
    pub first_name: String,

    #[serde(rename = "family_name")]
    pub last_name: String,

    pub email: String,

    #[serde(
        rename = "name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub full_name: Option<String>,

    #[serde(rename = "is_admin", default)]
    pub is_admin: bool,

    /// Capability identifiers. Duplicates in the token collapse; order is
    /// irrelevant because checks are set membership.
    #[serde(rename = "credentials_list", default)]
    pub credentials: BTreeSet<String>,
}

/// Accepts an integer, a float (truncated), or a decimal string.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(secs) => Ok(secs),
        Raw::Float(secs) if secs.is_finite() => Ok(secs.trunc() as i64),
        Raw::Float(secs) => Err(serde::de::Error::custom(format!(
            "timestamp is not finite: {secs}"
        ))),
        Raw::Text(text) => text.trim().parse::<i64>().map_err(|e| {
            serde::de::Error::custom(format!(
                "timestamp {text:?} is not an integer: {e}"
            ))
        }),
    }
}

fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Timestamp(#[serde(deserialize_with = "deserialize_timestamp")] i64);

    Ok(Option::<Timestamp>::deserialize(deserializer)?.map(|Timestamp(secs)| secs))
}

// =========================================================================
// Tests
// =========================================================================
