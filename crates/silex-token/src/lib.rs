//! Token claims and decoding for the silex client.
//!
//! This crate knows how to read what the server put in an access token:
//!
//! - **Claims** ([`Claims`], `CLAIM_*` constants): the typed view of the
//!   token payload and the claim names that form the wire contract.
//! - **Decoders** ([`TokenDecoder`] trait, [`JwtDecoder`]): how a compact
//!   token string becomes claims.
//! - **Errors** ([`TokenError`]): what can go wrong while decoding.
//!
//! # Architecture
//!
//! ```text
//! Session (User) → Token (Claims) ← compact token string from the server
//! ```
//!
//! It doesn't know about cookies, HTTP or sessions.

mod claims;
mod decoder;
mod error;

pub use claims::{
    CLAIM_CREDENTIALS_LIST, CLAIM_EMAIL, CLAIM_EXPIRE, CLAIM_FIRST_NAME,
    CLAIM_FULL_NAME, CLAIM_IS_ADMIN, CLAIM_ISSUED_AT, CLAIM_LAST_NAME, Claims,
};
#[cfg(feature = "jwt")]
pub use decoder::JwtDecoder;
pub use decoder::TokenDecoder;
pub use error::TokenError;
