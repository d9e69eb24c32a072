//! User session management for the silex client.
//!
//! This crate owns the client's idea of "who is logged in":
//!
//! 1. **Session model**: the [`User`] decoded from an access token, with
//!    its expiry and renewal arithmetic and credential checks
//! 2. **Lifecycle**: building a session from a fresh token, restoring it
//!    from the store at startup, and discarding it at logout ([`Sessions`])
//!
//! # How it fits in the stack
//!
//! ```text
//! API layer (above)      ← hands over the token returned by authenticate
//!     ↕
//! Session layer (this crate)
//!     ↕
//! Token + Store (below)  ← decode claims, persist the raw token
//! ```

mod config;
mod error;
mod sessions;
mod user;

pub use config::{DEFAULT_COOKIE_NAME, SessionConfig};
pub use error::SessionError;
pub use sessions::Sessions;
pub use user::{User, now_ms};
