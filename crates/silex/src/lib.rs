//! # Silex
//!
//! Session-aware client for the silex authentication and users API.
//!
//! A session starts from a server-issued JWT. The client decodes it into a
//! [`User`] (identity, admin flag, credentials, expiry), persists the raw
//! token in a [`SessionStore`], and restores it on the next start. The REST
//! calls that issue and revoke tokens go through an [`HttpClient`].
//!
//! ## Layers
//!
//! - `silex-token` decodes token payloads into typed claims
//! - `silex-store` persists the token with cookie-style options
//! - `silex-session` turns claims into a [`User`] and manages its lifecycle
//! - `silex-api` calls the authentication and users routes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use silex::prelude::*;
//!
//! # async fn run() -> Result<(), SilexError> {
//! let config = ClientConfig::from_env()?;
//! let client = SessionClient::new(ReqwestClient::new(), MemoryStore::new(), &config);
//!
//! let user = client.login("admin@opensilex.org", "admin").await?;
//! assert!(user.is_logged_in());
//!
//! client.logout(&user).await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
pub mod logging;

pub use client::SessionClient;
pub use config::{
    ClientConfig, ConfigError, ENV_BASE_PATH, ENV_COOKIE_DOMAIN, ENV_COOKIE_NAME,
    ENV_STORE_PATH,
};
pub use error::SilexError;

pub use silex_api::{
    ApiConfiguration, ApiError, ApiResult, AuthenticationService, Headers,
    HttpClient, HttpResponse, Observe, ReqwestClient, TokenGetDTO,
    UserAuthenticationDTO, UserCreationDTO, UsersService,
};
pub use silex_session::{
    DEFAULT_COOKIE_NAME, SessionConfig, SessionError, Sessions, User, now_ms,
};
pub use silex_store::{CookieOptions, FileStore, MemoryStore, SessionStore, StoreError};
pub use silex_token::{Claims, JwtDecoder, TokenDecoder, TokenError};

/// Everything needed for the common login / restore / logout flow.
pub mod prelude {
    pub use crate::{
        ClientConfig, FileStore, HttpClient, MemoryStore, ReqwestClient,
        SessionClient, SessionStore, SilexError, User,
    };
}
