//! Client configuration.
//!
//! Built from defaults and overlaid with environment variables:
//!
//! | variable              | field           | default              |
//! |-----------------------|-----------------|----------------------|
//! | `SILEX_BASE_PATH`     | `base_path`     | `https://localhost`  |
//! | `SILEX_COOKIE_NAME`   | `cookie_name`   | `opensilex-token`    |
//! | `SILEX_COOKIE_DOMAIN` | `cookie_domain` | unset (current host) |
//! | `SILEX_STORE_PATH`    | `store_path`    | unset (memory only)  |

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use silex_api::ApiConfiguration;
use silex_session::{DEFAULT_COOKIE_NAME, SessionConfig};

pub const ENV_BASE_PATH: &str = "SILEX_BASE_PATH";
pub const ENV_COOKIE_NAME: &str = "SILEX_COOKIE_NAME";
pub const ENV_COOKIE_DOMAIN: &str = "SILEX_COOKIE_DOMAIN";
pub const ENV_STORE_PATH: &str = "SILEX_STORE_PATH";

/// Everything needed to talk to one server and keep one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root URL of the REST API, e.g. `https://silex.example.org/rest`.
    pub base_path: String,

    /// Key the session token is stored under.
    pub cookie_name: String,

    /// Domain scope of the stored token.
    pub cookie_domain: Option<String>,

    /// File the session is persisted to. `None` keeps it in memory.
    pub store_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_path: ApiConfiguration::default().base_path,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_domain: None,
            store_path: None,
        }
    }
}

impl ClientConfig {
    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] if a variable is set to something
    /// unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads the configuration from `lookup`, which maps a variable name to
    /// its value. Unset and empty variables keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(base_path) = get(ENV_BASE_PATH) {
            config.base_path = base_path;
        }
        if let Some(cookie_name) = get(ENV_COOKIE_NAME) {
            config.cookie_name = cookie_name;
        }
        config.cookie_domain = get(ENV_COOKIE_DOMAIN);
        config.store_path = get(ENV_STORE_PATH).map(PathBuf::from);

        config.validate()?;
        Ok(config)
    }

    /// Checks that the base path is an http(s) URL and the cookie name is
    /// usable as a key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_path = self.base_path.trim();
        if !(base_path.starts_with("http://") || base_path.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: ENV_BASE_PATH.to_string(),
                reason: format!("expected an http(s) URL, got {base_path:?}"),
            });
        }

        if self.cookie_name.trim().is_empty()
            || self.cookie_name.contains(|c: char| c.is_whitespace() || c == ';' || c == '=')
        {
            return Err(ConfigError::Invalid {
                var: ENV_COOKIE_NAME.to_string(),
                reason: format!("not a valid cookie name: {:?}", self.cookie_name),
            });
        }

        Ok(())
    }

    /// Whether the server is reached over `https`.
    pub fn is_secure(&self) -> bool {
        self.base_path.trim().starts_with("https://")
    }

    /// The API client configuration.
    pub fn api_configuration(&self) -> ApiConfiguration {
        ApiConfiguration::new(self.base_path.trim())
    }

    /// The session configuration. The token is stored secure-only when the
    /// server is reached over `https`.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            cookie_name: self.cookie_name.clone(),
            cookie_domain: self.cookie_domain.clone(),
            secure: self.is_secure(),
            ..SessionConfig::default()
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}
