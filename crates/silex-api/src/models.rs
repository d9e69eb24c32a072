//! Request and response bodies exchanged with the server.

use serde::{Deserialize, Serialize};

/// Credentials sent to `POST /core/authenticate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAuthenticationDTO {
    /// Login identifier (email or URI).
    pub identifier: String,
    pub password: String,
}

/// Body returned by a successful authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGetDTO {
    /// The signed access token.
    pub token: String,
}

/// Body sent to `POST /core/user/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreationDTO {
    /// Requested URI; the server generates one when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub admin: bool,
    pub password: String,
}
