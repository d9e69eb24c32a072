//! The session-aware client.
//!
//! [`SessionClient`] ties the REST services to the session layer:
//!
//! ```text
//! login(id, pw) ──→ POST /core/authenticate ──→ token ──→ Sessions::from_token
//! restore()     ──→ Sessions::from_cookie
//! logout(user)  ──→ POST /core/authenticate/logout ──→ Sessions::logout
//! ```

use serde_json::Value;
use silex_api::{
    ApiError, AuthenticationService, Headers, HttpClient, Observe, TokenGetDTO,
    UserAuthenticationDTO, UserCreationDTO, UsersService,
};
use silex_session::{Sessions, User};
use silex_store::SessionStore;
use silex_token::JwtDecoder;

use crate::{ClientConfig, SilexError};

/// A client holding one user session against one server.
pub struct SessionClient<H: HttpClient, S: SessionStore> {
    auth: AuthenticationService<H>,
    users: UsersService<H>,
    sessions: Sessions<JwtDecoder, S>,
}

impl<H: HttpClient + Clone, S: SessionStore> SessionClient<H, S> {
    /// Creates a client that talks through `http` and keeps its session in
    /// `store`.
    pub fn new(http: H, store: S, config: &ClientConfig) -> Self {
        let api = config.api_configuration();
        Self {
            auth: AuthenticationService::new(http.clone(), api.clone()),
            users: UsersService::new(http, api),
            sessions: Sessions::new(JwtDecoder, store, config.session_config()),
        }
    }
}

impl<H: HttpClient, S: SessionStore> SessionClient<H, S> {
    /// Authenticates against the server and opens a session with the token
    /// it hands back.
    ///
    /// # Errors
    /// Returns [`SilexError::Api`] if the server refuses the credentials or
    /// answers without a token, and [`SilexError::Session`] if the token
    /// doesn't decode.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<User, SilexError> {
        let credentials = UserAuthenticationDTO {
            identifier: identifier.to_string(),
            password: password.to_string(),
        };

        let body = self
            .auth
            .authenticate(Some(&credentials), Observe::Body, Headers::new())
            .await?
            .into_body();

        let token = token_from_body(body)?;
        Ok(self.sessions.from_token(&token)?)
    }

    /// The user from the stored session, or the anonymous user.
    pub fn restore(&self) -> User {
        self.sessions.from_cookie()
    }

    /// Ends `user`'s session on the server and locally.
    ///
    /// The local session is dropped even when the server call fails, so the
    /// caller always ends up anonymous; the server's error is still
    /// returned. A user who isn't logged in only gets the local logout.
    pub async fn logout(&self, user: &User) -> Result<User, SilexError> {
        let remote = if user.is_logged_in() && !user.token().is_empty() {
            self.auth
                .logout(&user.authorization_header(), Observe::Body, Headers::new())
                .await
                .map(|_| ())
        } else {
            Ok(())
        };

        let anonymous = self.sessions.logout();
        if let Err(e) = remote {
            tracing::warn!(error = %e, "server logout failed, local session dropped");
            return Err(e.into());
        }
        Ok(anonymous)
    }

    /// Creates a user on the server on behalf of `user`, returning the
    /// response body (which carries the new user's URI).
    ///
    /// `user`'s token is sent when logged in; creating an admin requires
    /// it to belong to an admin.
    pub async fn create_user(
        &self,
        user: &User,
        dto: &UserCreationDTO,
    ) -> Result<Value, SilexError> {
        let mut headers = Headers::new();
        if user.is_logged_in() {
            headers.insert("Authorization".into(), user.authorization_header());
        }

        let body = self
            .users
            .create(Some(dto), Observe::Body, headers)
            .await?
            .into_body();

        tracing::info!(email = %dto.email, admin = dto.admin, "user created");
        Ok(body)
    }

    /// The session layer, for renewal checks and direct token handling.
    pub fn sessions(&self) -> &Sessions<JwtDecoder, S> {
        &self.sessions
    }
}

/// Pulls the token out of an authenticate response.
///
/// The server wraps payloads as `{"metadata": .., "result": {..}}`; a bare
/// `{"token": ..}` is accepted too.
fn token_from_body(body: Value) -> Result<String, ApiError> {
    let payload = match body {
        Value::Object(mut map) if map.contains_key("result") => {
            map.remove("result").unwrap_or(Value::Null)
        }
        other => other,
    };

    let dto: TokenGetDTO = serde_json::from_value(payload).map_err(ApiError::Decode)?;
    Ok(dto.token)
}
