//! Client for the authentication routes.

use crate::http::set_header;
use crate::{
    ApiConfiguration, ApiError, ApiResult, Headers, HttpClient, Observe,
    UserAuthenticationDTO,
};

const AUTHENTICATE_ROUTE: &str = "/core/authenticate";
const LOGOUT_ROUTE: &str = "/core/authenticate/logout";

/// `POST /core/authenticate` and `POST /core/authenticate/logout`.
///
/// Stateless apart from its base path: every call is one request.
#[derive(Debug, Clone)]
pub struct AuthenticationService<H: HttpClient> {
    http: H,
    config: ApiConfiguration,
}

impl<H: HttpClient> AuthenticationService<H> {
    pub fn new(http: H, config: ApiConfiguration) -> Self {
        Self { http, config }
    }

    /// Authenticates a user; the body of a success carries an access token.
    pub async fn authenticate(
        &self,
        body: Option<&UserAuthenticationDTO>,
        observe: Observe,
        mut headers: Headers,
    ) -> Result<ApiResult, ApiError> {
        set_header(&mut headers, "Accept", "application/json");
        set_header(&mut headers, "Content-Type", "application/json");

        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(ApiError::Encode)?;

        let url = self.config.url(AUTHENTICATE_ROUTE);
        let response = self.http.post(&url, body, &headers).await?;
        Ok(ApiResult::observe(response, observe))
    }

    /// Discards the token given in `authorization` on the server.
    ///
    /// `authorization` is sent verbatim as the `Authorization` header, so it
    /// usually reads `Bearer <token>`.
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidArgument`] without sending anything when
    /// `authorization` is blank.
    pub async fn logout(
        &self,
        authorization: &str,
        observe: Observe,
        mut headers: Headers,
    ) -> Result<ApiResult, ApiError> {
        if authorization.trim().is_empty() {
            return Err(ApiError::InvalidArgument(
                "required parameter authorization was empty when calling logout"
                    .into(),
            ));
        }

        set_header(&mut headers, "Authorization", authorization);
        set_header(&mut headers, "Accept", "application/json");

        let url = self.config.url(LOGOUT_ROUTE);
        let response = self.http.post(&url, None, &headers).await?;
        Ok(ApiResult::observe(response, observe))
    }

    /// The configuration in use.
    pub fn config(&self) -> &ApiConfiguration {
        &self.config
    }
}
