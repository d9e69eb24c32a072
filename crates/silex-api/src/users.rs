//! Client for the users routes.

use crate::http::set_header;
use crate::{
    ApiConfiguration, ApiError, ApiResult, Headers, HttpClient, Observe,
    UserCreationDTO,
};

const CREATE_ROUTE: &str = "/core/user/create";

/// `POST /core/user/create`.
#[derive(Debug, Clone)]
pub struct UsersService<H: HttpClient> {
    http: H,
    config: ApiConfiguration,
}

impl<H: HttpClient> UsersService<H> {
    pub fn new(http: H, config: ApiConfiguration) -> Self {
        Self { http, config }
    }

    /// Creates a user; the body of a success carries the new user's URI.
    ///
    /// Creating an admin requires the caller to be one, so pass an
    /// `Authorization` header in `headers` for that.
    pub async fn create(
        &self,
        body: Option<&UserCreationDTO>,
        observe: Observe,
        mut headers: Headers,
    ) -> Result<ApiResult, ApiError> {
        set_header(&mut headers, "Accept", "application/json");
        set_header(&mut headers, "Content-Type", "application/json");

        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(ApiError::Encode)?;

        let url = self.config.url(CREATE_ROUTE);
        let response = self.http.post(&url, body, &headers).await?;
        Ok(ApiResult::observe(response, observe))
    }

    /// The configuration in use.
    pub fn config(&self) -> &ApiConfiguration {
        &self.config
    }
}
