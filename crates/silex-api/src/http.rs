//! The HTTP seam the generated services are written against.
//!
//! Services never talk to a socket directly. They build a URL, a header
//! map and an optional JSON body, and hand them to an [`HttpClient`]. The
//! default implementation is [`ReqwestClient`](crate::ReqwestClient); tests
//! use a recording fake.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ApiError;

/// Request or response headers, by name.
pub type Headers = BTreeMap<String, String>;

/// Sets `name` to `value`, dropping any entry whose name differs only in
/// case. Header names are case-insensitive on the wire.
pub(crate) fn set_header(headers: &mut Headers, name: &str, value: impl Into<String>) {
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
    headers.insert(name.to_string(), value.into());
}

/// A decoded HTTP response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,

    /// Response headers (lower-case names).
    pub headers: Headers,

    /// The decoded JSON body; `Value::Null` for an empty body.
    pub response: Value,
}

/// Issues HTTP requests on behalf of the services.
///
/// One call, one eventual result: no retries, no caching. Non-success
/// statuses are reported as [`ApiError::Status`].
pub trait HttpClient: Send + Sync + 'static {
    /// Sends a `POST` to `url` with the given headers and optional JSON body.
    async fn post(
        &self,
        url: &str,
        body: Option<Value>,
        headers: &Headers,
    ) -> Result<HttpResponse, ApiError>;
}

// ---------------------------------------------------------------------------
// Observe / ApiResult
// ---------------------------------------------------------------------------

/// What a service call hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Observe {
    /// Only the decoded body.
    #[default]
    Body,

    /// The whole response envelope (status, headers, body).
    Response,
}

/// The result of a service call, shaped by [`Observe`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult {
    Body(Value),
    Response(HttpResponse),
}

impl ApiResult {
    pub(crate) fn observe(response: HttpResponse, observe: Observe) -> Self {
        match observe {
            Observe::Body => ApiResult::Body(response.response),
            Observe::Response => ApiResult::Response(response),
        }
    }

    /// The body, whichever way the call was observed.
    pub fn into_body(self) -> Value {
        match self {
            ApiResult::Body(body) => body,
            ApiResult::Response(response) => response.response,
        }
    }

    /// The full response, if the call was made with [`Observe::Response`].
    pub fn into_response(self) -> Option<HttpResponse> {
        match self {
            ApiResult::Body(_) => None,
            ApiResult::Response(response) => Some(response),
        }
    }
}

// ---------------------------------------------------------------------------
// ApiConfiguration
// ---------------------------------------------------------------------------

/// Where the API lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfiguration {
    /// Base URL every route is appended to, without a trailing slash.
    pub base_path: String,
}

impl Default for ApiConfiguration {
    fn default() -> Self {
        Self {
            base_path: "https://localhost".to_string(),
        }
    }
}

impl ApiConfiguration {
    /// Configuration for `base_path`. Trailing slashes are dropped.
    pub fn new(base_path: impl Into<String>) -> Self {
        let base_path = base_path.into();
        Self {
            base_path: base_path.trim_end_matches('/').to_string(),
        }
    }

    /// Full URL for `route` (which starts with `/`).
    pub fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_path.trim_end_matches('/'), route)
    }

    /// `true` if the API is reached over TLS.
    pub fn is_secure(&self) -> bool {
        self.base_path.starts_with("https://")
    }
}
