//! [`HttpClient`] over `reqwest`.

use serde_json::Value;

use crate::{ApiError, Headers, HttpClient, HttpResponse};

/// The default HTTP client.
///
/// Cloning is cheap: `reqwest::Client` is a handle onto a shared
/// connection pool.
#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a client with `reqwest`'s defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already-configured `reqwest::Client` (timeouts, proxies,
    /// root certificates, ...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpClient for ReqwestClient {
    async fn post(
        &self,
        url: &str,
        body: Option<Value>,
        headers: &Headers,
    ) -> Result<HttpResponse, ApiError> {
        let mut request = self.client.post(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            let bytes = serde_json::to_vec(&body).map_err(ApiError::Encode)?;
            request = request.body(bytes);
        }

        tracing::debug!(url, "POST");
        let response = request.send().await?;
        let status = response.status();

        let response_headers: Headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();

        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            tracing::warn!(url, status = status.as_u16(), "request rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(ApiError::Decode)?
        };

        Ok(HttpResponse {
            status: status.as_u16(),
            headers: response_headers,
            response: payload,
        })
    }
}
