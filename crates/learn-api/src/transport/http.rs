//! reqwest-backed transport with session cookie and CSRF handling

use std::time::Duration;

use async_trait::async_trait;

use super::{ApiRequest, ApiResponse, Method, Transport};
use crate::error::{ApiError, Result};

/// Header Django expects alongside the `csrftoken` cookie
const CSRF_HEADER: &str = "X-CSRFToken";

/// Transport settings
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    pub timeout: Duration,
    pub csrf_token: Option<String>,
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            csrf_token: None,
            user_agent: concat!("learn-api/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Production transport
///
/// Keeps a cookie store so the session cookie set by the login flow is
/// replayed on every call, and attaches the CSRF token to unsafe methods.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    csrf_token: Option<String>,
}

impl HttpTransport {
    pub fn new(config: HttpTransportConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| ApiError::transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            csrf_token: config.csrf_token,
        })
    }

    const fn reqwest_method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut builder = self
            .client
            .request(Self::reqwest_method(request.method), request.url.clone());

        if request.method.is_unsafe()
            && let Some(ref token) = self.csrf_token
        {
            builder = builder.header(CSRF_HEADER, token);
        }

        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;

        let body = if bytes.is_empty() {
            None
        } else {
            match serde_json::from_slice(&bytes) {
                Ok(value) => Some(value),
                // Error pages are frequently HTML; keep the status, drop the body
                Err(_) if !(200..300).contains(&status) => None,
                Err(e) => return Err(ApiError::decode(e.to_string())),
            }
        };

        Ok(ApiResponse::new(status, body))
    }
}
