//! HTTP transport abstraction
//!
//! Every API call funnels through a [`Transport`]. The production
//! implementation is [`HttpTransport`]; tests swap in `MockTransport`
//! (feature `testing`) to assert exactly which requests were issued.

mod http;
#[cfg(any(test, feature = "testing"))]
mod mock;
mod traced;

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

pub use http::{HttpTransport, HttpTransportConfig};
#[cfg(any(test, feature = "testing"))]
pub use mock::{MockTransport, RecordedRequest};
pub use traced::TracedTransport;

use crate::error::Result;

/// HTTP method subset used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Methods that change server state and need the CSRF header.
    #[must_use]
    pub const fn is_unsafe(&self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved request
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<Value>,
}

impl ApiRequest {
    #[must_use]
    pub const fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            body: None,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Raw response: status plus decoded JSON body (absent for `204 No Content`)
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl ApiResponse {
    #[must_use]
    pub const fn new(status: u16, body: Option<Value>) -> Self {
        Self { status, body }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Async request executor
///
/// Implementations must return `Ok` for any response the server produced,
/// including error statuses; [`crate::ApiClient`] maps statuses to errors.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_as_str() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Patch.to_string(), "PATCH");
    }

    #[test]
    fn test_unsafe_methods() {
        assert!(!Method::Get.is_unsafe());
        assert!(Method::Post.is_unsafe());
        assert!(Method::Delete.is_unsafe());
    }

    #[test]
    fn test_response_success_range() {
        assert!(ApiResponse::new(204, None).is_success());
        assert!(!ApiResponse::new(301, None).is_success());
        assert!(!ApiResponse::new(403, None).is_success());
    }
}
