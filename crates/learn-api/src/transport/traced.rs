//! Traced transport wrapper for observability

use std::time::Instant;

use async_trait::async_trait;
use tracing::Instrument;

use super::{ApiRequest, ApiResponse, Transport};
use crate::error::Result;

/// Wrapper that adds tracing to any `Transport`
///
/// Only the path is recorded; query strings may carry search terms.
pub struct TracedTransport<T> {
    inner: T,
    service_name: String,
}

impl<T: std::fmt::Debug> std::fmt::Debug for TracedTransport<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TracedTransport")
            .field("inner", &self.inner)
            .field("service_name", &self.service_name)
            .finish()
    }
}

impl<T: Clone> Clone for TracedTransport<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            service_name: self.service_name.clone(),
        }
    }
}

impl<T> TracedTransport<T> {
    pub fn new(transport: T, service_name: impl Into<String>) -> Self {
        Self {
            inner: transport,
            service_name: service_name.into(),
        }
    }

    pub const fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: Transport> Transport for TracedTransport<T> {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let method = request.method;
        let path = request.url.path().to_string();
        let span = tracing::debug_span!(
            "http.request",
            http.method = method.as_str(),
            http.path = %path,
            service = %self.service_name,
            otel.name = "http.request",
        );

        let started = Instant::now();
        let result = self.inner.send(request).instrument(span).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(response) if response.is_success() => {
                tracing::debug!(
                    http.method = method.as_str(),
                    http.path = %path,
                    http.status = response.status,
                    elapsed_ms,
                );
            }
            Ok(response) => {
                tracing::warn!(
                    http.method = method.as_str(),
                    http.path = %path,
                    http.status = response.status,
                    elapsed_ms,
                    "request returned error status"
                );
            }
            Err(e) => {
                tracing::warn!(
                    http.method = method.as_str(),
                    http.path = %path,
                    error = %e,
                    elapsed_ms,
                    "request failed"
                );
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::transport::{Method, MockTransport};

    #[tokio::test]
    async fn test_traced_passes_through_response() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/api/v1/topics/", 200, json!({"results": []}));
        let traced = TracedTransport::new(mock.clone(), "test");

        let url = url::Url::parse("http://learn.test/api/v1/topics/").unwrap();
        let response = traced.send(ApiRequest::new(Method::Get, url)).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(mock.call_count(Method::Get, "/api/v1/topics/"), 1);
    }

    #[tokio::test]
    async fn test_traced_passes_through_error_status() {
        let mock = MockTransport::new();
        mock.respond(Method::Delete, "/api/v1/articles/1/", 500, json!({}));
        let traced = TracedTransport::new(mock, "test");

        let url = url::Url::parse("http://learn.test/api/v1/articles/1/").unwrap();
        let response = traced
            .send(ApiRequest::new(Method::Delete, url))
            .await
            .unwrap();

        assert_eq!(response.status, 500);
    }

    #[test]
    fn test_debug_includes_service_name() {
        let traced = TracedTransport::new(MockTransport::new(), "learn");
        assert!(format!("{traced:?}").contains("learn"));
    }
}
