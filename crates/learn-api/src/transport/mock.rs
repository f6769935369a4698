//! In-process transport for tests
//!
//! Responses are registered per method and target. A target containing `?`
//! matches path and query exactly; otherwise only the path is compared.
//! Several responses registered for the same target are served in order,
//! the last one repeating.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use super::{ApiRequest, ApiResponse, Method, Transport};
use crate::error::{ApiError, Result};

/// A request observed by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
enum Canned {
    Response(ApiResponse),
    Failure(ApiError),
}

#[derive(Debug, Default)]
struct MockState {
    routes: HashMap<(Method, String), VecDeque<Canned>>,
    requests: Vec<RecordedRequest>,
}

/// Scriptable transport that never touches the network
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: Method, target: &str, canned: Canned) {
        self.state
            .lock()
            .routes
            .entry((method, target.to_string()))
            .or_default()
            .push_back(canned);
    }

    /// Register a JSON response
    pub fn respond(&self, method: Method, target: &str, status: u16, body: Value) {
        self.push(
            method,
            target,
            Canned::Response(ApiResponse::new(status, Some(body))),
        );
    }

    /// Register a response without a body (e.g. `204 No Content`)
    pub fn respond_empty(&self, method: Method, target: &str, status: u16) {
        self.push(method, target, Canned::Response(ApiResponse::new(status, None)));
    }

    /// Register a transport-level failure
    pub fn fail(&self, method: Method, target: &str, message: &str) {
        self.push(method, target, Canned::Failure(ApiError::transport(message)));
    }

    /// All requests observed so far, in order
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    /// Total number of requests observed
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.state.lock().requests.len()
    }

    /// Number of requests for a method and path (query ignored)
    #[must_use]
    pub fn call_count(&self, method: Method, path: &str) -> usize {
        self.state
            .lock()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Forget recorded requests, keep registered responses
    pub fn reset_requests(&self) {
        self.state.lock().requests.clear();
    }

    fn next_canned(&self, request: &ApiRequest) -> Option<Canned> {
        let path = request.url.path().to_string();
        let full = request
            .url
            .query()
            .map_or_else(|| path.clone(), |q| format!("{path}?{q}"));

        let mut state = self.state.lock();
        state.requests.push(RecordedRequest {
            method: request.method,
            path: path.clone(),
            query: request.url.query().map(ToString::to_string),
            body: request.body.clone(),
        });

        for target in [full, path] {
            if let Some(queue) = state.routes.get_mut(&(request.method, target)) {
                return if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                };
            }
        }
        None
    }
}

/// Suspends exactly once so concurrent callers overlap deterministically
struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let canned = self.next_canned(&request);
        YieldOnce(false).await;

        match canned {
            Some(Canned::Response(response)) => Ok(response),
            Some(Canned::Failure(err)) => Err(err),
            None => Ok(ApiResponse::new(
                404,
                Some(serde_json::json!({"detail": "no mock registered"})),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use url::Url;

    use super::*;

    fn get(url: &str) -> ApiRequest {
        ApiRequest::new(Method::Get, Url::parse(url).unwrap())
    }

    #[tokio::test]
    async fn test_unregistered_route_is_404() {
        let mock = MockTransport::new();
        let response = mock.send(get("http://t/api/none/")).await.unwrap();
        assert_eq!(response.status, 404);
        assert_eq!(mock.total_calls(), 1);
    }

    #[tokio::test]
    async fn test_query_specific_route_wins() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/items/", 200, json!({"page": 1}));
        mock.respond(Method::Get, "/items/?offset=10", 200, json!({"page": 2}));

        let first = mock.send(get("http://t/items/")).await.unwrap();
        let second = mock.send(get("http://t/items/?offset=10")).await.unwrap();

        assert_eq!(first.body, Some(json!({"page": 1})));
        assert_eq!(second.body, Some(json!({"page": 2})));
        assert_eq!(mock.call_count(Method::Get, "/items/"), 2);
    }

    #[tokio::test]
    async fn test_responses_served_in_order_last_repeats() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/x/", 200, json!(1));
        mock.respond(Method::Get, "/x/", 200, json!(2));

        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(mock.send(get("http://t/x/")).await.unwrap().body);
        }
        assert_eq!(seen, vec![Some(json!(1)), Some(json!(2)), Some(json!(2))]);
    }

    #[tokio::test]
    async fn test_failure_is_transport_error() {
        let mock = MockTransport::new();
        mock.fail(Method::Post, "/x/", "connection reset");
        let request = ApiRequest::new(Method::Post, Url::parse("http://t/x/").unwrap());
        let err = mock.send(request).await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_records_body() {
        let mock = MockTransport::new();
        mock.respond_empty(Method::Patch, "/x/", 204);
        let request =
            ApiRequest::new(Method::Patch, Url::parse("http://t/x/").unwrap())
                .with_body(json!({"a": 1}));
        mock.send(request).await.unwrap();

        let recorded = mock.requests();
        assert_eq!(recorded[0].body, Some(json!({"a": 1})));
        mock.reset_requests();
        assert_eq!(mock.total_calls(), 0);
    }
}
