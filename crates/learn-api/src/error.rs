//! Error hierarchy for learn-api.
//!
//! Follows the "canonical error struct" pattern: callers classify failures
//! through `is_xxx()` predicates instead of matching on an internal kind.

use serde_json::Value;
use thiserror::Error;

/// Root error type for every API call.
///
/// The error is `Clone` so a single failed request can be handed to every
/// caller waiting on the same response.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}")]
pub struct ApiError {
    kind: ErrorKind,
}

/// Internal error classification.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub(crate) enum ErrorKind {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        status: u16,
        url: String,
        body: Option<Value>,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// A path or cursor could not be turned into a request URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    // ═══════════════════════════════════════════════════════════════════════
    // Constructors
    // ═══════════════════════════════════════════════════════════════════════

    /// Create error for a request that never reached the server.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Transport(message.into()),
        }
    }

    /// Create error for a non-2xx response.
    #[must_use]
    pub fn status(status: u16, url: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            kind: ErrorKind::Status {
                status,
                url: url.into(),
                body,
            },
        }
    }

    /// Create error for an undecodable response body.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Decode(message.into()),
        }
    }

    /// Create error for an unusable URL.
    #[must_use]
    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidUrl(message.into()),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Predicate Methods (is_xxx)
    // ═══════════════════════════════════════════════════════════════════════

    /// Returns true if no response was received.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self.kind, ErrorKind::Transport(_))
    }

    /// Returns true if the server answered with an error status.
    #[must_use]
    pub const fn is_status(&self) -> bool {
        matches!(self.kind, ErrorKind::Status { .. })
    }

    /// Returns true if the response body could not be decoded.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self.kind, ErrorKind::Decode(_))
    }

    /// Returns true if the request URL was invalid.
    #[must_use]
    pub const fn is_invalid_url(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidUrl(_))
    }

    /// Returns true for `403 Forbidden`.
    #[must_use]
    pub const fn is_forbidden(&self) -> bool {
        matches!(self.kind, ErrorKind::Status { status: 403, .. })
    }

    /// Returns true for `404 Not Found`.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::Status { status: 404, .. })
    }

    /// Returns true for any 4xx status.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Status { status, .. } if status >= 400 && status < 500)
    }

    /// Returns true for any 5xx status.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Status { status, .. } if status >= 500)
    }

    /// Returns true if the request got as far as the server.
    ///
    /// Decode failures count: the server answered, only the body was off.
    #[must_use]
    pub const fn reached_server(&self) -> bool {
        matches!(self.kind, ErrorKind::Status { .. } | ErrorKind::Decode(_))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════════

    /// HTTP status code, if the server responded.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self.kind {
            ErrorKind::Status { status, .. } => Some(status),
            _ => None,
        }
    }

    /// Error body returned by the server, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        match &self.kind {
            ErrorKind::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        Self::invalid_url(err.to_string())
    }
}

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_transport_error() {
        let err = ApiError::transport("connection refused");
        assert!(err.is_transport());
        assert!(!err.is_status());
        assert!(err.status_code().is_none());
        assert!(err.to_string().contains("connection refused"));
        assert!(!err.reached_server());
    }

    #[test]
    fn test_status_forbidden() {
        let err = ApiError::status(403, "http://api/users/me/", None);
        assert!(err.is_status());
        assert!(err.is_forbidden());
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
        assert_eq!(err.status_code(), Some(403));
    }

    #[test]
    fn test_status_not_found() {
        let err = ApiError::status(404, "http://api/x/", None);
        assert!(err.is_not_found());
        assert!(!err.is_forbidden());
    }

    #[test]
    fn test_server_error() {
        let err = ApiError::status(502, "http://api/x/", Some(json!({"detail": "bad gateway"})));
        assert!(err.is_server_error());
        assert!(!err.is_client_error());
        assert!(err.reached_server());
        assert_eq!(err.body(), Some(&json!({"detail": "bad gateway"})));
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_decode_from_serde() {
        let serde_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: ApiError = serde_err.into();
        assert!(err.is_decode());
    }

    #[test]
    fn test_invalid_url_from_parse_error() {
        let err: ApiError = url::Url::parse("not a url").unwrap_err().into();
        assert!(err.is_invalid_url());
    }

    #[test]
    fn test_errors_are_cloneable() {
        let err = ApiError::status(500, "http://api/x/", None);
        assert_eq!(err.clone(), err);
    }
}
