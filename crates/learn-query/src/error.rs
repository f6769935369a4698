use learn_api::ApiError;
use thiserror::Error;

use crate::key::QueryKey;

/// Cache and mutation errors.
///
/// `Clone` because one failed fetch is handed to every waiter that joined it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(i64),

    #[error("Query {0} is disabled")]
    QueryDisabled(QueryKey),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    #[must_use]
    pub const fn is_api(&self) -> bool {
        matches!(self, Self::Api(_))
    }

    #[must_use]
    pub const fn is_invalid_identifier(&self) -> bool {
        matches!(self, Self::InvalidIdentifier(_))
    }

    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        matches!(self, Self::QueryDisabled(_))
    }

    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Underlying API error, if any.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Whether a read fetch failing with this error is worth another attempt.
    ///
    /// Client errors and bad identifiers fail the same way every time.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Api(err) => !err.is_client_error() && !err.is_decode(),
            _ => false,
        }
    }

    /// Whether a failed write may still have changed server state.
    ///
    /// Only a 5xx answer leaves that possibility open; a request that never
    /// arrived or was rejected with 4xx changed nothing.
    #[must_use]
    pub const fn may_have_side_effects(&self) -> bool {
        match self {
            Self::Api(err) => err.is_server_error(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_identifier_predicate() {
        let err = Error::InvalidIdentifier(-1);
        assert!(err.is_invalid_identifier());
        assert!(!err.is_api());
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "Invalid identifier: -1");
    }

    #[test]
    fn test_disabled_predicate() {
        let err = Error::QueryDisabled(QueryKey::new("learningResources").with("detail"));
        assert!(err.is_disabled());
        assert!(err.to_string().contains("learningResources"));
    }

    #[test]
    fn test_config_predicate() {
        let err = Error::Config("missing base_url".to_string());
        assert!(err.is_config());
        assert!(!err.is_decode());
    }

    #[test]
    fn test_api_error_conversion() {
        let err: Error = ApiError::status(404, "http://api/x/", None).into();
        assert!(err.is_api());
        assert!(err.api_error().unwrap().is_not_found());
    }

    #[test]
    fn test_retry_classification() {
        let server: Error = ApiError::status(503, "http://api/x/", None).into();
        let client: Error = ApiError::status(400, "http://api/x/", None).into();
        let transport: Error = ApiError::transport("reset").into();
        assert!(server.is_retryable());
        assert!(transport.is_retryable());
        assert!(!client.is_retryable());
    }

    #[test]
    fn test_side_effect_classification() {
        let server: Error = ApiError::status(500, "http://api/x/", None).into();
        let client: Error = ApiError::status(400, "http://api/x/", None).into();
        let transport: Error = ApiError::transport("reset").into();
        assert!(server.may_have_side_effects());
        assert!(!client.may_have_side_effects());
        assert!(!transport.may_have_side_effects());
    }

    #[test]
    fn test_decode_from_serde() {
        let err: Error = serde_json::from_str::<u32>("x").unwrap_err().into();
        assert!(err.is_decode());
    }
}
