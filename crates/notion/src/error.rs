//! Error types for the Notion gateway.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::retry::Retryable;

/// Errors returned by [`NotionClient`](crate::NotionClient) operations.
#[derive(Debug, Error)]
pub enum NotionError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection dropped while the response body was being read
    #[error("Failed to read Notion response body: {0}")]
    Body(#[source] reqwest::Error),

    /// Notion answered with a 5xx status
    #[error("Notion API server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Rate limited by Notion (HTTP 429)
    #[error("Rate limited by Notion API")]
    RateLimited { retry_after: Option<Duration> },

    /// Database or page does not exist, or is not shared with the integration
    #[error("Not found: {resource} ({message})")]
    NotFound { resource: String, message: String },

    /// Integration lacks access to the resource
    #[error("No access to {resource}: {message}")]
    Forbidden { resource: String, message: String },

    /// API key rejected
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Any other 4xx response (validation errors, conflicts, ...)
    #[error("Notion API error ({status} {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Response body did not have the expected shape
    #[error("Unexpected response from Notion API: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Client could not be built from the supplied settings
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

/// Coarse classification of a [`NotionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network trouble, timeouts, 5xx, 429. Worth retrying.
    Transient,
    /// 404
    NotFound,
    /// 403
    Forbidden,
    /// 401
    Unauthorized,
    /// Request or response the API will never accept as-is.
    Invalid,
}

/// Error body Notion sends with non-2xx responses.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl NotionError {
    /// Build an error from a non-success HTTP status and its raw body.
    #[must_use]
    pub fn from_status(
        status: u16,
        resource: &str,
        body: &str,
        retry_after: Option<Duration>,
    ) -> Self {
        let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = if parsed.message.is_empty() {
            body.trim().to_string()
        } else {
            parsed.message
        };

        match status {
            401 => Self::Unauthorized { message },
            403 => Self::Forbidden {
                resource: resource.to_string(),
                message,
            },
            404 => Self::NotFound {
                resource: resource.to_string(),
                message,
            },
            429 => Self::RateLimited { retry_after },
            500..=599 => Self::Server { status, message },
            _ => Self::Api {
                status,
                code: parsed.code,
                message,
            },
        }
    }

    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(e)
                if e.is_timeout() || e.is_connect() || e.is_request() || e.is_body() =>
            {
                ErrorKind::Transient
            }
            Self::Body(_) | Self::Server { .. } | Self::RateLimited { .. } => ErrorKind::Transient,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::Http(_)
            | Self::Api { .. }
            | Self::InvalidResponse(_)
            | Self::Serialization(_)
            | Self::Config(_) => ErrorKind::Invalid,
        }
    }

    /// Actionable hint for the user, when there is one.
    #[must_use]
    pub fn remediation(&self) -> Option<&'static str> {
        match self.kind() {
            ErrorKind::NotFound => {
                Some("Check the database ID and that the page is shared with your Notion integration")
            }
            ErrorKind::Forbidden => {
                Some("Grant your integration access to this database in Notion (Share → Invite)")
            }
            ErrorKind::Unauthorized => {
                Some("Check NOTION_API_KEY; create a key at https://www.notion.so/my-integrations")
            }
            ErrorKind::Transient | ErrorKind::Invalid => None,
        }
    }
}

impl Retryable for NotionError {
    fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_not_transient() {
        let body = r#"{"object":"error","status":404,"code":"object_not_found","message":"Could not find database"}"#;
        let err = NotionError::from_status(404, "database abc", body, None);

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(!err.is_transient());
        assert!(err.to_string().contains("Could not find database"));
        assert!(err.remediation().is_some());
    }

    #[test]
    fn test_forbidden_has_access_hint() {
        let err = NotionError::from_status(403, "database abc", "{}", None);
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert!(err.remediation().unwrap().contains("Grant"));
    }

    #[test]
    fn test_server_errors_are_transient() {
        for status in [500, 502, 503, 504] {
            let err = NotionError::from_status(status, "pages", "bad gateway", None);
            assert!(err.is_transient(), "status {status} should be transient");
        }
    }

    #[test]
    fn test_rate_limited_carries_retry_after() {
        let err = NotionError::from_status(429, "pages", "", Some(Duration::from_secs(2)));
        assert!(err.is_transient());
        assert_eq!(err.retry_after(), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_validation_error_keeps_code() {
        let body = r#"{"code":"validation_error","message":"body.parent should be defined"}"#;
        let err = NotionError::from_status(400, "pages", body, None);

        match &err {
            NotionError::Api { status, code, .. } => {
                assert_eq!(*status, 400);
                assert_eq!(code, "validation_error");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        assert_eq!(err.kind(), ErrorKind::Invalid);
        assert!(err.remediation().is_none());
    }
}
