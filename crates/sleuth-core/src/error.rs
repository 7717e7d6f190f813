//! Error types for Truth Sleuth.

use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

/// Classifies a failure of the external model service.
///
/// Transport-level problems and malformed responses are kept apart so that
/// callers can decide what is worth resubmitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
pub enum UpstreamErrorKind {
    /// The service could not be reached (connect failure, timeout).
    Unreachable,
    /// The service asked us to slow down (HTTP 429).
    RateLimited,
    /// The service failed on its side (HTTP 5xx).
    ServiceError,
    /// The service refused the request (other non-success statuses).
    Rejected,
    /// The service answered, but not with the expected schema.
    InvalidResponse,
}

impl UpstreamErrorKind {
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::Unreachable | Self::RateLimited | Self::ServiceError
        )
    }
}

/// A shared error type for the entire Truth Sleuth workspace.
///
/// NotFound is intentionally absent: a lookup miss is an `Option::None`,
/// never an error.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SleuthError {
    /// Caller-fixable input problem (empty claim, empty user id, no session).
    #[error("{0}")]
    Validation(String),

    /// The presented session token is unknown or has been revoked.
    #[error("Not signed in: {0}")]
    Unauthenticated(String),

    /// The model service failed or answered with a non-conforming shape.
    #[error("Upstream service error ({kind}): {message}")]
    Upstream {
        kind: UpstreamErrorKind,
        message: String,
        retry_after_secs: Option<u64>,
    },

    /// Persistence read/write failure.
    #[error("{0}")]
    Storage(String),

    /// The run was abandoned before it completed.
    #[error("Run cancelled: {0}")]
    Cancelled(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SleuthError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated(message.into())
    }

    /// Creates an Upstream error without a retry hint.
    pub fn upstream(kind: UpstreamErrorKind, message: impl Into<String>) -> Self {
        Self::Upstream {
            kind,
            message: message.into(),
            retry_after_secs: None,
        }
    }

    /// Creates an Upstream error for a response that does not match the schema.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::upstream(UpstreamErrorKind::InvalidResponse, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::Cancelled(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated(_))
    }

    /// Returns the upstream kind, if this is an upstream failure.
    pub fn upstream_kind(&self) -> Option<UpstreamErrorKind> {
        match self {
            Self::Upstream { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Whether resubmitting the same request might succeed.
    ///
    /// Nothing in the workspace retries on its own; this is a hint for the
    /// presentation layer.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Upstream { kind, .. } => kind.is_retryable(),
            Self::Storage(_) => true,
            _ => false,
        }
    }

    /// Short message suitable for showing to the end user.
    ///
    /// Validation messages are surfaced verbatim, everything else is
    /// summarised per category.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Unauthenticated(_) => "Please log in to continue.".to_string(),
            Self::Upstream { .. } => "Could not complete fact-check.".to_string(),
            Self::Storage(message) => message.clone(),
            Self::Cancelled(_) => "The fact-check was cancelled.".to_string(),
            Self::Config(message) => format!("Configuration problem: {}", message),
            Self::Internal(_) => "An unknown error occurred.".to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for SleuthError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for SleuthError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON error: {}", err))
    }
}

impl From<toml::de::Error> for SleuthError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("TOML parse error: {}", err))
    }
}

impl From<toml::ser::Error> for SleuthError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Config(format!("TOML serialization error: {}", err))
    }
}

/// Conversion from anyhow::Error, used at crate edges.
impl From<anyhow::Error> for SleuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, SleuthError>`.
pub type Result<T> = std::result::Result<T, SleuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_kinds() {
        assert!(UpstreamErrorKind::Unreachable.is_retryable());
        assert!(UpstreamErrorKind::RateLimited.is_retryable());
        assert!(UpstreamErrorKind::ServiceError.is_retryable());
        assert!(!UpstreamErrorKind::Rejected.is_retryable());
        assert!(!UpstreamErrorKind::InvalidResponse.is_retryable());
    }

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = SleuthError::validation("Claim cannot be empty.");
        assert_eq!(err.to_string(), "Claim cannot be empty.");
        assert_eq!(err.user_message(), "Claim cannot be empty.");
    }

    #[test]
    fn test_upstream_user_message_hides_details() {
        let err = SleuthError::invalid_response("missing field `articles`");
        assert!(err.is_upstream());
        assert!(!err.is_retryable());
        assert_eq!(err.upstream_kind(), Some(UpstreamErrorKind::InvalidResponse));
        assert_eq!(err.user_message(), "Could not complete fact-check.");
        assert!(err.to_string().contains("invalid_response"));
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SleuthError = io.into();
        assert!(err.is_storage());
    }
}
