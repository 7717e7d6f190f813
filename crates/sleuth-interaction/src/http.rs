//! HTTP helpers shared by the API backends.

use reqwest::{StatusCode, header::HeaderValue};
use sleuth_core::error::{SleuthError, UpstreamErrorKind};
use std::time::Duration;
use tracing::warn;

/// Default request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Builds a client with the given request timeout.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, SleuthError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| SleuthError::config(format!("Failed to build HTTP client: {}", e)))
}

/// Maps a failed send (no response received) to an upstream error.
pub fn map_transport_error(provider: &str, err: reqwest::Error) -> SleuthError {
    warn!(provider, error = %err, "Model API request failed");
    let kind = if err.is_connect() || err.is_timeout() || err.is_request() {
        UpstreamErrorKind::Unreachable
    } else {
        UpstreamErrorKind::ServiceError
    };
    SleuthError::upstream(kind, format!("{} API request failed: {}", provider, err))
}

/// Classifies a non-success status.
pub fn classify_status(status: StatusCode) -> UpstreamErrorKind {
    match status {
        StatusCode::TOO_MANY_REQUESTS => UpstreamErrorKind::RateLimited,
        StatusCode::REQUEST_TIMEOUT => UpstreamErrorKind::Unreachable,
        s if s.is_server_error() => UpstreamErrorKind::ServiceError,
        _ => UpstreamErrorKind::Rejected,
    }
}

/// Builds the upstream error for a non-success response.
pub fn map_http_error(
    provider: &str,
    status: StatusCode,
    message: String,
    retry_after: Option<Duration>,
) -> SleuthError {
    let kind = classify_status(status);
    warn!(provider, status = status.as_u16(), %kind, %message, "Model API returned an error");
    SleuthError::Upstream {
        kind,
        message: format!("{} API error ({}): {}", provider, status.as_u16(), message),
        retry_after_secs: retry_after.map(|d| d.as_secs()),
    }
}

/// Parses a `Retry-After` header given in seconds.
pub fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    // HTTP-date form is not supported
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
