use std::time::Duration;

use thiserror::Error;

use crate::schema::ValidationError;

/// Coarse classification of every failure the client can surface.
///
/// Fieldless so callers can branch (or count) without matching on the
/// context carried by [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
pub enum ErrorKind {
    InvalidCredentials,
    RateLimited,
    AuthenticationFailed,
    Unauthenticated,
    SessionExpired,
    Timeout,
    ApiError,
    ValidationError,
}

/// Top-level error type for the `bbox-api` crate.
///
/// Covers the login flow, the authenticated read endpoints, transport
/// failures and response validation. Nothing in this crate retries;
/// the caller decides whether to re-authenticate and try again.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The router rejected the password (HTTP 401 on login).
    #[error("Invalid credentials -- the router rejected the password")]
    InvalidCredentials,

    /// Too many login attempts (HTTP 429 on login).
    #[error("Rate limit exceeded: {}", .reason.as_deref().unwrap_or("too many login attempts"))]
    RateLimited { reason: Option<String> },

    /// Login answered with any other non-200 status.
    #[error("Authentication failed with status {status}{}", with_reason(.reason.as_deref()))]
    AuthenticationFailed { status: u16, reason: Option<String> },

    /// A read was attempted before a successful login. Never sent over the wire.
    #[error("Not authenticated -- call authenticate() first")]
    Unauthenticated,

    /// The router answered 401 to an authenticated read.
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// The call did not complete within the configured timeout.
    #[error("Request to '{endpoint}' timed out after {}s", .timeout.as_secs_f64())]
    Timeout { endpoint: String, timeout: Duration },

    /// HTTP transport error (connection refused, DNS failure, reset, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Non-2xx status on an authenticated read.
    #[error("API error (HTTP {status}){}", with_reason(.detail.as_deref()))]
    Api { status: u16, detail: Option<String> },

    // ── Data ────────────────────────────────────────────────────────
    /// A 2xx body that is not JSON at all.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The JSON did not match the expected record shape.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

fn with_reason(reason: Option<&str>) -> String {
    reason.map(|r| format!(": {r}")).unwrap_or_default()
}

impl Error {
    /// The classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCredentials => ErrorKind::InvalidCredentials,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::AuthenticationFailed { .. } => ErrorKind::AuthenticationFailed,
            Self::Unauthenticated => ErrorKind::Unauthenticated,
            Self::SessionExpired => ErrorKind::SessionExpired,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Transport(_) | Self::InvalidUrl(_) | Self::Tls(_) | Self::Api { .. } => {
                ErrorKind::ApiError
            }
            Self::Deserialization { .. } | Self::Validation(_) => ErrorKind::ValidationError,
        }
    }

    /// Returns `true` if logging in again might resolve this error.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::Unauthenticated)
    }

    /// Returns `true` if the call exceeded the configured timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// HTTP status code associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::InvalidCredentials | Self::SessionExpired => Some(401),
            Self::RateLimited { .. } => Some(429),
            Self::AuthenticationFailed { status, .. } | Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_message_prefers_reason() {
        let err = Error::RateLimited {
            reason: Some("too many attempts".into()),
        };
        assert_eq!(err.to_string(), "Rate limit exceeded: too many attempts");

        let err = Error::RateLimited { reason: None };
        assert!(err.to_string().contains("too many login attempts"));
    }

    #[test]
    fn authentication_failed_carries_status_and_reason() {
        let err = Error::AuthenticationFailed {
            status: 503,
            reason: Some("maintenance".into()),
        };
        assert_eq!(
            err.to_string(),
            "Authentication failed with status 503: maintenance"
        );
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
    }

    #[test]
    fn timeout_reports_endpoint_and_duration() {
        let err = Error::Timeout {
            endpoint: "wan/ip/stats".into(),
            timeout: Duration::from_millis(1500),
        };
        assert_eq!(
            err.to_string(),
            "Request to 'wan/ip/stats' timed out after 1.5s"
        );
        assert!(err.is_timeout());
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }

    #[test]
    fn kinds_group_transport_failures_as_api_errors() {
        let err = Error::Api {
            status: 500,
            detail: None,
        };
        assert_eq!(err.kind(), ErrorKind::ApiError);
        assert_eq!(err.to_string(), "API error (HTTP 500)");

        let err = Error::Tls("bad pem".into());
        assert_eq!(err.kind(), ErrorKind::ApiError);
    }

    #[test]
    fn only_session_errors_suggest_reauthentication() {
        assert!(Error::SessionExpired.is_auth_expired());
        assert!(Error::Unauthenticated.is_auth_expired());
        assert!(!Error::InvalidCredentials.is_auth_expired());
        assert_eq!(ErrorKind::SessionExpired.to_string(), "SessionExpired");
    }
}
