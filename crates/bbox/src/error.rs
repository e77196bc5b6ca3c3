//! CLI error types with miette diagnostics.
//!
//! Maps library and config errors into user-facing errors with help text
//! and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use bbox_api::ErrorKind;
use bbox_config::ConfigError;

pub mod exit_code {
    pub const INVALID_RESPONSE: i32 = 1;
    pub const CONFIG: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const API: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {reason}")]
    #[diagnostic(
        code(bbox::auth_failed),
        help(
            "Check the admin password of the router.\n\
             Store it with: bbox config set-password\n\
             Or set the BBOX_PASSWORD environment variable."
        )
    )]
    AuthFailed { reason: String },

    #[error("{reason}")]
    #[diagnostic(
        code(bbox::rate_limited),
        help("The router locks logins after repeated failures. Wait a few minutes and retry.")
    )]
    RateLimited { reason: String },

    #[error("No router password configured")]
    #[diagnostic(
        code(bbox::no_credentials),
        help(
            "Store it with: bbox config set-password\n\
             Or set BBOX_PASSWORD, or `password_env` in {path}"
        )
    )]
    NoCredentials { path: String },

    // ── Network ──────────────────────────────────────────────────────

    #[error("Could not reach the router")]
    #[diagnostic(
        code(bbox::connection_failed),
        help(
            "Check that you are on the router's network.\n\
             Reached by IP the router presents a self-signed certificate: try --insecure (-k)."
        )
    )]
    ConnectionFailed {
        #[source]
        source: bbox_api::Error,
    },

    #[error("{reason}")]
    #[diagnostic(
        code(bbox::timeout),
        help("Increase the timeout with --timeout or in the config file.")
    )]
    Timeout { reason: String },

    // ── Router responses ─────────────────────────────────────────────

    #[error("Router returned HTTP {status}: {message}")]
    #[diagnostic(code(bbox::api_error))]
    ApiError { status: u16, message: String },

    #[error("Unexpected response from the router")]
    #[diagnostic(
        code(bbox::invalid_response),
        help("The firmware may have changed its response format. Run with -vv for details.")
    )]
    InvalidResponse {
        #[source]
        source: bbox_api::Error,
    },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(bbox::validation))]
    Validation { field: String, reason: String },

    #[error("{source}")]
    #[diagnostic(code(bbox::config), help("Config file: {path}"))]
    Config {
        path: String,
        #[source]
        source: ConfigError,
    },

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthFailed { .. } | Self::RateLimited { .. } | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::ApiError { .. } => exit_code::API,
            Self::InvalidResponse { .. } | Self::Io(_) => exit_code::INVALID_RESPONSE,
            Self::Validation { .. } | Self::Config { .. } => exit_code::CONFIG,
        }
    }
}

// ── Library error mapping ────────────────────────────────────────────

impl From<bbox_api::Error> for CliError {
    fn from(err: bbox_api::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidCredentials
            | ErrorKind::AuthenticationFailed
            | ErrorKind::Unauthenticated
            | ErrorKind::SessionExpired => Self::AuthFailed {
                reason: err.to_string(),
            },
            ErrorKind::RateLimited => Self::RateLimited {
                reason: err.to_string(),
            },
            ErrorKind::Timeout => Self::Timeout {
                reason: err.to_string(),
            },
            ErrorKind::ValidationError => Self::InvalidResponse { source: err },
            ErrorKind::ApiError => match err {
                bbox_api::Error::Api { status, detail } => Self::ApiError {
                    status,
                    message: detail.unwrap_or_else(|| "no details".into()),
                },
                other => Self::ConnectionFailed { source: other },
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        let path = bbox_config::config_path().display().to_string();
        match err {
            ConfigError::NoCredentials => Self::NoCredentials { path },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config {
                path,
                source: other,
            },
        }
    }
}
