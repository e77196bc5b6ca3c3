// Password login and session state
//
// `POST login` with a form body sets the session cookie in the connection's
// jar; subsequent reads carry it automatically. Login is never retried here,
// the caller decides what to do with each failure kind.

use reqwest::StatusCode;
use reqwest::header::{ORIGIN, REFERER};
use secrecy::ExposeSecret;
use tracing::{debug, warn};

use crate::client::{BboxClient, error_reason};
use crate::error::Error;

pub const LOGIN_ENDPOINT: &str = "login";

/// Session state of one client.
///
/// `Unauthenticated` → `Authenticated` on a successful login, back to
/// `Unauthenticated` when a read gets a 401 or the client is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticated,
}

impl BboxClient {
    /// Log in with the configured password.
    ///
    /// No-op when already authenticated. On failure the state is left
    /// untouched: HTTP 401 yields [`Error::InvalidCredentials`], 429 yields
    /// [`Error::RateLimited`] with the router's reason when it gives one, and
    /// any other status yields [`Error::AuthenticationFailed`].
    pub async fn authenticate(&mut self) -> Result<(), Error> {
        if self.is_authenticated() {
            debug!("already authenticated");
            return Ok(());
        }

        let http = self.ensure_connection()?;
        let url = self.endpoint_url(LOGIN_ENDPOINT)?;

        debug!("logging in at {}", url);

        let form = [
            ("password", self.password.expose_secret()),
            ("remember", "1"),
        ];
        let request = http
            .post(url.clone())
            .header(REFERER, url.as_str())
            .header(ORIGIN, self.origin())
            .form(&form);

        let (status, body) = self
            .bounded(LOGIN_ENDPOINT, async {
                let resp = request.send().await?;
                let status = resp.status();
                // Only failures need the body, for the error reason.
                let body = if status == StatusCode::OK {
                    String::new()
                } else {
                    resp.text().await?
                };
                Ok((status, body))
            })
            .await?;

        if status == StatusCode::OK {
            self.state = SessionState::Authenticated;
            debug!("login successful");
            return Ok(());
        }

        Err(login_failure(status, &body))
    }
}

/// Classify a non-200 login response.
pub(crate) fn login_failure(status: StatusCode, body: &str) -> Error {
    match status {
        StatusCode::UNAUTHORIZED => {
            warn!("login rejected: invalid credentials");
            Error::InvalidCredentials
        }
        StatusCode::TOO_MANY_REQUESTS => {
            let reason = error_reason(body);
            warn!(reason = reason.as_deref().unwrap_or_default(), "login rate limited");
            Error::RateLimited { reason }
        }
        other => {
            warn!(status = other.as_u16(), "login failed");
            Error::AuthenticationFailed {
                status: other.as_u16(),
                reason: error_reason(body),
            }
        }
    }
}
