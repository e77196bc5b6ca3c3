// Bbox API HTTP client
//
// Owns the session state and the connection, resolves endpoints against the
// base URL and executes authenticated requests. Login lives in `auth.rs`,
// the typed read endpoints in `device.rs`, `hosts.rs` and `wan.rs`, keeping
// this module focused on transport mechanics.

use std::future::Future;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::header::{ORIGIN, REFERER};
use reqwest::{Method, StatusCode};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, warn};
use url::Url;

use crate::auth::SessionState;
use crate::error::Error;
use crate::normalize;
use crate::transport::{TlsMode, TransportConfig};

/// Management API root of the router as reached from the home network.
pub const DEFAULT_BASE_URL: &str = "https://mabbox.bytel.fr/api/v1/";

/// Per-call timeout applied to login and to each read.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ── Configuration ────────────────────────────────────────────────────

/// Connection settings for a [`BboxClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root, always ending with `/`.
    pub base_url: Url,
    /// Bound on each network call (not cumulative across calls).
    pub timeout: Duration,
    /// TLS mode for the client built when none is supplied.
    pub tls: TlsMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: DEFAULT_TIMEOUT,
            tls: TlsMode::default(),
        }
    }
}

impl ClientConfig {
    /// Config for a given API root, with default timeout and TLS.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Ok(Self {
            base_url: normalize_base_url(Url::parse(base_url)?),
            ..Self::default()
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.tls = tls;
        self
    }

    /// `base_url` is public, so a hand-built config may lack the trailing `/`.
    fn normalized(mut self) -> Self {
        self.base_url = normalize_base_url(self.base_url);
        self
    }
}

/// Ensure the path ends with `/` so relative endpoints join beneath it.
pub fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

// ── Client ───────────────────────────────────────────────────────────

/// Where requests go out from.
enum Connection {
    /// Built by this client; dropped on [`BboxClient::close`].
    Owned {
        http: reqwest::Client,
        _cookie_jar: Arc<Jar>,
    },
    /// Supplied by the caller; never closed here.
    Shared(reqwest::Client),
}

impl Connection {
    fn http(&self) -> &reqwest::Client {
        match self {
            Self::Owned { http, .. } | Self::Shared(http) => http,
        }
    }
}

/// Authenticated client for the Bbox local management API.
///
/// One client holds one session. Every operation takes `&mut self`, so calls
/// on a single instance are serialized by construction; independent
/// instances share nothing and may run concurrently.
///
/// ```no_run
/// # async fn demo() -> Result<(), bbox_api::Error> {
/// use bbox_api::{BboxClient, ClientConfig};
///
/// let mut client = BboxClient::new("admin-password".to_string().into(), ClientConfig::default());
/// let mut session = client.session().await?;
/// let stats = session.get_wan_ip_stats().await?;
/// println!("down {} / up {}", stats.rx.bandwidth, stats.tx.bandwidth);
/// # Ok(())
/// # }
/// ```
pub struct BboxClient {
    pub(crate) config: ClientConfig,
    pub(crate) password: SecretString,
    connection: Option<Connection>,
    pub(crate) state: SessionState,
}

impl BboxClient {
    /// Create a client that builds (and owns) its HTTP connection on first login.
    pub fn new(password: SecretString, config: ClientConfig) -> Self {
        Self {
            config: config.normalized(),
            password,
            connection: None,
            state: SessionState::Unauthenticated,
        }
    }

    /// Create a client on top of a caller-supplied `reqwest::Client`.
    ///
    /// The client must have a cookie store enabled for the session to stick.
    /// It is borrowed for the lifetime of this instance and never closed by it.
    pub fn with_client(password: SecretString, config: ClientConfig, http: reqwest::Client) -> Self {
        Self {
            config: config.normalized(),
            password,
            connection: Some(Connection::Shared(http)),
            state: SessionState::Unauthenticated,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// `true` when logged in with a live connection.
    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated && self.connection.is_some()
    }

    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Authenticate and return a guard that closes the session when dropped.
    ///
    /// The guard dereferences to the client, so reads go straight through it.
    pub async fn session(&mut self) -> Result<Session<'_>, Error> {
        self.authenticate().await?;
        Ok(Session { client: self })
    }

    /// Release the connection if this client owns it and forget the session.
    ///
    /// A caller-supplied connection is kept as-is (and may be reused by a
    /// later login). Safe to call any number of times.
    pub fn close(&mut self) {
        match self.connection.take() {
            Some(Connection::Owned { .. }) => debug!("released owned connection"),
            Some(shared @ Connection::Shared(_)) => self.connection = Some(shared),
            None => {}
        }
        self.state = SessionState::Unauthenticated;
    }

    // ── URL & header helpers ─────────────────────────────────────────

    pub(crate) fn endpoint_url(&self, endpoint: &str) -> Result<Url, Error> {
        Ok(self.config.base_url.join(endpoint)?)
    }

    /// `Origin` header value: the base URL without its trailing `/`.
    pub(crate) fn origin(&self) -> String {
        self.config.base_url.as_str().trim_end_matches('/').to_owned()
    }

    /// The HTTP client to log in with, building an owned one if needed.
    pub(crate) fn ensure_connection(&mut self) -> Result<reqwest::Client, Error> {
        if let Some(conn) = &self.connection {
            return Ok(conn.http().clone());
        }

        debug!("creating owned connection with fresh cookie jar");
        let transport = TransportConfig::new(self.config.tls.clone(), self.config.timeout);
        let http = transport.build_client()?;
        self.connection = Some(Connection::Owned {
            http: http.clone(),
            _cookie_jar: Arc::clone(&transport.cookie_jar),
        });
        Ok(http)
    }

    /// Run one network exchange bounded by the configured timeout.
    pub(crate) async fn bounded<T>(
        &self,
        endpoint: &str,
        exchange: impl Future<Output = Result<T, reqwest::Error>>,
    ) -> Result<T, Error> {
        let timeout = self.config.timeout;
        match tokio::time::timeout(timeout, exchange).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) if e.is_timeout() => Err(timed_out(endpoint, timeout)),
            Ok(Err(e)) => {
                error!(endpoint, error = %e, "transport failure");
                Err(Error::Transport(e))
            }
            Err(_) => Err(timed_out(endpoint, timeout)),
        }
    }

    // ── Request executor ─────────────────────────────────────────────

    /// Issue an authenticated request and return the JSON body, with the
    /// single-element array envelope already unwrapped.
    ///
    /// Never logs in implicitly: without a session this fails with
    /// [`Error::Unauthenticated`] before touching the network. A 401 from
    /// the router drops the session and yields [`Error::SessionExpired`].
    pub async fn request(&mut self, method: Method, endpoint: &str) -> Result<Value, Error> {
        let http = match (&self.state, &self.connection) {
            (SessionState::Authenticated, Some(conn)) => conn.http().clone(),
            _ => return Err(Error::Unauthenticated),
        };

        let url = self.endpoint_url(endpoint)?;
        debug!(%method, %url, "request");

        let request = http
            .request(method, url)
            .header(REFERER, self.config.base_url.as_str())
            .header(ORIGIN, self.origin());

        let (status, body) = self
            .bounded(endpoint, async {
                let resp = request.send().await?;
                let status = resp.status();
                let body = resp.text().await?;
                Ok((status, body))
            })
            .await?;

        if status == StatusCode::UNAUTHORIZED {
            warn!(endpoint, "session expired, re-authentication required");
            self.state = SessionState::Unauthenticated;
            return Err(Error::SessionExpired);
        }

        if !status.is_success() {
            let detail = error_reason(&body).or_else(|| body_preview(&body));
            error!(endpoint, status = status.as_u16(), "request failed");
            return Err(Error::Api {
                status: status.as_u16(),
                detail,
            });
        }

        let data: Value = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", body_preview(&body).unwrap_or_default()),
            body: body.clone(),
        })?;

        Ok(normalize::unwrap_single(data))
    }
}

fn timed_out(endpoint: &str, timeout: Duration) -> Error {
    error!(endpoint, ?timeout, "request timed out");
    Error::Timeout {
        endpoint: endpoint.to_owned(),
        timeout,
    }
}

// ── Error body parsing ───────────────────────────────────────────────

/// The router reports failures as
/// `{"exception": {"errors": [{"reason": "..."}]}}`.
#[derive(Deserialize)]
struct ErrorBody {
    exception: ErrorException,
}

#[derive(Deserialize)]
struct ErrorException {
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    reason: Option<String>,
}

/// `exception.errors[0].reason`, if the body has that shape and it is non-empty.
pub(crate) fn error_reason(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .exception
        .errors
        .into_iter()
        .next()?
        .reason
        .filter(|r| !r.is_empty())
}

fn body_preview(body: &str) -> Option<String> {
    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.chars().take(200).collect())
}

// ── Scoped session ───────────────────────────────────────────────────

/// An authenticated [`BboxClient`] borrowed for a scope.
///
/// Dropping the guard closes the session on every exit path, including
/// early returns through `?`.
pub struct Session<'a> {
    client: &'a mut BboxClient,
}

impl Deref for Session<'_> {
    type Target = BboxClient;

    fn deref(&self) -> &BboxClient {
        self.client
    }
}

impl DerefMut for Session<'_> {
    fn deref_mut(&mut self) -> &mut BboxClient {
        self.client
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        self.client.close();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let config = ClientConfig::new("http://192.168.1.254/api/v1").unwrap();
        assert_eq!(config.base_url.as_str(), "http://192.168.1.254/api/v1/");

        let config = ClientConfig::new("http://192.168.1.254/api/v1/").unwrap();
        assert_eq!(config.base_url.as_str(), "http://192.168.1.254/api/v1/");
    }

    #[test]
    fn default_config_points_at_router() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn endpoints_resolve_under_base_and_origin_drops_slash() {
        let client = BboxClient::new(
            "pw".to_string().into(),
            ClientConfig::new("https://mabbox.bytel.fr/api/v1").unwrap(),
        );
        assert_eq!(
            client.endpoint_url("wan/ip/stats").unwrap().as_str(),
            "https://mabbox.bytel.fr/api/v1/wan/ip/stats"
        );
        assert_eq!(client.origin(), "https://mabbox.bytel.fr/api/v1");
    }

    #[test]
    fn hand_built_config_is_normalized_by_the_client() {
        let config = ClientConfig {
            base_url: Url::parse("http://192.168.1.254/api/v1").unwrap(),
            ..ClientConfig::default()
        };
        let client = BboxClient::new("pw".to_string().into(), config);
        assert_eq!(client.base_url().as_str(), "http://192.168.1.254/api/v1/");
        assert_eq!(
            client.endpoint_url("device").unwrap().as_str(),
            "http://192.168.1.254/api/v1/device"
        );
    }

    #[test]
    fn error_reason_extraction() {
        let body = r#"{"exception":{"errors":[{"reason":"too many attempts"}]}}"#;
        assert_eq!(error_reason(body).as_deref(), Some("too many attempts"));
        assert_eq!(error_reason(r#"{"exception":{"errors":[]}}"#), None);
        assert_eq!(error_reason(r#"{"exception":{"errors":[{"reason":""}]}}"#), None);
        assert_eq!(error_reason("<html>busy</html>"), None);
        assert_eq!(error_reason(r#"{"other":1}"#), None);
    }

    #[test]
    fn new_client_starts_unauthenticated() {
        let mut client = BboxClient::new("pw".to_string().into(), ClientConfig::default());
        assert_eq!(client.state(), SessionState::Unauthenticated);
        assert!(!client.is_authenticated());
        client.close();
        assert_eq!(client.state(), SessionState::Unauthenticated);
    }
}
