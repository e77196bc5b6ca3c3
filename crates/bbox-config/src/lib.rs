//! Configuration for Bbox tools.
//!
//! One TOML file plus `BBOX_*` environment overrides, password resolution
//! (env + keyring + plaintext), and translation to `bbox_api::ClientConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use bbox_api::{ClientConfig, DEFAULT_BASE_URL, TlsMode};

/// Keyring service name the password is stored under.
pub const KEYRING_SERVICE: &str = "bbox";
/// Keyring user name the password is stored under.
pub const KEYRING_USER: &str = "password";
/// Environment variable checked after `password_env`.
pub const PASSWORD_ENV: &str = "BBOX_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no router password configured")]
    NoCredentials,

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// How the router's certificate is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsSetting {
    #[default]
    System,
    /// Accept any certificate, for a router reached by IP with its self-signed cert.
    Insecure,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// API root (e.g. "https://mabbox.bytel.fr/api/v1/").
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-call timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub tls: TlsSetting,

    /// PEM file with a CA to trust in addition to the system roots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Admin password in plaintext (prefer the keyring or an env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Name of an environment variable holding the password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            tls: TlsSetting::default(),
            ca_cert: None,
            password: None,
            password_env: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_timeout() -> u64 {
    10
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("fr", "bbox", "bbox").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("bbox");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading & saving ────────────────────────────────────────────────

/// Load the config from the canonical path plus environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the config from `path` plus environment.
///
/// A missing file is not an error; defaults and `BBOX_*` variables still
/// apply. `BBOX_PASSWORD` is left to [`resolve_password`] so it never ends
/// up in a saved file.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("BBOX_").ignore(&["password"]))
        .extract()?;
    Ok(config)
}

/// Write `cfg` as TOML to `path`, creating parent directories.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Password resolution ─────────────────────────────────────────────

/// Resolve the admin password.
///
/// Order: the variable named by `password_env`, `BBOX_PASSWORD`, the system
/// keyring, then the plaintext `password` from the file.
pub fn resolve_password(cfg: &Config) -> Result<SecretString, ConfigError> {
    // 1. Configured env var
    if let Some(ref env_name) = cfg.password_env {
        if let Ok(val) = std::env::var(env_name) {
            debug!(var = %env_name, "password from configured env var");
            return Ok(SecretString::from(val));
        }
    }

    // 2. Well-known env var
    if let Ok(val) = std::env::var(PASSWORD_ENV) {
        debug!("password from {PASSWORD_ENV}");
        return Ok(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER) {
        if let Ok(secret) = entry.get_password() {
            debug!("password from keyring");
            return Ok(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = cfg.password {
        debug!("password from config file");
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials)
}

/// Store the admin password in the system keyring.
pub fn store_password(password: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)?.set_password(password)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build the library's `ClientConfig` from a loaded config.
pub fn to_client_config(cfg: &Config) -> Result<ClientConfig, ConfigError> {
    if cfg.timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }

    let config = ClientConfig::new(&cfg.base_url).map_err(|_| ConfigError::Validation {
        field: "base_url".into(),
        reason: format!("invalid URL: {}", cfg.base_url),
    })?;

    let tls = match (cfg.tls, &cfg.ca_cert) {
        (TlsSetting::Insecure, _) => TlsMode::DangerAcceptInvalid,
        (TlsSetting::System, Some(ca)) => TlsMode::CustomCa(ca.clone()),
        (TlsSetting::System, None) => TlsMode::System,
    };

    Ok(config
        .with_timeout(Duration::from_secs(cfg.timeout))
        .with_tls(tls))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn defaults_without_file() {
        Jail::expect_with(|jail| {
            let cfg = load_config_from(&jail.directory().join("missing.toml")).unwrap();
            assert_eq!(cfg, Config::default());
            assert_eq!(cfg.base_url, "https://mabbox.bytel.fr/api/v1/");
            assert_eq!(cfg.timeout, 10);
            Ok(())
        });
    }

    #[test]
    fn file_then_env_overrides() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                base_url = "https://192.168.1.254/api/v1"
                timeout = 5
                tls = "insecure"
                "#,
            )?;
            jail.set_env("BBOX_TIMEOUT", "30");

            let cfg = load_config_from(&jail.directory().join("config.toml")).unwrap();
            assert_eq!(cfg.base_url, "https://192.168.1.254/api/v1");
            assert_eq!(cfg.timeout, 30);
            assert_eq!(cfg.tls, TlsSetting::Insecure);
            Ok(())
        });
    }

    #[test]
    fn password_env_is_not_loaded_into_config() {
        Jail::expect_with(|jail| {
            jail.set_env("BBOX_PASSWORD", "from-env");
            let cfg = load_config_from(&jail.directory().join("config.toml")).unwrap();
            assert_eq!(cfg.password, None);
            assert_eq!(resolve_password(&cfg).unwrap().expose_secret(), "from-env");
            Ok(())
        });
    }

    #[test]
    fn configured_env_var_wins() {
        Jail::expect_with(|jail| {
            jail.set_env("BBOX_PASSWORD", "generic");
            jail.set_env("MY_ROUTER_PW", "specific");
            let cfg = Config {
                password_env: Some("MY_ROUTER_PW".into()),
                password: Some("plaintext".into()),
                ..Config::default()
            };
            assert_eq!(resolve_password(&cfg).unwrap().expose_secret(), "specific");
            Ok(())
        });
    }

    #[test]
    fn translates_to_client_config() {
        let cfg = Config {
            base_url: "https://192.168.1.254/api/v1".into(),
            timeout: 3,
            tls: TlsSetting::Insecure,
            ..Config::default()
        };
        let client = to_client_config(&cfg).unwrap();
        assert_eq!(client.base_url.as_str(), "https://192.168.1.254/api/v1/");
        assert_eq!(client.timeout, Duration::from_secs(3));
        assert_eq!(client.tls, TlsMode::DangerAcceptInvalid);

        let cfg = Config {
            ca_cert: Some(PathBuf::from("/etc/bbox/ca.pem")),
            ..Config::default()
        };
        assert_eq!(
            to_client_config(&cfg).unwrap().tls,
            TlsMode::CustomCa(PathBuf::from("/etc/bbox/ca.pem"))
        );
    }

    #[test]
    fn rejects_bad_values() {
        let cfg = Config {
            timeout: 0,
            ..Config::default()
        };
        assert!(matches!(
            to_client_config(&cfg),
            Err(ConfigError::Validation { ref field, .. }) if field == "timeout"
        ));

        let cfg = Config {
            base_url: "not a url".into(),
            ..Config::default()
        };
        assert!(matches!(
            to_client_config(&cfg),
            Err(ConfigError::Validation { ref field, .. }) if field == "base_url"
        ));
    }

    #[test]
    fn saved_file_round_trips() {
        Jail::expect_with(|jail| {
            let path = jail.directory().join("nested").join("config.toml");
            let cfg = Config {
                timeout: 7,
                password_env: Some("ROUTER_PW".into()),
                ..Config::default()
            };
            save_config(&cfg, &path).unwrap();
            assert_eq!(load_config_from(&path).unwrap(), cfg);
            Ok(())
        });
    }
}
