//! Top-level application configuration.
//!
//! Configuration is stored in `.termbase/config.yaml` and includes:
//! - Glossary server location (base URL and API root)
//! - Optional credentials sent as `x-auth-user` / `x-auth-token`
//! - Default locales
//! - Prefetch and page cache tuning
//!
//! The configuration is an explicit value passed to whatever needs it
//! (see `HttpGateway::from_config`); nothing reads it from global state.

use std::env;
use std::fmt;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, TermbaseError};
use crate::types::{
    DEFAULT_DEBOUNCE_MS, DEFAULT_PREFETCH_THRESHOLD, DEFAULT_SRC_LOCALE, TERMBASE_DIR,
};

pub const ENV_BASE_URL: &str = "TERMBASE_BASE_URL";
pub const ENV_AUTH_USER: &str = "TERMBASE_AUTH_USER";
pub const ENV_AUTH_TOKEN: &str = "TERMBASE_AUTH_TOKEN";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    /// Authentication credentials
    #[serde(default, skip_serializing_if = "AuthConfig::is_empty")]
    pub auth: AuthConfig,

    #[serde(default)]
    pub locale: LocaleConfig,

    #[serde(default)]
    pub prefetch: PrefetchConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

/// Glossary server location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Path prefix of the REST API (default: /rest)
    #[serde(default = "default_api_root")]
    pub api_root: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub timeout: u64,
}

fn default_api_root() -> String {
    "/rest".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_root: default_api_root(),
            timeout: default_request_timeout(),
        }
    }
}

/// Credentials as stored on disk
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AuthConfig {
    pub fn is_empty(&self) -> bool {
        self.user.is_none() && self.token.is_none()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("user", &self.user)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Resolved credentials for outgoing requests. The token never leaves the
/// `SecretString` except when a header is built.
pub struct Credentials {
    pub user: String,
    pub token: SecretString,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleConfig {
    #[serde(default = "default_src_locale")]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

fn default_src_locale() -> String {
    DEFAULT_SRC_LOCALE.to_string()
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            source: default_src_locale(),
            target: None,
        }
    }
}

/// Scroll prefetch tuning
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PrefetchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_threshold")]
    pub threshold: usize,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_threshold() -> usize {
    DEFAULT_PREFETCH_THRESHOLD
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            threshold: default_threshold(),
        }
    }
}

impl PrefetchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Page cache eviction policy. Without `max_pages` every loaded page is kept
/// for the whole session.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<NonZeroUsize>,
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        PathBuf::from(TERMBASE_DIR).join("config.yaml")
    }

    /// Load configuration from the default location, or return the default
    /// configuration if no file exists
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            TermbaseError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Server base URL from the environment or the config file
    pub fn base_url(&self) -> Result<Url> {
        let raw = match env::var(ENV_BASE_URL) {
            Ok(url) if !url.is_empty() => url,
            _ => self.server.base_url.clone().ok_or_else(|| {
                TermbaseError::Config(format!(
                    "server base URL not configured. Set {ENV_BASE_URL} or run: termbase config set server.base_url <url>"
                ))
            })?,
        };
        Ok(Url::parse(&raw)?)
    }

    /// Full URL of the REST API root, always ending in `/` so endpoint paths
    /// can be joined onto it.
    pub fn api_url(&self) -> Result<Url> {
        let base = self.base_url()?;
        let root = self.server.api_root.trim_matches('/');
        let mut path = base.path().trim_end_matches('/').to_string();
        if !root.is_empty() {
            path.push('/');
            path.push_str(root);
        }
        path.push('/');

        let mut url = base;
        url.set_path(&path);
        Ok(url)
    }

    /// Credentials from the environment, falling back to the config file.
    /// Both a user and a token are required; otherwise requests go out
    /// unauthenticated.
    pub fn credentials(&self) -> Option<Credentials> {
        let user = non_empty_env(ENV_AUTH_USER).or_else(|| self.auth.user.clone())?;
        let token = non_empty_env(ENV_AUTH_TOKEN).or_else(|| self.auth.token.clone())?;
        Some(Credentials {
            user,
            token: SecretString::from(token),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout)
    }

    /// Set a value by dotted key, as used by `termbase config set`
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "server.base_url" => {
                Url::parse(value)?;
                self.server.base_url = Some(value.to_string());
            }
            "server.api_root" => self.server.api_root = value.to_string(),
            "server.timeout" => self.server.timeout = parse_value(key, value)?,
            "auth.user" => self.auth.user = Some(value.to_string()),
            "auth.token" => self.auth.token = Some(value.to_string()),
            "locale.source" => self.locale.source = value.to_string(),
            "locale.target" => {
                self.locale.target = (!value.is_empty()).then(|| value.to_string())
            }
            "prefetch.debounce_ms" => self.prefetch.debounce_ms = parse_value(key, value)?,
            "prefetch.threshold" => self.prefetch.threshold = parse_value(key, value)?,
            "cache.max_pages" => {
                self.cache.max_pages = if value == "0" || value.is_empty() {
                    None
                } else {
                    Some(parse_value(key, value)?)
                }
            }
            _ => {
                return Err(TermbaseError::Config(format!(
                    "unknown config key '{key}'"
                )));
            }
        }
        Ok(())
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse::<T>().map_err(|_| {
        TermbaseError::Config(format!("invalid value '{value}' for {key}"))
    })
}
