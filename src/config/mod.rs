//! Configuration system (layered: flags > env > config file > defaults).

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bon::Builder;
use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:6969";
pub const DEFAULT_COLLECTION: &str = "default";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

pub const ENV_URL: &str = "DELTAMEMORY_URL";
pub const ENV_API_KEY: &str = "DELTAMEMORY_API_KEY";
pub const ENV_COLLECTION: &str = "DELTAMEMORY_COLLECTION";
pub const ENV_TIMEOUT_MS: &str = "DELTAMEMORY_TIMEOUT_MS";
pub const ENV_CONFIG_PATH: &str = "DELTAMEMORY_CONFIG";

/// Connection settings for one protocol client.
///
/// Immutable once built; a [`crate::client::DeltaMemory`] takes ownership of
/// it and in-flight requests only ever read it.
///
/// ```
/// use std::time::Duration;
/// use deltamemory::config::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("http://memory.internal:6969")
///     .api_key("dm_secret")
///     .timeout(Duration::from_secs(5))
///     .build();
/// assert_eq!(config.default_collection(), "default");
/// ```
#[derive(Clone, Builder)]
pub struct ClientConfig {
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    base_url: String,
    #[builder(into)]
    api_key: Option<String>,
    #[builder(into, default = DEFAULT_COLLECTION.to_string())]
    default_collection: String,
    #[builder(default = DEFAULT_TIMEOUT)]
    timeout: Duration,
    #[builder(default)]
    headers: HashMap<String, String>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("default_collection", &self.default_collection)
            .field("timeout", &self.timeout)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ClientConfig {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn default_collection(&self) -> &str {
        &self.default_collection
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Load from the config file and environment, then apply `overrides`.
    ///
    /// The file is `$DELTAMEMORY_CONFIG` or `~/.deltamemory/config.toml`;
    /// a missing file is skipped.
    pub fn load(overrides: ConfigLayer) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let path = std::env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_config_path());

        let file = ConfigLayer::from_file(&path)?.unwrap_or_default();
        let env = ConfigLayer::from_lookup(|key| std::env::var(key).ok())?;

        Ok(file.merge(env).merge(overrides).build())
    }
}

/// A partial configuration from one source.
///
/// The same shape is read from the TOML file, the environment and CLI
/// flags, then merged in precedence order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub default_collection: Option<String>,
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl ConfigLayer {
    /// Read a TOML config file. Returns `Ok(None)` when it does not exist.
    pub fn from_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(ConfigError::File {
                    path: path.display().to_string(),
                    reason: err.to_string(),
                })
            }
        };
        let layer: Self = toml::from_str(&raw).map_err(|err| ConfigError::File {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        Ok(Some(layer))
    }

    /// Read `DELTAMEMORY_*` variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout_ms = non_empty(ENV_TIMEOUT_MS)
            .map(|raw| parse_timeout(&raw))
            .transpose()?;

        Ok(Self {
            base_url: non_empty(ENV_URL),
            api_key: non_empty(ENV_API_KEY),
            default_collection: non_empty(ENV_COLLECTION),
            timeout_ms,
            headers: HashMap::new(),
        })
    }

    /// Overlay `higher` on top of `self`; set values in `higher` win.
    pub fn merge(self, higher: Self) -> Self {
        let mut headers = self.headers;
        headers.extend(higher.headers);
        Self {
            base_url: higher.base_url.or(self.base_url),
            api_key: higher.api_key.or(self.api_key),
            default_collection: higher.default_collection.or(self.default_collection),
            timeout_ms: higher.timeout_ms.or(self.timeout_ms),
            headers,
        }
    }

    /// Fill unset values with defaults.
    pub fn build(self) -> ClientConfig {
        ClientConfig::builder()
            .maybe_base_url(self.base_url)
            .maybe_api_key(self.api_key)
            .maybe_default_collection(self.default_collection)
            .maybe_timeout(self.timeout_ms.map(Duration::from_millis))
            .headers(self.headers)
            .build()
    }
}

fn parse_timeout(raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(ms) => Ok(ms),
        Err(e) => Err(ConfigError::InvalidValue {
            key: ENV_TIMEOUT_MS.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn default_config_path() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".deltamemory"))
        .unwrap_or_else(|| PathBuf::from(".deltamemory"))
        .join("config.toml")
}
