//! Configuration loading for `reelsd` and `reel`.
//!
//! Configuration is loaded from TOML with the following resolution order:
//! 1. `--config <path>` (CLI flag; must exist)
//! 2. `~/.reelsearch/config.toml` (user)
//! 3. `/etc/reelsearch/config.toml` (system)
//! 4. Built-in defaults
//!
//! `REELSEARCH_API_URL` overrides `backend.base_url` whichever source is used.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::cache::{CacheConfig, FileStore, SessionCache};
use crate::client::{BASE_URL_ENV, DEFAULT_BASE_URL, HttpBackend, KeywordEndpoint};
use crate::{ReelError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub cache: CacheSettings,
}

/// Route surface configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3000).
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:3000".to_string()
}

/// Search backend connection.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub keyword_endpoint: KeywordEndpoint,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            keyword_endpoint: KeywordEndpoint::default(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Session cache settings (terminal client).
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Entry freshness in seconds (default: 3600).
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
    /// Largest serialized entry in bytes (default: 4 MiB).
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
    /// Session directory; defaults to the platform cache directory.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            ttl_secs: default_ttl(),
            max_bytes: default_max_bytes(),
            dir: None,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_ttl() -> u64 {
    CacheConfig::default().ttl.as_secs()
}

fn default_max_bytes() -> usize {
    CacheConfig::default().max_bytes
}

impl Config {
    /// Load configuration from the standard locations, then apply
    /// environment overrides.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path)?,
            None => Config::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ReelError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            ReelError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path; `None` means use defaults.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(ReelError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".reelsearch").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = PathBuf::from("/etc/reelsearch/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(BASE_URL_ENV)
            && !url.trim().is_empty()
        {
            self.backend.base_url = url;
        }
    }

    /// Build the HTTP backend client described by `[backend]`.
    pub fn http_backend(&self) -> Result<HttpBackend> {
        Ok(HttpBackend::with_timeout(
            &self.backend.base_url,
            Duration::from_secs(self.backend.timeout_secs),
        )?
        .keyword_endpoint(self.backend.keyword_endpoint))
    }

    /// Build a file-backed session cache described by `[cache]`.
    ///
    /// A cache directory that cannot be opened yields a disabled cache, so
    /// searches still run and simply always fetch.
    pub fn session_cache(&self) -> SessionCache {
        if !self.cache.enabled {
            return SessionCache::disabled();
        }
        let dir = self.cache.dir.clone().unwrap_or_else(FileStore::default_dir);
        let store = match FileStore::open(&dir) {
            Ok(store) => store,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "session cache unavailable, caching disabled");
                return SessionCache::disabled();
            }
        };
        let config = CacheConfig::new()
            .ttl(Duration::from_secs(self.cache.ttl_secs))
            .max_bytes(self.cache.max_bytes);
        SessionCache::new(Arc::new(store), config)
    }
}
