//! Session cache of combined search results.
//!
//! Stores one [`CacheEntry`] (movies + cleaned summary) per [`CacheKey`] in
//! an injected [`KeyValueStore`]. The cache never fails a search: corrupt or
//! stale entries read as misses and are deleted, storage errors degrade to
//! "no cache", and oversized payloads are shrunk or skipped.
//!
//! # Size fallback
//!
//! Before writing, the entry is serialized and measured. Above
//! [`CacheConfig::max_bytes`] the movies are replaced by their
//! [`Movie::reduced`] form and the entry is flagged `isReduced`. If even
//! that does not fit, nothing is written and [`ReelError::CacheTooLarge`]
//! is returned for the caller to log.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::key::CacheKey;
use super::store::KeyValueStore;
use crate::telemetry;
use crate::types::Movie;
use crate::{ReelError, Result};

/// Largest serialized entry the cache will write: 4 MiB.
pub const DEFAULT_MAX_ENTRY_BYTES: usize = 4 * 1024 * 1024;

/// Configuration for the session cache.
///
/// ```rust
/// # use reelsearch::cache::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .ttl(Duration::from_secs(600))
///     .max_bytes(1024 * 1024);
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long an entry stays fresh. Default: 1 hour.
    pub ttl: Duration,
    /// Size ceiling for one serialized entry. Default: 4 MiB.
    pub max_bytes: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600),
            max_bytes: DEFAULT_MAX_ENTRY_BYTES,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the freshness window.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the per-entry size ceiling.
    pub fn max_bytes(mut self, bytes: usize) -> Self {
        self.max_bytes = bytes;
        self
    }
}

/// A cached search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub movies: Vec<Movie>,
    pub summary: String,
    /// Write time, milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// `movies` holds only the fields kept by [`Movie::reduced`].
    #[serde(rename = "isReduced", default)]
    pub is_reduced: bool,
}

/// Borrowed view of an entry, so writes don't clone the movie list.
#[derive(Serialize)]
struct EntryRef<'a> {
    movies: &'a [Movie],
    summary: &'a str,
    timestamp: u64,
    #[serde(rename = "isReduced")]
    is_reduced: bool,
}

/// How a successful [`SessionCache::set`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheWrite {
    /// The full entry was stored.
    Full,
    /// The entry exceeded the ceiling; a reduced entry was stored.
    Reduced,
    /// Nothing to store (no movies).
    Skipped,
    /// No store is configured.
    Disabled,
}

/// Session-scoped search result cache.
#[derive(Clone)]
pub struct SessionCache {
    store: Option<Arc<dyn KeyValueStore>>,
    config: CacheConfig,
}

impl SessionCache {
    /// Cache backed by `store`.
    pub fn new(store: Arc<dyn KeyValueStore>, config: CacheConfig) -> Self {
        Self {
            store: Some(store),
            config,
        }
    }

    /// Cache with no backing store: every read misses, every write is a no-op.
    pub fn disabled() -> Self {
        Self {
            store: None,
            config: CacheConfig::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Look up a fresh, well-formed entry.
    ///
    /// Corrupt and expired entries are removed and reported as misses.
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let Some(store) = &self.store else {
            record_miss("disabled");
            return None;
        };

        let raw = match store.get(key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                record_miss("absent");
                return None;
            }
            Err(e) => {
                warn!(%key, error = %e, "session cache read failed");
                record_miss("unavailable");
                return None;
            }
        };

        let entry = match parse_entry(&raw) {
            Ok(entry) => entry,
            Err(reason) => {
                debug!(%key, %reason, "discarding corrupt cache entry");
                self.remove_quietly(store.as_ref(), key);
                record_miss("corrupt");
                return None;
            }
        };

        let age = now_millis().saturating_sub(entry.timestamp);
        if u128::from(age) > self.config.ttl.as_millis() {
            debug!(%key, age_ms = age, "discarding expired cache entry");
            self.remove_quietly(store.as_ref(), key);
            record_miss("expired");
            return None;
        }

        metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
        Some(entry)
    }

    /// Store `movies` and `summary` under `key`, stamped with the current time.
    ///
    /// Empty movie lists are never cached. Storage failures are returned as
    /// errors for the caller to log; they are never fatal.
    pub fn set(&self, key: &CacheKey, movies: &[Movie], summary: &str) -> Result<CacheWrite> {
        let Some(store) = &self.store else {
            return Ok(CacheWrite::Disabled);
        };
        if movies.is_empty() {
            record_write("skipped");
            return Ok(CacheWrite::Skipped);
        }

        let timestamp = now_millis();
        let full = serde_json::to_string(&EntryRef {
            movies,
            summary,
            timestamp,
            is_reduced: false,
        })?;

        let (payload, outcome) = if full.len() <= self.config.max_bytes {
            (full, CacheWrite::Full)
        } else {
            let reduced: Vec<Movie> = movies.iter().map(Movie::reduced).collect();
            let payload = serde_json::to_string(&EntryRef {
                movies: &reduced,
                summary,
                timestamp,
                is_reduced: true,
            })?;
            if payload.len() > self.config.max_bytes {
                record_write("failed");
                return Err(ReelError::CacheTooLarge {
                    size: payload.len(),
                    limit: self.config.max_bytes,
                });
            }
            debug!(%key, full_bytes = full.len(), reduced_bytes = payload.len(), "caching reduced entry");
            (payload, CacheWrite::Reduced)
        };

        if let Err(e) = store.set(key.as_str(), &payload) {
            record_write("failed");
            return Err(e);
        }
        record_write(match outcome {
            CacheWrite::Reduced => "reduced",
            _ => "full",
        });
        Ok(outcome)
    }

    /// Drop the entry for `key`, if any.
    pub fn invalidate(&self, key: &CacheKey) {
        if let Some(store) = &self.store {
            self.remove_quietly(store.as_ref(), key);
        }
    }

    fn remove_quietly(&self, store: &dyn KeyValueStore, key: &CacheKey) {
        if let Err(e) = store.remove(key.as_str()) {
            warn!(%key, error = %e, "session cache remove failed");
        }
    }
}

/// Validate the stored shape before trusting it.
fn parse_entry(raw: &str) -> std::result::Result<CacheEntry, String> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    if !value.get("movies").is_some_and(serde_json::Value::is_array) {
        return Err("movies is not an array".to_string());
    }
    if !value.get("summary").is_some_and(serde_json::Value::is_string) {
        return Err("summary is not a string".to_string());
    }
    if !value.get("timestamp").is_some_and(serde_json::Value::is_u64) {
        return Err("timestamp is missing".to_string());
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}

fn record_miss(reason: &'static str) {
    metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "reason" => reason).increment(1);
}

fn record_write(outcome: &'static str) {
    metrics::counter!(telemetry::CACHE_WRITES_TOTAL, "outcome" => outcome).increment(1);
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
