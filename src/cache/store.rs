//! Key-value stores backing the session cache.
//!
//! [`KeyValueStore`] is the seam between [`SessionCache`](super::SessionCache)
//! and wherever serialized entries physically live. Two implementations ship:
//!
//! - [`MemoryStore`]: moka-backed, bounded by total bytes. Used by
//!   long-running processes and as the test fake.
//! - [`FileStore`]: one file per key in a directory, so a terminal session
//!   keeps its cache between invocations.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use moka::sync::Cache;
use sha2::{Digest, Sha256};

use crate::{ReelError, Result};

/// Default byte quota of a [`MemoryStore`], in line with browser session storage.
pub const DEFAULT_STORE_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Synchronous string key-value storage.
///
/// Implementations must be internally synchronized. Errors are reported,
/// never panicked; the session cache decides how to degrade.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `Ok(None)` if absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// In-memory store bounded by total key + value bytes.
///
/// When full, least-recently-used entries are evicted. A single value that
/// could never fit is rejected with [`ReelError::QuotaExceeded`].
pub struct MemoryStore {
    entries: Cache<String, Arc<str>>,
    quota: usize,
}

impl MemoryStore {
    /// Create a store with [`DEFAULT_STORE_QUOTA_BYTES`].
    pub fn new() -> Self {
        Self::with_quota(DEFAULT_STORE_QUOTA_BYTES)
    }

    /// Create a store holding at most `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        let entries = Cache::builder()
            .max_capacity(quota as u64)
            .weigher(|key: &String, value: &Arc<str>| {
                u32::try_from(key.len() + value.len()).unwrap_or(u32::MAX)
            })
            .build();
        Self { entries, quota }
    }

    /// Byte quota this store was created with.
    pub fn quota(&self) -> usize {
        self.quota
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let size = key.len() + value.len();
        if size > self.quota {
            return Err(ReelError::QuotaExceeded {
                size,
                quota: self.quota,
            });
        }
        self.entries.insert(key.to_string(), Arc::from(value));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.invalidate(key);
        Ok(())
    }
}

/// Encoded file names longer than this are shortened with a hash suffix.
const MAX_FILE_STEM_LEN: usize = 180;

/// Directory-backed store: each key is one JSON file.
///
/// Writes go through a temporary file and a rename so readers never see a
/// half-written value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            ReelError::Storage(format!("failed to create cache dir {}: {e}", dir.display()))
        })?;
        Ok(Self { dir })
    }

    /// Default location: `~/.cache/reelsearch/session` (platform cache dir).
    pub fn default_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("reelsearch")
            .join("session")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, value).map_err(|e| {
            ReelError::Storage(format!("failed to write {}: {e}", tmp_path.display()))
        })?;
        std::fs::rename(&tmp_path, &path).map_err(|e| {
            ReelError::Storage(format!(
                "failed to rename {} → {}: {e}",
                tmp_path.display(),
                path.display()
            ))
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Filesystem-safe rendering of a cache key.
///
/// Bytes outside `[A-Za-z0-9._,-]` are written as `%XX`. Over-long names keep
/// a readable prefix and end in a hash of the full key.
fn file_stem(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for b in key.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b',') {
            stem.push(b as char);
        } else {
            stem.push_str(&format!("%{b:02X}"));
        }
    }
    if stem.len() <= MAX_FILE_STEM_LEN {
        return stem;
    }

    // Entries outlive the process: the suffix must be stable across builds.
    let digest = format!("{:x}", Sha256::digest(key.as_bytes()));
    // Cut on a char boundary; the stem is ASCII so any index is one.
    stem.truncate(MAX_FILE_STEM_LEN - 17);
    format!("{stem}~{}", &digest[..16])
}
