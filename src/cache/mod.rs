//! Session caching of search results.
//!
//! - [`key`]: [`CacheKey`] derivation from query and filters.
//! - [`store`]: the [`KeyValueStore`] seam plus [`MemoryStore`] and
//!   [`FileStore`].
//! - [`session`]: [`SessionCache`]: TTL, shape validation and the size
//!   fallback on top of a store.

pub mod key;
pub mod session;
pub mod store;

pub use key::{CacheKey, query_fingerprint};
pub use session::{CacheConfig, CacheEntry, CacheWrite, SessionCache, now_millis};
pub use store::{FileStore, KeyValueStore, MemoryStore};
