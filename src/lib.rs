//! reelsearch - movie search client
//!
//! This crate is the client side of a movie search product. It talks to an
//! external search backend (keyword, semantic and hybrid search plus AI
//! summaries) over HTTP, caches combined results per session, cleans
//! summaries before display, and sequences a search so results show up
//! before the summary is ready.
//!
//! # Search Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use reelsearch::cache::{CacheConfig, MemoryStore, SessionCache};
//! use reelsearch::client::HttpBackend;
//! use reelsearch::orchestrator::{SearchOrchestrator, SearchOutcome};
//! use reelsearch::{SearchFilters, SearchParams};
//!
//! #[tokio::main]
//! async fn main() -> reelsearch::Result<()> {
//!     let backend = Arc::new(HttpBackend::new("http://localhost:8000/api/v1")?);
//!     let cache = SessionCache::new(Arc::new(MemoryStore::new()), CacheConfig::default());
//!     let search = SearchOrchestrator::new(backend, cache);
//!
//!     let params = SearchParams::semantic("heist movies with a twist")
//!         .filters(SearchFilters::new().year_min(1990).genre("Crime"));
//!
//!     if let SearchOutcome::Fetched(summary) = search.search(params).await {
//!         println!("{} results", search.view().movies.len());
//!         summary.wait().await;
//!     }
//!     println!("{}", search.view().summary);
//!     Ok(())
//! }
//! ```
//!
//! # Cache Keys
//!
//! ```rust
//! use reelsearch::SearchFilters;
//! use reelsearch::cache::CacheKey;
//!
//! let a = CacheKey::new("inception", 10, &SearchFilters::new().genres(["Sci-Fi", "Action"]));
//! let b = CacheKey::new("inception", 10, &SearchFilters::new().genres(["Action", "Sci-Fi"]));
//! assert_eq!(a, b);
//! assert_eq!(a.as_str(), "cache-q-inception-s10-y0-0-r0-gAction,Sci-Fi");
//! ```
//!
//! # Summary Cleaning
//!
//! ```rust
//! use reelsearch::sanitize::sanitize;
//!
//! assert_eq!(sanitize("```markdown\nHello\n```"), "Hello");
//! assert_eq!(sanitize("<script>alert(1)</script>Text"), "Text");
//! ```

pub mod cache;
pub mod client;
#[cfg(any(feature = "server", feature = "client"))]
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod sanitize;
pub mod search;
#[cfg(feature = "server")]
pub mod server;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::{CacheKey, KeyValueStore, SessionCache};
pub use client::{HttpBackend, MovieBackend};
pub use error::{ReelError, Result};
pub use orchestrator::{SearchOrchestrator, SearchOutcome, SearchPhase, SearchView};

// Re-export all types
pub use types::{
    BackendFilters, HybridSearchRequest, HybridWeights, KeywordSearchRequest, Movie, RatingBound,
    SearchFilters, SearchMode, SearchParams, SemanticSearchRequest, SummaryRequest,
    SummaryResponse, TextList, YearRange,
};
