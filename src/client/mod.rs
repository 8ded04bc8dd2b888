//! Clients for the external movie search backend.
//!
//! [`MovieBackend`] is the seam the rest of the crate talks to;
//! [`HttpBackend`] implements it over the backend's HTTP API. Tests and
//! embedders can substitute their own implementation.

mod http;

pub use http::{BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpBackend, KeywordEndpoint};

use async_trait::async_trait;

use crate::types::{
    HybridSearchRequest, KeywordSearchRequest, Movie, SemanticSearchRequest, SummaryResponse,
};
use crate::{ReelError, Result};

/// Operations offered by the search backend.
///
/// Search methods return movies in backend ranking order. Implementations
/// report transport and API failures as errors; turning those into
/// user-facing fallbacks is the caller's job (see [`crate::search`]).
#[async_trait]
pub trait MovieBackend: Send + Sync {
    /// Full-text search.
    async fn keyword_search(&self, request: &KeywordSearchRequest) -> Result<Vec<Movie>>;

    /// Meaning-based search.
    async fn semantic_search(&self, request: &SemanticSearchRequest) -> Result<Vec<Movie>>;

    /// Fetch a single movie by id.
    async fn movie(&self, id: &str) -> Result<Movie>;

    /// Summarize a result list for `query`.
    async fn summarize(&self, movies: &[Movie], query: &str) -> Result<SummaryResponse>;

    /// Combined keyword + semantic search.
    async fn hybrid_search(&self, _request: &HybridSearchRequest) -> Result<Vec<Movie>> {
        Err(ReelError::NotImplemented("hybrid_search"))
    }
}
