//! User-level search operations over a [`MovieBackend`].
//!
//! [`try_search_movies`] dispatches a [`SearchParams`] to the right backend
//! call and propagates failures. The other helpers are what a page shows:
//! they never fail, and turn transport errors into an empty list, `None`,
//! or an apology string.

use tracing::warn;

use crate::Result;
use crate::client::MovieBackend;
use crate::types::{
    HybridSearchRequest, KeywordSearchRequest, Movie, SearchMode, SearchParams,
    SemanticSearchRequest,
};

/// Shown instead of a summary when summarization fails.
pub const SUMMARY_UNAVAILABLE: &str = "Sorry, the AI summary can't be generated right now.";

/// Shown instead of a summary when a search found nothing.
pub const NO_RESULTS_SUMMARY: &str = "No movies were found to summarize.";

/// Run the backend search selected by `params.mode`.
pub async fn try_search_movies(
    backend: &dyn MovieBackend,
    params: &SearchParams,
) -> Result<Vec<Movie>> {
    match params.mode {
        SearchMode::Keyword => {
            backend
                .keyword_search(&KeywordSearchRequest::from(params))
                .await
        }
        SearchMode::Semantic => {
            backend
                .semantic_search(&SemanticSearchRequest::from(params))
                .await
        }
        SearchMode::Hybrid => {
            backend
                .hybrid_search(&HybridSearchRequest::from(params))
                .await
        }
    }
}

/// Like [`try_search_movies`], but a failure yields no results.
pub async fn search_movies(backend: &dyn MovieBackend, params: &SearchParams) -> Vec<Movie> {
    match try_search_movies(backend, params).await {
        Ok(movies) => movies,
        Err(e) => {
            warn!(mode = %params.mode, query = params.trimmed_query(), error = %e, "movie search failed");
            Vec::new()
        }
    }
}

/// Look up one movie; `None` when it is missing or the backend fails.
pub async fn movie_by_id(backend: &dyn MovieBackend, id: &str) -> Option<Movie> {
    match backend.movie(id).await {
        Ok(movie) => Some(movie),
        Err(e) => {
            warn!(id, error = %e, "movie lookup failed");
            None
        }
    }
}

/// Summarize `movies` for `query`, falling back to [`SUMMARY_UNAVAILABLE`].
///
/// The returned text is raw backend output; run it through
/// [`sanitize`](crate::sanitize::sanitize) before display.
pub async fn search_summary(backend: &dyn MovieBackend, movies: &[Movie], query: &str) -> String {
    match backend.summarize(movies, query).await {
        Ok(response) if !response.summary.trim().is_empty() => response.summary,
        Ok(_) => {
            warn!(query, "backend returned an empty summary");
            SUMMARY_UNAVAILABLE.to_string()
        }
        Err(e) => {
            warn!(query, error = %e, "summary generation failed");
            SUMMARY_UNAVAILABLE.to_string()
        }
    }
}
