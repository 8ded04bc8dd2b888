//! HTTP route surface.
//!
//! Re-exposes backend search under `/api/v1/movies/...` for front-ends that
//! cannot reach the backend directly:
//!
//! - `GET /api/v1/movies/search`: keyword search from query-string params
//! - `POST /api/v1/movies/semantic`: semantic search from a JSON body
//!
//! Both answer with the backend's movie array, or HTTP 500 and
//! `{"error": "Failed to search movies"}`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{debug, error};

use crate::client::MovieBackend;
use crate::search::try_search_movies;
use crate::types::{DEFAULT_RESULT_SIZE, SearchFilters, SearchMode, SearchParams};

/// Body of every failed route response.
pub const SEARCH_FAILED: &str = "Failed to search movies";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    backend: Arc<dyn MovieBackend>,
}

impl AppState {
    pub fn new(backend: Arc<dyn MovieBackend>) -> Self {
        Self { backend }
    }
}

/// Build the route table.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/movies/search", get(keyword_search))
        .route("/api/v1/movies/semantic", post(semantic_search))
        .with_state(state)
}

/// Serve the routes on `listener` until the server fails.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}

async fn keyword_search(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let params = keyword_params(&query);
    debug!(query = params.trimmed_query(), size = params.size, "keyword route");
    run_search(&state, params).await
}

async fn semantic_search(State(state): State<AppState>, body: Bytes) -> Response {
    let params = match serde_json::from_slice::<SearchParams>(&body) {
        Ok(params) => params.mode(SearchMode::Semantic),
        Err(e) => {
            error!(error = %e, "invalid semantic search body");
            return search_failed();
        }
    };
    debug!(query = params.trimmed_query(), size = params.size, "semantic route");
    run_search(&state, params).await
}

async fn run_search(state: &AppState, params: SearchParams) -> Response {
    match try_search_movies(state.backend.as_ref(), &params).await {
        Ok(movies) => Json(movies).into_response(),
        Err(e) => {
            error!(mode = %params.mode, error = %e, "route search failed");
            search_failed()
        }
    }
}

fn search_failed() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": SEARCH_FAILED })),
    )
        .into_response()
}

/// Keyword params from a query string.
///
/// Numbers that fail to parse, and zeros, count as absent; size falls back
/// to the default.
fn keyword_params(query: &HashMap<String, String>) -> SearchParams {
    let text = query.get("query").cloned().unwrap_or_default();
    let size = parse_nonzero::<usize>(query.get("size")).unwrap_or(DEFAULT_RESULT_SIZE);

    let mut filters = SearchFilters::new();
    if let Some(year) = parse_nonzero::<i32>(query.get("year_min")) {
        filters = filters.year_min(year);
    }
    if let Some(year) = parse_nonzero::<i32>(query.get("year_max")) {
        filters = filters.year_max(year);
    }
    if let Some(rating) = query
        .get("rating_min")
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|r| r.is_finite() && *r != 0.0)
    {
        filters = filters.rating_min(rating);
    }
    if let Some(genres) = query.get("genres") {
        filters = filters.genres(
            genres
                .split(',')
                .map(str::trim)
                .filter(|g| !g.is_empty()),
        );
    }

    SearchParams::keyword(text).size(size).filters(filters)
}

fn parse_nonzero<T>(value: Option<&String>) -> Option<T>
where
    T: std::str::FromStr + PartialEq + Default,
{
    value
        .and_then(|v| v.trim().parse::<T>().ok())
        .filter(|n| *n != T::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn keyword_params_defaults() {
        let params = keyword_params(&HashMap::new());
        assert_eq!(params.query, "");
        assert_eq!(params.size, 10);
        assert_eq!(params.mode, SearchMode::Keyword);
        assert_eq!(params.filters, SearchFilters::default());
    }

    #[test]
    fn keyword_params_parses_all_fields() {
        let params = keyword_params(&query(&[
            ("query", "heist"),
            ("size", "5"),
            ("year_min", "1990"),
            ("year_max", "2005"),
            ("rating_min", "7.5"),
            ("genres", "Drama, Crime,,"),
        ]));
        assert_eq!(params.query, "heist");
        assert_eq!(params.size, 5);
        assert_eq!(params.filters.year.min, Some(1990));
        assert_eq!(params.filters.year.max, Some(2005));
        assert_eq!(params.filters.rating.min, Some(7.5));
        assert_eq!(params.filters.genres, vec!["Drama", "Crime"]);
    }

    #[test]
    fn keyword_params_tolerates_garbage_numbers() {
        let params = keyword_params(&query(&[
            ("query", "heist"),
            ("size", "lots"),
            ("year_min", "nineteen"),
            ("rating_min", "NaN"),
            ("year_max", "0"),
        ]));
        assert_eq!(params.size, 10);
        assert!(params.filters.year.is_unset());
        assert!(params.filters.rating.is_unset());
    }
}
