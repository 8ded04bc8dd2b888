//! Backend request and response bodies.
//!
//! Conversions from [`SearchParams`] apply the no-op bound rules of
//! [`SearchFilters`] so the backend only sees constraints that matter.

use serde::{Deserialize, Serialize};

use super::filters::{HybridWeights, SearchFilters, SearchParams};
use super::movie::Movie;

/// Keyword search parameters. Sent as a JSON body to
/// `POST /movies/keyword-search` or as a query string to `GET /movies/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSearchRequest {
    pub query: String,
    pub size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_min: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_max: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_min: Option<f64>,
    /// Comma-joined genre names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<String>,
}

impl From<&SearchParams> for KeywordSearchRequest {
    fn from(params: &SearchParams) -> Self {
        let filters = &params.filters;
        let genres: Vec<&str> = filters
            .genres
            .iter()
            .map(|g| g.trim())
            .filter(|g| !g.is_empty())
            .collect();
        Self {
            query: params.trimmed_query().to_string(),
            size: params.size,
            year_min: filters.effective_year_min(),
            year_max: filters.effective_year_max(),
            rating_min: filters.effective_rating_min(),
            genres: (!genres.is_empty()).then(|| genres.join(",")),
        }
    }
}

/// Year bounds in the semantic filter object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct YearBounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i32>,
}

/// Rating bound in the semantic filter object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoteAverageBound {
    pub min: f64,
}

/// Filter object of semantic and hybrid requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<YearBounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<VoteAverageBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
}

impl BackendFilters {
    /// Translate user filters; `None` when nothing constrains the search.
    pub fn from_filters(filters: &SearchFilters) -> Option<Self> {
        let min = filters.effective_year_min();
        // A max below the min would match nothing; leave it to the min.
        let max = filters
            .effective_year_max()
            .filter(|&max| min.is_none_or(|min| max >= min));
        let year = (min.is_some() || max.is_some()).then_some(YearBounds { min, max });

        let genres: Vec<String> = filters
            .genres
            .iter()
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect();

        let out = Self {
            year,
            vote_average: filters
                .effective_rating_min()
                .map(|min| VoteAverageBound { min }),
            genres: (!genres.is_empty()).then_some(genres),
        };
        (out != Self::default()).then_some(out)
    }
}

/// Body of `POST /movies/semantic-search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticSearchRequest {
    pub query: String,
    pub size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<BackendFilters>,
}

impl From<&SearchParams> for SemanticSearchRequest {
    fn from(params: &SearchParams) -> Self {
        Self {
            query: params.trimmed_query().to_string(),
            size: params.size,
            filters: BackendFilters::from_filters(&params.filters),
        }
    }
}

/// Body of `POST /movies/hybrid-search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridSearchRequest {
    #[serde(flatten)]
    pub search: SemanticSearchRequest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<HybridWeights>,
}

impl From<&SearchParams> for HybridSearchRequest {
    fn from(params: &SearchParams) -> Self {
        Self {
            search: SemanticSearchRequest::from(params),
            weights: params.weights,
        }
    }
}

/// Body of `POST /search/summarize`.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRequest<'a> {
    pub movies: &'a [Movie],
    pub query: &'a str,
}

/// Response of `POST /search/summarize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub movie_count: usize,
}
