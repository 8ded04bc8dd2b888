//! Search filters and user-level search parameters.
//!
//! Every bound is an `Option`: `None` means "unset", which is distinct from
//! a zero value (a `rating_min` of `0.0` is a real filter). Bounds that are
//! set but cannot constrain anything (see [`NO_OP_YEAR_FLOOR`]) are still
//! dropped from outgoing backend requests.

use serde::{Deserialize, Deserializer, Serialize};

use super::movie::TextList;

/// Years at or below this value do not constrain a query.
pub const NO_OP_YEAR_FLOOR: i32 = 1900;

/// Result count used when the caller does not specify one.
pub const DEFAULT_RESULT_SIZE: usize = 10;

/// Release-year bounds, both inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i32>,
}

impl YearRange {
    pub fn is_unset(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Minimum average rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingBound {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
}

impl RatingBound {
    pub fn is_unset(&self) -> bool {
        self.min.is_none()
    }
}

/// Filters attached to a search.
///
/// The JSON shape matches what the search pages send:
/// `{ "year": {"min": 1990, "max": 2000}, "rating": {"min": 7}, "genres": ["Drama"] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "YearRange::is_unset"
    )]
    pub year: YearRange,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "RatingBound::is_unset"
    )]
    pub rating: RatingBound,
    #[serde(
        default,
        deserialize_with = "genres_from_text_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub genres: Vec<String>,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn year_min(mut self, year: i32) -> Self {
        self.year.min = Some(year);
        self
    }

    pub fn year_max(mut self, year: i32) -> Self {
        self.year.max = Some(year);
        self
    }

    pub fn rating_min(mut self, rating: f64) -> Self {
        self.rating.min = Some(rating);
        self
    }

    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genres.push(genre.into());
        self
    }

    pub fn genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres.extend(genres.into_iter().map(Into::into));
        self
    }

    /// `year.min`, if it constrains anything.
    pub fn effective_year_min(&self) -> Option<i32> {
        self.year.min.filter(|&y| y > NO_OP_YEAR_FLOOR)
    }

    /// `year.max`, if it constrains anything.
    pub fn effective_year_max(&self) -> Option<i32> {
        self.year.max.filter(|&y| y > NO_OP_YEAR_FLOOR)
    }

    /// `rating.min`, if set and non-negative. Zero is kept.
    pub fn effective_rating_min(&self) -> Option<f64> {
        self.rating.min.filter(|&r| r >= 0.0)
    }

    /// Genres trimmed, without empties, sorted lexicographically.
    pub fn sorted_genres(&self) -> Vec<String> {
        let mut genres: Vec<String> = self
            .genres
            .iter()
            .map(|g| g.trim())
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect();
        genres.sort();
        genres
    }
}

/// Which backend search to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Keyword,
    #[default]
    Semantic,
    Hybrid,
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMode::Keyword => write!(f, "keyword"),
            SearchMode::Semantic => write!(f, "semantic"),
            SearchMode::Hybrid => write!(f, "hybrid"),
        }
    }
}

/// Relative weights for the two halves of a hybrid search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HybridWeights {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bm25: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<f32>,
}

/// A user-level search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_size", deserialize_with = "size_or_default")]
    pub size: usize,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filters: SearchFilters,
    #[serde(default)]
    pub mode: SearchMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<HybridWeights>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            query: String::new(),
            size: DEFAULT_RESULT_SIZE,
            filters: SearchFilters::default(),
            mode: SearchMode::default(),
            weights: None,
        }
    }
}

impl SearchParams {
    /// Semantic search for `query` with default size and no filters.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn keyword(query: impl Into<String>) -> Self {
        Self::new(query).mode(SearchMode::Keyword)
    }

    pub fn semantic(query: impl Into<String>) -> Self {
        Self::new(query).mode(SearchMode::Semantic)
    }

    pub fn hybrid(query: impl Into<String>) -> Self {
        Self::new(query).mode(SearchMode::Hybrid)
    }

    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn weights(mut self, weights: HybridWeights) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Parse the JSON parameter document a semantic search page receives.
    ///
    /// A document that does not parse yields an empty query, which the
    /// orchestrator treats as "nothing to search".
    pub fn parse_or_empty(json: &str) -> Self {
        match serde_json::from_str::<SearchParams>(json) {
            Ok(params) => params,
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse search parameters");
                Self::default()
            }
        }
    }

    /// Query with surrounding whitespace removed.
    pub fn trimmed_query(&self) -> &str {
        self.query.trim()
    }
}

fn default_size() -> usize {
    DEFAULT_RESULT_SIZE
}

fn size_or_default<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<usize>::deserialize(deserializer)?
        .filter(|&s| s > 0)
        .unwrap_or(DEFAULT_RESULT_SIZE))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn genres_from_text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TextList>::deserialize(deserializer)?
        .map(|list| list.items())
        .unwrap_or_default())
}
