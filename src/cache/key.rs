//! Cache keys for search results.
//!
//! A key renders every input that affects a search result, in a fixed
//! order, so equivalent requests collide and different ones don't:
//!
//! ```text
//! cache-q-{query}-s{size}-y{year_min}-{year_max}-r{rating_min}-g{genres}
//! ```
//!
//! Genres are sorted before joining, absent numbers render as `0`, and
//! long queries are replaced by a fingerprint to bound key length.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{SearchFilters, SearchMode, SearchParams};

/// Queries longer than this many characters are fingerprinted.
pub const MAX_VERBATIM_QUERY_CHARS: usize = 50;

const FINGERPRINT_HEAD_CHARS: usize = 20;
const FINGERPRINT_TAIL_CHARS: usize = 10;

/// Deterministic identifier of a search request in the session cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for a semantic search (the untagged form).
    ///
    /// ```rust
    /// # use reelsearch::cache::CacheKey;
    /// # use reelsearch::SearchFilters;
    /// let key = CacheKey::new("inception", 10, &SearchFilters::default());
    /// assert_eq!(key.as_str(), "cache-q-inception-s10-y0-0-r0-g");
    /// ```
    pub fn new(query: &str, size: usize, filters: &SearchFilters) -> Self {
        Self::build(None, query, size, filters)
    }

    /// Key for `params`, tagged by mode so keyword and hybrid results never
    /// share an entry with semantic ones.
    pub fn for_params(params: &SearchParams) -> Self {
        let tag = match params.mode {
            SearchMode::Semantic => None,
            SearchMode::Keyword => Some("kw"),
            SearchMode::Hybrid => Some("hy"),
        };
        Self::build(tag, params.trimmed_query(), params.size, &params.filters)
    }

    fn build(tag: Option<&str>, query: &str, size: usize, filters: &SearchFilters) -> Self {
        let prefix = match tag {
            Some(tag) => format!("cache-{tag}"),
            None => "cache".to_string(),
        };
        Self(format!(
            "{prefix}-q-{}-s{size}-y{}-{}-r{}-g{}",
            query_fingerprint(query),
            filters.year.min.unwrap_or(0),
            filters.year.max.unwrap_or(0),
            filters.rating.min.unwrap_or(0.0),
            filters.sorted_genres().join(","),
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Bounded stand-in for a query inside a cache key.
///
/// Queries up to [`MAX_VERBATIM_QUERY_CHARS`] characters are returned as-is;
/// longer ones become `{first 20 chars}_{char count}_{last 10 chars}`.
pub fn query_fingerprint(query: &str) -> Cow<'_, str> {
    let len = query.chars().count();
    if len <= MAX_VERBATIM_QUERY_CHARS {
        return Cow::Borrowed(query);
    }
    let head: String = query.chars().take(FINGERPRINT_HEAD_CHARS).collect();
    let tail: String = query.chars().skip(len - FINGERPRINT_TAIL_CHARS).collect();
    Cow::Owned(format!("{head}_{len}_{tail}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genre_order_does_not_matter() {
        let a = SearchFilters::new().genres(["Drama", "Action"]);
        let b = SearchFilters::new().genres(["Action", "Drama"]);
        assert_eq!(CacheKey::new("q", 10, &a), CacheKey::new("q", 10, &b));
        assert!(CacheKey::new("q", 10, &a).as_str().ends_with("-gAction,Drama"));
    }

    #[test]
    fn filters_render_in_fixed_order() {
        let filters = SearchFilters::new()
            .year_min(1990)
            .year_max(2005)
            .rating_min(7.5)
            .genre("Horror");
        assert_eq!(
            CacheKey::new("alien", 20, &filters).as_str(),
            "cache-q-alien-s20-y1990-2005-r7.5-gHorror"
        );
    }

    #[test]
    fn short_query_is_verbatim() {
        let q = "a".repeat(MAX_VERBATIM_QUERY_CHARS);
        assert_eq!(query_fingerprint(&q), q);
    }

    #[test]
    fn long_query_is_fingerprinted() {
        let q = "a film about a thief who steals corporate secrets through dreams";
        let fp = query_fingerprint(q);
        assert_eq!(fp, format!("a film about a thief_{}_ugh dreams", q.chars().count()));
    }

    #[test]
    fn fingerprint_counts_chars_not_bytes() {
        let q = "é".repeat(60);
        let fp = query_fingerprint(&q);
        assert_eq!(fp, format!("{}_60_{}", "é".repeat(20), "é".repeat(10)));
    }

    #[test]
    fn modes_do_not_share_keys() {
        let semantic = CacheKey::for_params(&SearchParams::semantic("x"));
        let keyword = CacheKey::for_params(&SearchParams::keyword("x"));
        let hybrid = CacheKey::for_params(&SearchParams::hybrid("x"));
        assert_eq!(semantic.as_str(), "cache-q-x-s10-y0-0-r0-g");
        assert_eq!(keyword.as_str(), "cache-kw-q-x-s10-y0-0-r0-g");
        assert_eq!(hybrid.as_str(), "cache-hy-q-x-s10-y0-0-r0-g");
    }

    #[test]
    fn for_params_trims_query() {
        let key = CacheKey::for_params(&SearchParams::new("  inception "));
        assert_eq!(key.as_str(), "cache-q-inception-s10-y0-0-r0-g");
    }
}
