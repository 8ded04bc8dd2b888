//! Movie records as returned by the search backend.
//!
//! The backend owns the schema; this side only reads it. Fields the crate
//! does not know about are kept in [`Movie::extra`] so a movie can be passed
//! back out (e.g. through the route surface) without losing data.

use serde::{Deserialize, Deserializer, Serialize};

/// A list-valued movie field that the backend sends either as a delimited
/// string (`"Action, Drama"`) or as a JSON array.
///
/// The original form is preserved on serialization; use [`TextList::items`]
/// for a normalized view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextList {
    Joined(String),
    Items(Vec<String>),
}

impl TextList {
    /// Normalized entries: split on commas, trimmed, empties dropped.
    pub fn items(&self) -> Vec<String> {
        match self {
            TextList::Joined(s) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            TextList::Items(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

impl From<Vec<String>> for TextList {
    fn from(items: Vec<String>) -> Self {
        TextList::Items(items)
    }
}

impl From<&str> for TextList {
    fn from(joined: &str) -> Self {
        TextList::Joined(joined.to_string())
    }
}

/// A movie as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Average user rating; the "rating" used by filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<TextList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cast: Option<TextList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    /// Runtime in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_rating: Option<f64>,
    /// Relevance score, present on semantic and hybrid results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    /// Backend fields not modelled above, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Movie {
    /// Create a movie with only an id and title set.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            overview: None,
            release_date: None,
            vote_average: None,
            popularity: None,
            genres: None,
            director: None,
            cast: None,
            poster_path: None,
            tagline: None,
            runtime: None,
            imdb_rating: None,
            score: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = Some(overview.into());
        self
    }

    pub fn with_release_date(mut self, date: impl Into<String>) -> Self {
        self.release_date = Some(date.into());
        self
    }

    pub fn with_rating(mut self, vote_average: f64) -> Self {
        self.vote_average = Some(vote_average);
        self
    }

    pub fn with_genres(mut self, genres: impl Into<TextList>) -> Self {
        self.genres = Some(genres.into());
        self
    }

    pub fn with_poster(mut self, path: impl Into<String>) -> Self {
        self.poster_path = Some(path.into());
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Genres as a normalized list, regardless of the wire form.
    pub fn genre_list(&self) -> Vec<String> {
        self.genres.as_ref().map(TextList::items).unwrap_or_default()
    }

    /// Cast members as a normalized list, regardless of the wire form.
    pub fn cast_list(&self) -> Vec<String> {
        self.cast.as_ref().map(TextList::items).unwrap_or_default()
    }

    /// Release year parsed from the leading `YYYY` of `release_date`.
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .and_then(|y| y.parse().ok())
    }

    /// Copy keeping only the fields needed to redisplay a result card:
    /// id, title, release date, poster, rating, genres and score.
    pub fn reduced(&self) -> Movie {
        Movie {
            release_date: self.release_date.clone(),
            vote_average: self.vote_average,
            genres: self.genres.clone(),
            poster_path: self.poster_path.clone(),
            score: self.score,
            ..Movie::new(self.id.clone(), self.title.clone())
        }
    }
}

/// Accept `"27205"` and `27205` alike.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
