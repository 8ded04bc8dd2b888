//! HTTP implementation of [`MovieBackend`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::MovieBackend;
use crate::telemetry;
use crate::types::{
    HybridSearchRequest, KeywordSearchRequest, Movie, SemanticSearchRequest, SummaryRequest,
    SummaryResponse,
};
use crate::{ReelError, Result};

/// Backend base URL used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "REELSEARCH_API_URL";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How keyword searches are sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordEndpoint {
    /// `POST /movies/keyword-search` with a JSON body.
    #[default]
    Body,
    /// `GET /movies/search` with a query string.
    Query,
}

/// Client for the movie search backend's HTTP API.
#[derive(Clone)]
pub struct HttpBackend {
    http: Client,
    base_url: String,
    keyword_endpoint: KeywordEndpoint,
}

impl HttpBackend {
    /// Create a client for `base_url` (e.g. `http://localhost:8000/api/v1`)
    /// with [`DEFAULT_TIMEOUT`].
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReelError::Configuration(format!("failed to build HTTP client: {e}")))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| {
            ReelError::Configuration(format!("invalid backend URL {base_url:?}: {e}"))
        })?;

        Ok(Self {
            http,
            base_url,
            keyword_endpoint: KeywordEndpoint::default(),
        })
    }

    /// Create a client from [`BASE_URL_ENV`], falling back to [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    /// Choose how keyword searches are sent.
    pub fn keyword_endpoint(mut self, endpoint: KeywordEndpoint) -> Self {
        self.keyword_endpoint = endpoint;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and decode its JSON body, recording metrics.
    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T> {
        let start = Instant::now();
        let result = self.send_inner(request).await;
        let status = if result.is_ok() { "ok" } else { "error" };

        metrics::counter!(
            telemetry::BACKEND_REQUESTS_TOTAL,
            "operation" => operation,
            "status" => status
        )
        .increment(1);
        metrics::histogram!(
            telemetry::BACKEND_REQUEST_DURATION_SECONDS,
            "operation" => operation
        )
        .record(start.elapsed().as_secs_f64());

        debug!(operation, status, elapsed_ms = start.elapsed().as_millis() as u64, "backend call");
        result
    }

    async fn send_inner<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| ReelError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ReelError::Http(e.to_string()))?;
        if bytes.is_empty() {
            return Err(ReelError::EmptyResponse);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn api_error(status: StatusCode, body: String) -> ReelError {
    let message = match body.trim() {
        "" => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
        text => text.to_string(),
    };
    ReelError::Api {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl MovieBackend for HttpBackend {
    async fn keyword_search(&self, request: &KeywordSearchRequest) -> Result<Vec<Movie>> {
        let builder = match self.keyword_endpoint {
            KeywordEndpoint::Body => self
                .http
                .post(self.url("/movies/keyword-search"))
                .json(request),
            KeywordEndpoint::Query => self.http.get(self.url("/movies/search")).query(request),
        };
        self.send("keyword_search", builder).await
    }

    async fn semantic_search(&self, request: &SemanticSearchRequest) -> Result<Vec<Movie>> {
        let builder = self
            .http
            .post(self.url("/movies/semantic-search"))
            .json(request);
        self.send("semantic_search", builder).await
    }

    async fn hybrid_search(&self, request: &HybridSearchRequest) -> Result<Vec<Movie>> {
        let builder = self
            .http
            .post(self.url("/movies/hybrid-search"))
            .json(request);
        self.send("hybrid_search", builder).await
    }

    async fn movie(&self, id: &str) -> Result<Movie> {
        let mut url = Url::parse(&self.url("/movies"))
            .map_err(|e| ReelError::Configuration(format!("invalid backend URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ReelError::Configuration("backend URL cannot have a path".to_string()))?
            .push(id);

        match self.send("movie", self.http.get(url)).await {
            Err(ReelError::Api { status: 404, .. }) => Err(ReelError::NotFound(id.to_string())),
            other => other,
        }
    }

    async fn summarize(&self, movies: &[Movie], query: &str) -> Result<SummaryResponse> {
        let builder = self
            .http
            .post(self.url("/search/summarize"))
            .json(&SummaryRequest { movies, query });
        self.send("summarize", builder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let backend = HttpBackend::new("http://example.test/api/v1/").unwrap();
        assert_eq!(backend.base_url(), "http://example.test/api/v1");
        assert_eq!(
            backend.url("/movies/search"),
            "http://example.test/api/v1/movies/search"
        );
    }

    #[test]
    fn invalid_url_is_a_configuration_error() {
        let err = HttpBackend::new("not a url").err().unwrap();
        assert!(matches!(err, ReelError::Configuration(_)));
    }

    #[test]
    fn api_error_prefers_body_text() {
        let err = api_error(StatusCode::BAD_GATEWAY, "upstream down".into());
        assert_eq!(err.to_string(), "API error (502): upstream down");

        let err = api_error(StatusCode::BAD_GATEWAY, "  ".into());
        assert_eq!(err.to_string(), "API error (502): Bad Gateway");
    }
}
