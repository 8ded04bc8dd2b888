//! Integration tests for [`HttpBackend`] against a mock search backend, plus
//! the fallback helpers in [`reelsearch::search`].

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reelsearch::client::{HttpBackend, KeywordEndpoint, MovieBackend};
use reelsearch::search::{self, SUMMARY_UNAVAILABLE};
use reelsearch::{
    HybridSearchRequest, HybridWeights, KeywordSearchRequest, Movie, ReelError, SearchFilters,
    SearchParams, SemanticSearchRequest,
};

async fn backend() -> (MockServer, HttpBackend) {
    let server = MockServer::start().await;
    let backend = HttpBackend::new(format!("{}/api/v1", server.uri())).unwrap();
    (server, backend)
}

fn movies_json() -> serde_json::Value {
    json!([
        {"id": 27205, "title": "Inception", "release_date": "2010-07-15", "vote_average": 8.4, "genres": "Action, Sci-Fi"},
        {"id": "4935", "title": "Howl's Moving Castle", "genres": ["Fantasy", "Animation"], "score": 0.91}
    ])
}

// ============================================================================
// Keyword search
// ============================================================================

#[tokio::test]
async fn keyword_search_posts_json_body() {
    let (server, backend) = backend().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/movies/keyword-search"))
        .and(body_json(json!({
            "query": "heist",
            "size": 5,
            "year_min": 1990,
            "genres": "Crime,Drama"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(movies_json()))
        .expect(1)
        .mount(&server)
        .await;

    let params = SearchParams::keyword(" heist ")
        .size(5)
        .filters(SearchFilters::new().year_min(1990).genres(["Crime", "Drama"]));
    let movies = backend
        .keyword_search(&KeywordSearchRequest::from(&params))
        .await
        .unwrap();

    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0].id, "27205");
    assert_eq!(movies[0].genre_list(), vec!["Action", "Sci-Fi"]);
    assert_eq!(movies[1].id, "4935");
    assert_eq!(movies[1].genre_list(), vec!["Fantasy", "Animation"]);
}

#[tokio::test]
async fn keyword_search_can_use_query_string() {
    let (server, backend) = backend().await;
    let backend = backend.keyword_endpoint(KeywordEndpoint::Query);
    Mock::given(method("GET"))
        .and(path("/api/v1/movies/search"))
        .and(query_param("query", "heist"))
        .and(query_param("size", "10"))
        .and(query_param("rating_min", "7.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(movies_json()))
        .expect(1)
        .mount(&server)
        .await;

    let params = SearchParams::keyword("heist").filters(SearchFilters::new().rating_min(7.5));
    let movies = backend
        .keyword_search(&KeywordSearchRequest::from(&params))
        .await
        .unwrap();
    assert_eq!(movies.len(), 2);
}

#[tokio::test]
async fn no_op_year_bounds_are_not_sent() {
    let (server, backend) = backend().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/movies/keyword-search"))
        .and(body_json(json!({"query": "heist", "size": 10})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let params = SearchParams::keyword("heist")
        .filters(SearchFilters::new().year_min(1900).year_max(0).rating_min(-1.0));
    let movies = backend
        .keyword_search(&KeywordSearchRequest::from(&params))
        .await
        .unwrap();
    assert!(movies.is_empty());
}

// ============================================================================
// Semantic and hybrid search
// ============================================================================

#[tokio::test]
async fn semantic_search_sends_filter_object() {
    let (server, backend) = backend().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/movies/semantic-search"))
        .and(body_json(json!({
            "query": "dreams within dreams",
            "size": 10,
            "filters": {
                "year": {"min": 2000, "max": 2015},
                "vote_average": {"min": 7.0},
                "genres": ["Sci-Fi"]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(movies_json()))
        .expect(1)
        .mount(&server)
        .await;

    let params = SearchParams::semantic("dreams within dreams").filters(
        SearchFilters::new()
            .year_min(2000)
            .year_max(2015)
            .rating_min(7.0)
            .genre("Sci-Fi"),
    );
    let movies = backend
        .semantic_search(&SemanticSearchRequest::from(&params))
        .await
        .unwrap();
    assert_eq!(movies[0].title, "Inception");
    assert_eq!(movies[1].score, Some(0.91));
}

#[tokio::test]
async fn semantic_search_omits_empty_filters() {
    let (server, backend) = backend().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/movies/semantic-search"))
        .and(body_json(json!({"query": "inception", "size": 10})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    backend
        .semantic_search(&SemanticSearchRequest::from(&SearchParams::semantic("inception")))
        .await
        .unwrap();
}

#[tokio::test]
async fn hybrid_search_sends_weights() {
    let (server, backend) = backend().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/movies/hybrid-search"))
        .and(body_json(json!({
            "query": "space opera",
            "size": 3,
            "weights": {"bm25": 0.25, "vector": 0.75}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(movies_json()))
        .expect(1)
        .mount(&server)
        .await;

    let params = SearchParams::hybrid("space opera").size(3).weights(HybridWeights {
        bm25: Some(0.25),
        vector: Some(0.75),
    });
    let movies = backend
        .hybrid_search(&HybridSearchRequest::from(&params))
        .await
        .unwrap();
    assert_eq!(movies.len(), 2);
}

// ============================================================================
// Movie lookup and summaries
// ============================================================================

#[tokio::test]
async fn movie_lookup_keeps_unknown_fields() {
    let (server, backend) = backend().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/movies/27205"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 27205,
            "title": "Inception",
            "director": "Christopher Nolan",
            "cast": "Leonardo DiCaprio, Elliot Page",
            "runtime": 148,
            "trailer_url": "https://example.test/trailer"
        })))
        .mount(&server)
        .await;

    let movie = backend.movie("27205").await.unwrap();
    assert_eq!(movie.director.as_deref(), Some("Christopher Nolan"));
    assert_eq!(movie.cast_list(), vec!["Leonardo DiCaprio", "Elliot Page"]);
    assert_eq!(movie.runtime, Some(148.0));
    assert_eq!(movie.extra["trailer_url"], "https://example.test/trailer");

    let round_trip = serde_json::to_value(&movie).unwrap();
    assert_eq!(round_trip["trailer_url"], "https://example.test/trailer");
}

#[tokio::test]
async fn missing_movie_is_not_found() {
    let (server, backend) = backend().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/movies/404404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Movie not found"})))
        .mount(&server)
        .await;

    let err = backend.movie("404404").await.unwrap_err();
    assert!(matches!(err, ReelError::NotFound(ref id) if id == "404404"));
    assert!(search::movie_by_id(&backend, "404404").await.is_none());
}

#[tokio::test]
async fn summarize_posts_movies_and_query() {
    let (server, backend) = backend().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/search/summarize"))
        .and(body_json(json!({
            "movies": [{"id": "1", "title": "Heat"}],
            "query": "heist"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "summary": "**Heat** is the definitive heist film.",
            "query": "heist",
            "movie_count": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = backend
        .summarize(&[Movie::new("1", "Heat")], "heist")
        .await
        .unwrap();
    assert_eq!(response.summary, "**Heat** is the definitive heist film.");
    assert_eq!(response.movie_count, 1);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn server_error_carries_status_and_body() {
    let (server, backend) = backend().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/movies/semantic-search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("index offline"))
        .mount(&server)
        .await;

    let err = backend
        .semantic_search(&SemanticSearchRequest::from(&SearchParams::semantic("x")))
        .await
        .unwrap_err();
    match err {
        ReelError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "index offline");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_body_is_an_error() {
    let (server, backend) = backend().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/movies/semantic-search"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = backend
        .semantic_search(&SemanticSearchRequest::from(&SearchParams::semantic("x")))
        .await
        .unwrap_err();
    assert!(matches!(err, ReelError::EmptyResponse));
}

#[tokio::test]
async fn unreachable_backend_is_an_http_error() {
    // Nothing listens on the discard port.
    let backend = HttpBackend::new("http://127.0.0.1:9/api/v1").unwrap();
    let err = backend.movie("1").await.unwrap_err();
    assert!(matches!(err, ReelError::Http(_)));
}

// ============================================================================
// Search helpers
// ============================================================================

#[tokio::test]
async fn search_movies_dispatches_on_mode() {
    let (server, backend) = backend().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/movies/keyword-search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(movies_json()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/movies/semantic-search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(
        search::search_movies(&backend, &SearchParams::keyword("heist"))
            .await
            .len(),
        2
    );
    assert!(
        search::search_movies(&backend, &SearchParams::semantic("heist"))
            .await
            .is_empty()
    );
}

#[tokio::test]
async fn search_movies_swallows_failures() {
    let (server, backend) = backend().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/movies/semantic-search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let params = SearchParams::semantic("heist");
    assert!(search::try_search_movies(&backend, &params).await.is_err());
    assert!(search::search_movies(&backend, &params).await.is_empty());
}

#[tokio::test]
async fn summary_failures_fall_back_to_apology() {
    let (server, backend) = backend().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/search/summarize"))
        .and(body_json(json!({"movies": [{"id": "1", "title": "Heat"}], "query": "broken"})))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/search/summarize"))
        .and(body_json(json!({"movies": [{"id": "1", "title": "Heat"}], "query": "blank"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"summary": "  "})))
        .mount(&server)
        .await;

    let movies = [Movie::new("1", "Heat")];
    assert_eq!(
        search::search_summary(&backend, &movies, "broken").await,
        SUMMARY_UNAVAILABLE
    );
    assert_eq!(
        search::search_summary(&backend, &movies, "blank").await,
        SUMMARY_UNAVAILABLE
    );
}
