//! Integration tests for the HTTP route surface, served on an ephemeral port
//! in front of a mock search backend.

#![cfg(feature = "server")]

use std::sync::Arc;

use serde_json::{Value, json};
use tokio::net::TcpListener;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reelsearch::client::HttpBackend;
use reelsearch::server::{self, AppState};

/// Start the routes against `backend`; returns the server base URL.
async fn start_routes(backend: &MockServer) -> String {
    let client = HttpBackend::new(format!("{}/api/v1", backend.uri())).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::serve(listener, AppState::new(Arc::new(client))));
    format!("http://{addr}")
}

fn backend_movies() -> Value {
    json!([
        {"id": 949, "title": "Heat", "vote_average": 8.3, "genres": "Crime, Drama", "imdb_id": "tt0113277"},
        {"id": 680, "title": "Pulp Fiction", "vote_average": 8.5}
    ])
}

// ============================================================================
// GET /api/v1/movies/search
// ============================================================================

#[tokio::test]
async fn keyword_route_forwards_params_and_returns_movies() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/movies/keyword-search"))
        .and(body_json(json!({
            "query": "heist",
            "size": 5,
            "year_min": 1990,
            "rating_min": 8.0,
            "genres": "Crime,Drama"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(backend_movies()))
        .expect(1)
        .mount(&backend)
        .await;
    let base = start_routes(&backend).await;

    let response = reqwest::get(format!(
        "{base}/api/v1/movies/search?query=heist&size=5&year_min=1990&rating_min=8&genres=Crime,Drama"
    ))
    .await
    .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    let movies = body.as_array().unwrap();
    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0]["title"], "Heat");
    assert_eq!(movies[0]["imdb_id"], "tt0113277");
}

#[tokio::test]
async fn keyword_route_tolerates_bad_numbers() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/movies/keyword-search"))
        .and(body_json(json!({"query": "heist", "size": 10})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&backend)
        .await;
    let base = start_routes(&backend).await;

    let response = reqwest::get(format!(
        "{base}/api/v1/movies/search?query=heist&size=ten&year_min=&rating_min=high"
    ))
    .await
    .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.json::<Value>().await.unwrap(), json!([]));
}

#[tokio::test]
async fn keyword_route_reports_backend_failure() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/movies/keyword-search"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&backend)
        .await;
    let base = start_routes(&backend).await;

    let response = reqwest::get(format!("{base}/api/v1/movies/search?query=heist"))
        .await
        .unwrap();
    assert_eq!(response.status(), 500);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({"error": "Failed to search movies"})
    );
}

// ============================================================================
// POST /api/v1/movies/semantic
// ============================================================================

#[tokio::test]
async fn semantic_route_forwards_body() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/movies/semantic-search"))
        .and(body_json(json!({
            "query": "crime saga in los angeles",
            "size": 3,
            "filters": {"year": {"min": 1990}, "genres": ["Crime"]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(backend_movies()))
        .expect(1)
        .mount(&backend)
        .await;
    let base = start_routes(&backend).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/v1/movies/semantic"))
        .json(&json!({
            "query": "crime saga in los angeles",
            "size": 3,
            "filters": {"year": {"min": 1990, "max": null}, "rating": null, "genres": ["Crime"]}
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn semantic_route_defaults_size() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/movies/semantic-search"))
        .and(body_json(json!({"query": "heist", "size": 10})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&backend)
        .await;
    let base = start_routes(&backend).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/v1/movies/semantic"))
        .json(&json!({"query": "heist"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn semantic_route_rejects_malformed_body() {
    let backend = MockServer::start().await;
    let base = start_routes(&backend).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/v1/movies/semantic"))
        .header("content-type", "application/json")
        .body("{\"query\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 500);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({"error": "Failed to search movies"})
    );
    assert!(backend.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn semantic_route_reports_backend_failure() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/movies/semantic-search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("index offline"))
        .mount(&backend)
        .await;
    let base = start_routes(&backend).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/v1/movies/semantic"))
        .json(&json!({"query": "heist"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 500);
}
