//! HTTP surface tests, driven through the router with `tower::ServiceExt`

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::extract::{Path, Query};
use axum::http::{header, Method, Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

use oracle::OracleState;
use server::{router, OracleService};
use sources::{http_client, MetadataResolver, TmdbClient};

const HALLOWEEN_ID: i64 = 948;

fn offline_app() -> Router {
    let service = OracleService::new(MetadataResolver::new(), None, None, Arc::new(OracleState::new()));
    router(Arc::new(service))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// =============================================================================
// Mock TMDb
// =============================================================================

async fn search(Query(q): Query<std::collections::HashMap<String, String>>) -> Json<Value> {
    let query = q.get("query").map(|s| s.to_lowercase()).unwrap_or_default();
    let results = if query.contains("halloween") {
        json!([{"id": HALLOWEEN_ID, "title": "Halloween"}])
    } else {
        json!([])
    };
    Json(json!({"results": results}))
}

async fn videos(Path(_id): Path<i64>) -> Json<Value> {
    Json(json!({"results": [{"key": "T5ke9IPTIJQ", "site": "YouTube", "type": "Trailer"}]}))
}

async fn recommendations(Path(_id): Path<i64>) -> Json<Value> {
    Json(json!({"results": [
        {"title": "Halloween II", "release_date": "1981-10-30", "poster_path": "/h2.jpg"},
        {"title": "The Fog", "release_date": "1980-02-08", "poster_path": null}
    ]}))
}

async fn discover() -> Json<Value> {
    let results: Vec<Value> = (1..=3)
        .map(|i| {
            json!({
                "title": format!("New Horror {i}"),
                "release_date": "2026-10-01",
                "poster_path": format!("/n{i}.jpg"),
                "vote_average": 6.0,
                "overview": "Something stirs."
            })
        })
        .collect();
    Json(json!({"results": results}))
}

async fn tmdb_app() -> Router {
    let mock = Router::new()
        .route("/search/movie", get(search))
        .route("/movie/:id/videos", get(videos))
        .route("/movie/:id/recommendations", get(recommendations))
        .route("/discover/movie", get(discover));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, mock).await.unwrap();
    });

    let http = http_client(Duration::from_secs(2)).unwrap();
    let tmdb = Arc::new(TmdbClient::new(http, "tmdb-key").with_base_url(format!("http://{}", addr)));
    let service = OracleService::new(MetadataResolver::new(), Some(tmdb), None, Arc::new(OracleState::new()));
    router(Arc::new(service))
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_ask_oracle_rejects_bad_input() {
    let app = offline_app();

    let (status, body) = send(&app, post_json("/ask-oracle", json!({"query": "   "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No query provided");

    let (status, body) = send(&app, post_json("/ask-oracle", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No query provided");

    // Missing content type is still a JSON error
    let request = Request::builder()
        .method(Method::POST)
        .uri("/ask-oracle")
        .body(Body::from("query=saw"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_ask_oracle_category_answer() {
    let app = offline_app();
    let (status, body) = send(
        &app,
        post_json("/ask-oracle", json!({"query": "any good zombie movies?"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query_type"], "zombies");
    assert!(body["response"].as_str().unwrap().contains("Train to Busan"));
    assert_eq!(body["movie_details"]["title"], "Dawn of the Dead");
    assert_eq!(body["movie_details"]["genres"], "Horror");
    assert!(body["movie_details"]["year"].is_null());
    assert_eq!(body["recommendations"], json!([]));
}

#[tokio::test]
async fn test_rating_flow() {
    let app = offline_app();

    let (status, body) = send(&app, post_json("/submit-rating", json!({"movie_title": "Saw", "rating": 5}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_ratings"], 1);

    let (_, body) = send(&app, post_json("/submit-rating", json!({"movie_title": "saw", "rating": 4}))).await;
    assert_eq!(body["average_rating"], 4.5);
    assert_eq!(body["total_ratings"], 2);
    assert_eq!(body["message"], "Rating submitted successfully!");

    for bad in [json!({"movie_title": "Saw", "rating": 6}),
                json!({"movie_title": "Saw", "rating": 0}),
                json!({"movie_title": "Saw", "rating": 4.5}),
                json!({"movie_title": "Saw"}),
                json!({"rating": 3})] {
        let (status, body) = send(&app, post_json("/submit-rating", bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    let (status, body) = send(&app, get_request("/get-movie-stats?movie_title=SAW")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rating"], json!({"average": 4.5, "count": 2}));
    assert_eq!(body["stats"], json!({"gore": 85, "fear": 7.5, "kills": 6}));
}

#[tokio::test]
async fn test_review_flow() {
    let app = offline_app();

    let long = "x".repeat(501);
    let (status, body) = send(&app, post_json("/submit-review", json!({"movie_title": "Scream", "review": long}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Review must be 500 characters or less");

    let (status, _) = send(&app, post_json("/submit-review", json!({"movie_title": "Scream"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        post_json("/submit-review", json!({"movie_title": "Scream", "review": "Still sharp."})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_reviews"], 1);

    let (_, body) = send(&app, get_request("/get-movie-stats?movie_title=scream")).await;
    let reviews = body["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["text"], "Still sharp.");
    assert_eq!(reviews[0]["user"], "Anonymous");
    assert!(reviews[0]["timestamp"].is_string());

    let (status, _) = send(&app, get_request("/get-movie-stats")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_random_genre() {
    let app = offline_app();

    let (status, body) = send(&app, get_request("/random-genre/cult-horror")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["genre"], "cult-horror");
    assert_eq!(body["query_type"], "genre_selection");
    assert!(body["response"].as_str().unwrap().starts_with("CULT HORROR: "));
    assert!(body["movie_details"]["title"].is_string());

    let (status, body) = send(&app, get_request("/random-genre/romcoms")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Genre 'romcoms' not found");
}

#[tokio::test]
async fn test_unconfigured_backends() {
    let app = offline_app();

    let (status, body) = send(&app, get_request("/get-trailer?title=Saw")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing title or TMDB API key");

    let (status, body) = send(&app, get_request("/theater-releases")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"releases": []}));

    let (status, body) = send(&app, get_request("/recent-releases")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"releases": []}));

    let (status, body) = send(&app, get_request("/quiz?movie=Saw")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_cors_is_permissive() {
    let app = offline_app();
    let request = Request::builder()
        .uri("/theater-releases")
        .header(header::ORIGIN, "http://frontend.example")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_tmdb_backed_routes() {
    let app = tmdb_app().await;

    let (status, body) = send(&app, get_request("/get-trailer?title=Halloween")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trailer_url"], "https://www.youtube.com/watch?v=T5ke9IPTIJQ");

    let (status, body) = send(&app, get_request("/get-trailer?title=Nothing%20Here")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Movie not found");

    let (_, body) = send(&app, get_request("/theater-releases")).await;
    assert_eq!(body["releases"].as_array().unwrap().len(), 3);

    let (status, body) = send(&app, post_json("/ask-oracle", json!({"query": "Halloween"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query_type"], "specific_movie");
    let recommendations = body["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 2);
    assert_eq!(recommendations[0]["title"], "Halloween II");
    assert_eq!(recommendations[0]["year"], "1981");
    assert!(recommendations[1]["poster"].is_null());
}
