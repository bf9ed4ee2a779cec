//! HTTP adapter: axum routes over `OracleService`.
//!
//! Handlers only parse input and map `ServiceError` onto status codes.
//! Every error body is JSON `{"error": message}`, including malformed
//! request bodies.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::error;

use oracle::MovieStats;
use sources::Release;

use crate::orchestrator::{
    AskResponse, GenrePick, OracleService, QuizReply, RatingReceipt, ReviewReceipt, ServiceError,
};

/// Error reply with its status code
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unavailable(String),

    /// Detail is logged, never sent to the client
    #[error("{0}")]
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Invalid(message) => ApiError::BadRequest(message),
            ServiceError::NotFound(message) => ApiError::NotFound(message),
            ServiceError::Unavailable(message) => ApiError::Unavailable(message),
            ServiceError::Provider(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Unavailable(message) => (StatusCode::SERVICE_UNAVAILABLE, message),
            ApiError::Internal(detail) => {
                error!("Request failed: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

// =============================================================================
// Request / reply bodies
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub movie_title: Option<String>,
    /// Kept as a raw number so non-integers get a 400 instead of a 422
    pub rating: Option<serde_json::Number>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub movie_title: Option<String>,
    pub review: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub movie_title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrailerQuery {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuizQuery {
    pub movie: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TrailerReply {
    pub trailer_url: String,
}

#[derive(Debug, Serialize)]
pub struct ReleasesReply {
    pub releases: Vec<Release>,
}

pub const UNKNOWN_MOVIE: &str = "unknown";

// =============================================================================
// Router
// =============================================================================

pub fn router(service: Arc<OracleService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ask-oracle", post(ask_oracle))
        .route("/submit-rating", post(submit_rating))
        .route("/submit-review", post(submit_review))
        .route("/get-movie-stats", get(movie_stats))
        .route("/random-genre/:genre", get(random_genre))
        .route("/get-trailer", get(trailer))
        .route("/theater-releases", get(theater_releases))
        .route("/recent-releases", get(recent_releases))
        .route("/quiz", get(quiz))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(service)
}

type AppState = State<Arc<OracleService>>;

async fn ask_oracle(
    State(service): AppState,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(service.ask(&request.query).await?))
}

async fn submit_rating(
    State(service): AppState,
    payload: Result<Json<RatingRequest>, JsonRejection>,
) -> Result<Json<RatingReceipt>, ApiError> {
    let Json(request) = payload?;
    let (Some(title), Some(rating)) = (request.movie_title, request.rating) else {
        return Err(ApiError::BadRequest("Movie title and rating required".to_string()));
    };
    let rating = rating
        .as_i64()
        .ok_or_else(|| ApiError::BadRequest("Rating must be a whole number between 1 and 5".to_string()))?;

    Ok(Json(service.submit_rating(&title, rating)?))
}

async fn submit_review(
    State(service): AppState,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Json<ReviewReceipt>, ApiError> {
    let Json(request) = payload?;
    let (Some(title), Some(review)) = (request.movie_title, request.review) else {
        return Err(ApiError::BadRequest("Movie title and review text required".to_string()));
    };

    Ok(Json(service.submit_review(&title, &review)?))
}

async fn movie_stats(
    State(service): AppState,
    Query(query): Query<StatsQuery>,
) -> Result<Json<MovieStats>, ApiError> {
    let title = query.movie_title.unwrap_or_default();
    Ok(Json(service.movie_stats(&title)?))
}

async fn random_genre(
    State(service): AppState,
    Path(genre): Path<String>,
) -> Result<Json<GenrePick>, ApiError> {
    Ok(Json(service.random_genre(&genre).await?))
}

async fn trailer(
    State(service): AppState,
    Query(query): Query<TrailerQuery>,
) -> Result<Json<TrailerReply>, ApiError> {
    let title = query.title.unwrap_or_default();
    let trailer_url = service.trailer(&title).await?;
    Ok(Json(TrailerReply { trailer_url }))
}

async fn theater_releases(State(service): AppState) -> Json<ReleasesReply> {
    Json(ReleasesReply {
        releases: service.theater_releases().await,
    })
}

async fn recent_releases(State(service): AppState) -> Json<ReleasesReply> {
    Json(ReleasesReply {
        releases: service.recent_releases().await,
    })
}

async fn quiz(
    State(service): AppState,
    Query(query): Query<QuizQuery>,
) -> Result<Json<QuizReply>, ApiError> {
    let movie = query
        .movie
        .filter(|movie| !movie.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_MOVIE.to_string());
    Ok(Json(service.quiz(&movie).await?))
}
