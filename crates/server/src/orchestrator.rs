//! # Oracle Service
//!
//! Coordinates one request end to end:
//! 1. Classify the query
//! 2. Generate the conversational text
//! 3. Resolve movie metadata when a movie is implicated
//! 4. Add TMDb recommendations where the flow calls for them
//!
//! Steps 2 and 3 are independent network calls, so they run concurrently
//! with `tokio::join!`. The HTTP layer in `routes` is a thin adapter over
//! this type; every operation here is usable (and tested) without axum.
//!
//! ## Degradation
//! Nothing in the conversational path fails because a remote service is
//! down: the resolver falls back to a placeholder record, the generator to
//! canned text, recommendations and release lists to empty vectors.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use rand::seq::IndexedRandom;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use data_loader::MovieIndex;
use llm_client::{ChatModel, OpenAiClient};
use oracle::{
    classify, detect_discussed_movie, genre_shelf, knowledge, Category, FeedbackError,
    MovieStats, OracleState, QuizError, ResponseGenerator,
};
use sources::{
    http_client, LocalIndexSource, MetadataResolver, MovieRecord, OmdbSource, ProviderError,
    Recommendation, Release, TmdbClient, TmdbSource, TrailerLookup,
};

use crate::config::OracleConfig;

/// Errors a caller of the service can see
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The request itself is unusable (400)
    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    NotFound(String),

    /// A required backend is not configured (503)
    #[error("{0}")]
    Unavailable(String),

    /// A remote provider failed where no fallback exists
    #[error("Provider failure: {0}")]
    Provider(#[from] ProviderError),
}

impl From<FeedbackError> for ServiceError {
    fn from(err: FeedbackError) -> Self {
        match err {
            FeedbackError::Validation(message) => ServiceError::Invalid(message),
        }
    }
}

// =============================================================================
// Replies
// =============================================================================

/// Reply to a chat query
#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
    pub response: String,
    pub movie_details: Option<MovieRecord>,
    pub recommendations: Vec<Recommendation>,
    pub query_type: String,
}

/// A random pick from one genre shelf
#[derive(Debug, Clone, Serialize)]
pub struct GenrePick {
    #[serde(flatten)]
    pub answer: AskResponse,
    pub genre: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RatingReceipt {
    pub average_rating: f64,
    pub total_ratings: usize,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewReceipt {
    pub message: String,
    pub total_reviews: usize,
}

/// Quiz reply. `questions` holds either the question list or
/// `{"error": "format error"}` when the model's output did not parse.
#[derive(Debug, Clone, Serialize)]
pub struct QuizReply {
    pub movie: String,
    pub questions: serde_json::Value,
}

pub const GENRE_SELECTION: &str = "genre_selection";

// =============================================================================
// Service
// =============================================================================

pub struct OracleService {
    resolver: Arc<MetadataResolver>,
    tmdb: Option<Arc<TmdbClient>>,
    responder: ResponseGenerator,
    state: Arc<OracleState>,
}

impl OracleService {
    pub fn new(
        resolver: MetadataResolver,
        tmdb: Option<Arc<TmdbClient>>,
        model: Option<Arc<dyn ChatModel>>,
        state: Arc<OracleState>,
    ) -> Self {
        Self {
            resolver: Arc::new(resolver),
            tmdb,
            responder: ResponseGenerator::new(model, state.clone()),
            state,
        }
    }

    /// Wire up every backend the configuration has credentials for.
    ///
    /// Chain order: local index -> OMDb -> TMDb search. The local index is
    /// only useful with TMDb (it holds ids, not metadata), so it is added
    /// only when both the database file and a TMDb key are present.
    pub fn from_config(config: &OracleConfig) -> Result<Self> {
        let http = http_client(config.http_timeout).context("Failed to build HTTP client")?;

        let tmdb = config
            .tmdb_api_key
            .as_ref()
            .map(|key| Arc::new(TmdbClient::new(http.clone(), key.clone())));

        let mut resolver = MetadataResolver::new();

        match (&tmdb, config.db_path.exists()) {
            (Some(tmdb), true) => {
                if let Some(index) = open_index(&config.db_path) {
                    resolver = resolver.add_provider(LocalIndexSource::new(index, tmdb.clone()));
                }
            }
            (None, true) => info!("Local index present but TMDb is not configured, skipping it"),
            (_, false) => info!("Local index {:?} not found, skipping it", config.db_path),
        }
        if let Some(key) = &config.omdb_api_key {
            resolver = resolver.add_provider(OmdbSource::new(http.clone(), key.clone()));
        }
        if let Some(tmdb) = &tmdb {
            resolver = resolver.add_provider(TmdbSource::new(tmdb.clone()));
        }

        let model = match &config.openai_api_key {
            Some(key) => {
                let client = OpenAiClient::new(key.clone(), config.openai_model.clone(), config.openai_timeout)
                    .context("Failed to build language model client")?;
                Some(Arc::new(client) as Arc<dyn ChatModel>)
            }
            None => None,
        };

        info!("OpenAI: {}", status(model.is_some()));
        info!("OMDb: {}", status(config.omdb_api_key.is_some()));
        info!("TMDb: {}", status(tmdb.is_some()));
        info!("Resolver chain: {:?}", resolver.provider_names());

        Ok(Self::new(resolver, tmdb, model, Arc::new(OracleState::new())))
    }

    pub fn state(&self) -> &Arc<OracleState> {
        &self.state
    }

    pub fn has_tmdb(&self) -> bool {
        self.tmdb.is_some()
    }

    // =========================================================================
    // Chat
    // =========================================================================

    /// Answer a free-text query
    #[instrument(skip(self))]
    pub async fn ask(&self, query: &str) -> Result<AskResponse, ServiceError> {
        let start_time = Instant::now();
        let query = query.trim();
        if query.is_empty() {
            return Err(ServiceError::Invalid("No query provided".to_string()));
        }

        let category = classify(query);
        debug!("Query classified as {}", category);

        let (response, movie_details, recommendations) = match category {
            Category::TellMeMore => match detect_discussed_movie(query) {
                Some(movie) => {
                    let (response, record) = tokio::join!(
                        self.responder.generate(query, category, Some(movie.as_str())),
                        self.resolver.resolve(&movie)
                    );
                    (response, Some(record), Vec::new())
                }
                None => {
                    let response = self.responder.generate(query, Category::General, None).await;
                    (response, None, Vec::new())
                }
            },
            Category::SpecificMovie => {
                let (response, record) = tokio::join!(
                    self.responder.generate(query, category, None),
                    self.resolver.resolve(query)
                );
                let recommendations = self.recommendations(&record.title).await;
                (response, Some(record), recommendations)
            }
            _ => match knowledge::sample_movie(category) {
                Some(sample) => {
                    let (response, record) = tokio::join!(
                        self.responder.generate(query, category, None),
                        self.resolver.resolve(sample)
                    );
                    let recommendations = self.recommendations(sample).await;
                    (response, Some(record), recommendations)
                }
                None => {
                    let response = self.responder.generate(query, category, None).await;
                    (response, None, Vec::new())
                }
            },
        };

        info!(
            "Answered {} query in {:.2?} ({} recommendations)",
            category,
            start_time.elapsed(),
            recommendations.len()
        );

        Ok(AskResponse {
            response,
            movie_details,
            recommendations,
            query_type: category.as_str().to_string(),
        })
    }

    /// Random movie from a genre shelf, resolved, with recommendations
    #[instrument(skip(self))]
    pub async fn random_genre(&self, genre: &str) -> Result<GenrePick, ServiceError> {
        let not_found = || ServiceError::NotFound(format!("Genre '{}' not found", genre));

        let shelf = genre_shelf(genre).ok_or_else(not_found)?;
        let movie = *shelf.movies.choose(&mut rand::rng()).ok_or_else(not_found)?;
        debug!("Picked '{}' from {}", movie, shelf.slug);

        let record = self.resolver.resolve(movie).await;
        let recommendations = self.recommendations(&record.title).await;

        Ok(GenrePick {
            answer: AskResponse {
                response: shelf.announce(movie),
                movie_details: Some(record),
                recommendations,
                query_type: GENRE_SELECTION.to_string(),
            },
            genre: genre.to_string(),
        })
    }

    async fn recommendations(&self, title: &str) -> Vec<Recommendation> {
        match &self.tmdb {
            Some(tmdb) => tmdb.recommendations(title).await,
            None => Vec::new(),
        }
    }

    // =========================================================================
    // Community feedback
    // =========================================================================

    pub fn submit_rating(&self, movie_title: &str, rating: i64) -> Result<RatingReceipt, ServiceError> {
        require(movie_title, "Movie title and rating required")?;
        let summary = self.state.feedback.submit_rating(movie_title, rating)?;
        Ok(RatingReceipt {
            average_rating: summary.average_rating,
            total_ratings: summary.total_ratings,
            message: "Rating submitted successfully!".to_string(),
        })
    }

    pub fn submit_review(&self, movie_title: &str, review: &str) -> Result<ReviewReceipt, ServiceError> {
        require(movie_title, "Movie title and review text required")?;
        let total_reviews = self.state.feedback.submit_review(movie_title, review)?;
        Ok(ReviewReceipt {
            message: "Review submitted successfully!".to_string(),
            total_reviews,
        })
    }

    pub fn movie_stats(&self, movie_title: &str) -> Result<MovieStats, ServiceError> {
        require(movie_title, "Movie title required")?;
        Ok(self.state.feedback.get_stats(movie_title))
    }

    // =========================================================================
    // TMDb extras
    // =========================================================================

    /// YouTube trailer URL for a title
    pub async fn trailer(&self, title: &str) -> Result<String, ServiceError> {
        let title = title.trim();
        let tmdb = match &self.tmdb {
            Some(tmdb) if !title.is_empty() => tmdb,
            _ => return Err(ServiceError::Invalid("Missing title or TMDB API key".to_string())),
        };

        match tmdb.trailer(title).await? {
            TrailerLookup::Found(url) => Ok(url),
            TrailerLookup::MovieNotFound => Err(ServiceError::NotFound("Movie not found".to_string())),
            TrailerLookup::NoTrailer => Err(ServiceError::NotFound("No trailer found".to_string())),
        }
    }

    /// Horror now in US theaters; empty when TMDb is missing or failing
    pub async fn theater_releases(&self) -> Vec<Release> {
        let Some(tmdb) = &self.tmdb else {
            return Vec::new();
        };
        tmdb.theater_releases().await.unwrap_or_else(|e| {
            warn!("Theater releases unavailable: {}", e);
            Vec::new()
        })
    }

    /// Horror released in the last 90 days; empty when TMDb is missing or failing
    pub async fn recent_releases(&self) -> Vec<Release> {
        let Some(tmdb) = &self.tmdb else {
            return Vec::new();
        };
        tmdb.recent_releases().await.unwrap_or_else(|e| {
            warn!("Recent releases unavailable: {}", e);
            Vec::new()
        })
    }

    // =========================================================================
    // Quiz
    // =========================================================================

    pub async fn quiz(&self, movie: &str) -> Result<QuizReply, ServiceError> {
        let questions = match self.responder.quiz(movie).await {
            Ok(questions) => serde_json::to_value(questions)
                .unwrap_or_else(|_| serde_json::json!({ "error": "format error" })),
            Err(QuizError::Format(reason)) => {
                warn!("Quiz for '{}' did not parse: {}", movie, reason);
                serde_json::json!({ "error": "format error" })
            }
            Err(QuizError::Unavailable) => {
                return Err(ServiceError::Unavailable("Quiz needs a language model".to_string()));
            }
            Err(QuizError::Model(e)) => {
                warn!("Quiz for '{}' failed: {}", movie, e);
                return Err(ServiceError::Unavailable("Language model unavailable".to_string()));
            }
        };

        Ok(QuizReply {
            movie: movie.to_string(),
            questions,
        })
    }
}

fn require(value: &str, message: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::Invalid(message.to_string()));
    }
    Ok(())
}

fn status(connected: bool) -> &'static str {
    if connected { "CONNECTED" } else { "MISSING" }
}

/// A broken or locked database only costs the local tier, never startup
fn open_index(path: &Path) -> Option<Arc<MovieIndex>> {
    let index = match MovieIndex::open(path) {
        Ok(index) => index,
        Err(e) => {
            warn!("Local index {:?} unusable, skipping it: {:#}", path, e);
            return None;
        }
    };
    match index.count() {
        Ok(rows) => info!("Local index: CONNECTED ({} movies)", rows),
        Err(e) => warn!("Local index opened but could not be counted: {}", e),
    }
    Some(Arc::new(index))
}
