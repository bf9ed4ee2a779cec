//! TMDb Source - the primary metadata provider
//!
//! TMDb is used in three ways:
//! - As the detail backend for local index hits (lookup by TMDb id)
//! - As the last tier of the resolution chain (fuzzy search, then details)
//! - For the extras: recommendations, trailers, and release listings
//!
//! ## API calls
//! - `GET /search/movie?query=`                    -> first result id
//! - `GET /movie/{id}?append_to_response=credits`  -> full record + director
//! - `GET /movie/{id}/recommendations`             -> similar titles
//! - `GET /movie/{id}/videos`                      -> YouTube trailer key
//! - `GET /discover/movie?with_genres=27`          -> release listings

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use data_loader::MovieId;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::traits::{MetadataProvider, ProviderError};
use crate::types::{year_from_date, MovieRecord, Recommendation, Release};

const PROVIDER: &str = "tmdb";

/// TMDb genre id for Horror
pub const HORROR_GENRE_ID: &str = "27";

const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w500";
const THUMBNAIL_BASE: &str = "https://image.tmdb.org/t/p/w200";
const YOUTUBE_WATCH: &str = "https://www.youtube.com/watch?v=";

const MAX_RECOMMENDATIONS: usize = 5;
const MAX_THEATER_RELEASES: usize = 5;
const MAX_RECENT_RELEASES: usize = 10;
const OVERVIEW_PREVIEW_CHARS: usize = 150;

// =============================================================================
// Wire types
// =============================================================================

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    id: MovieId,
}

#[derive(Deserialize)]
struct MovieDetails {
    title: Option<String>,
    release_date: Option<String>,
    poster_path: Option<String>,
    overview: Option<String>,
    vote_average: Option<f64>,
    #[serde(default)]
    genres: Vec<Genre>,
    credits: Option<Credits>,
}

#[derive(Deserialize)]
struct Genre {
    name: String,
}

#[derive(Deserialize)]
struct Credits {
    #[serde(default)]
    crew: Vec<CrewMember>,
}

#[derive(Deserialize)]
struct CrewMember {
    name: String,
    job: Option<String>,
}

#[derive(Deserialize)]
struct MovieList {
    #[serde(default)]
    results: Vec<ListedMovie>,
}

#[derive(Deserialize)]
struct ListedMovie {
    title: Option<String>,
    release_date: Option<String>,
    poster_path: Option<String>,
    vote_average: Option<f64>,
    overview: Option<String>,
}

#[derive(Deserialize)]
struct VideoList {
    #[serde(default)]
    results: Vec<Video>,
}

#[derive(Deserialize)]
struct Video {
    key: String,
    site: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl MovieDetails {
    fn into_record(self, fallback_title: &str) -> MovieRecord {
        let director = self.credits.and_then(|credits| {
            credits
                .crew
                .into_iter()
                .find(|member| member.job.as_deref() == Some("Director"))
                .map(|member| member.name)
        });

        let genres = self
            .genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        MovieRecord {
            title: self.title.unwrap_or_else(|| fallback_title.to_string()),
            year: year_from_date(self.release_date.as_deref()),
            director,
            poster: self
                .poster_path
                .filter(|p| !p.is_empty())
                .map(|p| format!("{POSTER_BASE}{p}")),
            plot: self.overview,
            rating: self.vote_average.map(|v| format!("{v:.1}")),
            genres,
        }
    }
}

/// Outcome of a trailer lookup
#[derive(Debug, Clone, PartialEq)]
pub enum TrailerLookup {
    /// The title search returned nothing
    MovieNotFound,
    /// The movie exists but has no YouTube trailer
    NoTrailer,
    Found(String),
}

// =============================================================================
// Client
// =============================================================================

/// Thin client over the TMDb v3 API
pub struct TmdbClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.themoviedb.org/3";

    pub fn new(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different API root (tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, e))
    }

    /// Fuzzy title search; returns the id of the first hit
    pub async fn search_first_id(&self, title: &str) -> Result<Option<MovieId>, ProviderError> {
        let search: SearchResponse = self
            .get_json("/search/movie", &[("query", title.to_string())])
            .await?;
        Ok(search.results.first().map(|hit| hit.id))
    }

    /// Full details (with credits) for a TMDb id
    #[instrument(skip(self))]
    pub async fn details(&self, id: MovieId, fallback_title: &str) -> Result<MovieRecord, ProviderError> {
        let details: MovieDetails = self
            .get_json(
                &format!("/movie/{id}"),
                &[("append_to_response", "credits".to_string())],
            )
            .await?;
        Ok(details.into_record(fallback_title))
    }

    /// Up to five "you might also like" titles.
    ///
    /// Failures degrade to an empty list.
    #[instrument(skip(self))]
    pub async fn recommendations(&self, title: &str) -> Vec<Recommendation> {
        match self.try_recommendations(title).await {
            Ok(recs) => recs,
            Err(e) => {
                warn!("Recommendations for '{}' unavailable: {}", title, e);
                Vec::new()
            }
        }
    }

    async fn try_recommendations(&self, title: &str) -> Result<Vec<Recommendation>, ProviderError> {
        let Some(id) = self.search_first_id(title).await? else {
            return Ok(Vec::new());
        };

        let list: MovieList = self
            .get_json(&format!("/movie/{id}/recommendations"), &[])
            .await?;

        Ok(list
            .results
            .into_iter()
            .take(MAX_RECOMMENDATIONS)
            .map(|movie| Recommendation {
                year: year_from_date(movie.release_date.as_deref()),
                poster: movie
                    .poster_path
                    .filter(|p| !p.is_empty())
                    .map(|p| format!("{THUMBNAIL_BASE}{p}")),
                title: movie.title,
            })
            .collect())
    }

    /// Find a YouTube trailer for the best search match
    #[instrument(skip(self))]
    pub async fn trailer(&self, title: &str) -> Result<TrailerLookup, ProviderError> {
        let Some(id) = self.search_first_id(title).await? else {
            return Ok(TrailerLookup::MovieNotFound);
        };

        let videos: VideoList = self.get_json(&format!("/movie/{id}/videos"), &[]).await?;

        let trailer = videos.results.into_iter().find(|video| {
            video.site.as_deref() == Some("YouTube") && video.kind.as_deref() == Some("Trailer")
        });

        Ok(match trailer {
            Some(video) => TrailerLookup::Found(format!("{YOUTUBE_WATCH}{}", video.key)),
            None => TrailerLookup::NoTrailer,
        })
    }

    /// Horror movies released in the last four weeks, most popular first
    pub async fn theater_releases(&self) -> Result<Vec<Release>, ProviderError> {
        self.theater_releases_as_of(Utc::now().date_naive()).await
    }

    pub async fn theater_releases_as_of(&self, today: NaiveDate) -> Result<Vec<Release>, ProviderError> {
        let mut params = discover_params(today, 28, "popularity.desc");
        params.push(("region", "US".to_string()));

        let list: MovieList = self.get_json("/discover/movie", &params).await?;
        debug!("TMDb returned {} theater releases", list.results.len());

        Ok(list
            .results
            .into_iter()
            .take(MAX_THEATER_RELEASES)
            .map(|movie| to_release(movie, true))
            .collect())
    }

    /// Horror movies released in the last 90 days, newest first
    pub async fn recent_releases(&self) -> Result<Vec<Release>, ProviderError> {
        self.recent_releases_as_of(Utc::now().date_naive()).await
    }

    pub async fn recent_releases_as_of(&self, today: NaiveDate) -> Result<Vec<Release>, ProviderError> {
        let params = discover_params(today, 90, "primary_release_date.desc");

        let list: MovieList = self.get_json("/discover/movie", &params).await?;
        debug!("TMDb returned {} recent releases", list.results.len());

        Ok(list
            .results
            .into_iter()
            .take(MAX_RECENT_RELEASES)
            .map(|movie| to_release(movie, false))
            .collect())
    }
}

fn discover_params(today: NaiveDate, days_back: i64, sort_by: &str) -> Vec<(&'static str, String)> {
    let since = today - Duration::days(days_back);
    vec![
        ("with_genres", HORROR_GENRE_ID.to_string()),
        ("primary_release_date.gte", since.format("%Y-%m-%d").to_string()),
        ("primary_release_date.lte", today.format("%Y-%m-%d").to_string()),
        ("sort_by", sort_by.to_string()),
        ("page", "1".to_string()),
    ]
}

fn to_release(movie: ListedMovie, with_vote: bool) -> Release {
    Release {
        title: movie.title,
        release_date: movie.release_date,
        poster_path: movie.poster_path,
        vote_average: with_vote.then(|| movie.vote_average.unwrap_or(0.0)),
        overview: preview(movie.overview.as_deref().unwrap_or_default()),
    }
}

/// First 150 characters of an overview with a trailing ellipsis
pub(crate) fn preview(overview: &str) -> String {
    let mut text: String = overview.chars().take(OVERVIEW_PREVIEW_CHARS).collect();
    text.push_str("...");
    text
}

// =============================================================================
// Resolution tier
// =============================================================================

/// Last tier of the chain: fuzzy search, then details of the first hit
pub struct TmdbSource {
    client: Arc<TmdbClient>,
}

impl TmdbSource {
    pub fn new(client: Arc<TmdbClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MetadataProvider for TmdbSource {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn resolve(&self, title: &str) -> Result<Option<MovieRecord>, ProviderError> {
        let Some(id) = self.client.search_first_id(title).await? else {
            debug!("TMDb search found nothing for '{}'", title);
            return Ok(None);
        };

        self.client.details(id, title).await.map(Some)
    }
}
