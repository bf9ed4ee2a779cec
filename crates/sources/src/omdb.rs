//! OMDb Source - exact-title lookup, the secondary metadata provider

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::traits::{MetadataProvider, ProviderError};
use crate::types::MovieRecord;

const PROVIDER: &str = "omdb";

/// OMDb reply for `?t=<title>`. Field names follow OMDb's PascalCase.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbResponse {
    response: Option<String>,
    title: Option<String>,
    year: Option<String>,
    director: Option<String>,
    poster: Option<String>,
    plot: Option<String>,
    genre: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
}

impl OmdbResponse {
    fn found(&self) -> bool {
        self.response.as_deref() == Some("True")
    }

    fn into_record(self, requested: &str) -> MovieRecord {
        MovieRecord {
            title: self.title.unwrap_or_else(|| requested.to_string()),
            year: self.year,
            director: self.director,
            // OMDb reports a missing poster as the literal "N/A"
            poster: self.poster.filter(|p| p != "N/A"),
            plot: self.plot,
            rating: self.imdb_rating,
            genres: self
                .genre
                .unwrap_or_else(|| MovieRecord::DEFAULT_GENRES.to_string()),
        }
    }
}

pub struct OmdbSource {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OmdbSource {
    pub const DEFAULT_BASE_URL: &'static str = "http://www.omdbapi.com";

    pub fn new(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl MetadataProvider for OmdbSource {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn resolve(&self, title: &str) -> Result<Option<MovieRecord>, ProviderError> {
        let response = self
            .http
            .get(format!("{}/", self.base_url))
            .query(&[("t", title), ("apikey", self.api_key.as_str())])
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

        let body: OmdbResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, e))?;

        if !body.found() {
            debug!("OMDb has no entry for '{}'", title);
            return Ok(None);
        }

        Ok(Some(body.into_record(title)))
    }
}
