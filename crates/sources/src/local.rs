//! Local Index Source - first tier of the resolution chain
//!
//! Matches the title against the imported SQLite index (exact, then
//! substring, most popular wins) and fetches the full record from TMDb by id.
//! Only added to the chain when TMDb is configured, since the index itself
//! holds no plot, poster or credits.

use std::sync::Arc;

use async_trait::async_trait;
use data_loader::MovieIndex;
use tracing::{debug, info};

use crate::tmdb::TmdbClient;
use crate::traits::{MetadataProvider, ProviderError};
use crate::types::MovieRecord;

pub struct LocalIndexSource {
    index: Arc<MovieIndex>,
    tmdb: Arc<TmdbClient>,
}

impl LocalIndexSource {
    pub fn new(index: Arc<MovieIndex>, tmdb: Arc<TmdbClient>) -> Self {
        Self { index, tmdb }
    }
}

#[async_trait]
impl MetadataProvider for LocalIndexSource {
    fn name(&self) -> &str {
        "local-index"
    }

    async fn resolve(&self, title: &str) -> Result<Option<MovieRecord>, ProviderError> {
        // rusqlite is blocking, keep it off the async workers
        let index = Arc::clone(&self.index);
        let key = title.to_string();
        let entry = tokio::task::spawn_blocking(move || index.lookup(&key))
            .await
            .map_err(|e| ProviderError::Index(e.to_string()))?
            .map_err(|e| ProviderError::Index(e.to_string()))?;

        let Some(entry) = entry else {
            debug!("Database miss: {}", title);
            return Ok(None);
        };

        info!("Database hit: {} (tmdb id {})", entry.display_title(), entry.id);
        self.tmdb.details(entry.id, entry.display_title()).await.map(Some)
    }
}
