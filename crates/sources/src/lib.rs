//! # Sources Crate
//!
//! This crate turns a movie title into a full `MovieRecord` by asking a chain
//! of metadata providers, and pre-warms an offline cache with the same chain.
//!
//! ## Components
//!
//! ### Providers (`MetadataProvider` implementations)
//! - **LocalIndexSource**: SQLite index lookup, details from TMDb by id
//! - **OmdbSource**: exact-title lookup on OMDb
//! - **TmdbSource**: fuzzy search on TMDb, then details of the first hit
//!
//! ### MetadataResolver
//! Ordered fallback chain: the first provider with an answer wins, misses and
//! errors fall through, and an empty chain still yields a placeholder record.
//!
//! ### TmdbClient extras
//! Recommendations, YouTube trailers, theater and recent horror releases.
//!
//! ### OfflineCache + CacheBuilder
//! JSON file of resolved records, filled by a rate-limited builder run.
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{http_client, MetadataResolver, OmdbSource, TmdbClient, TmdbSource};
//! use std::{sync::Arc, time::Duration};
//!
//! let http = http_client(Duration::from_secs(3))?;
//! let tmdb = Arc::new(TmdbClient::new(http.clone(), tmdb_key));
//!
//! let resolver = MetadataResolver::new()
//!     .add_provider(OmdbSource::new(http, omdb_key))
//!     .add_provider(TmdbSource::new(tmdb.clone()));
//!
//! let record = resolver.resolve("The Exorcist").await;
//! let similar = tmdb.recommendations("The Exorcist").await;
//! ```

use std::time::Duration;

// Public modules
pub mod types;
pub mod traits;
pub mod local;
pub mod omdb;
pub mod tmdb;
pub mod resolver;
pub mod cache;
pub mod cache_builder;

// Re-export main types
pub use cache::{CacheError, OfflineCache};
pub use cache_builder::{BuildSummary, CacheBuilder, CacheOutcome};
pub use local::LocalIndexSource;
pub use omdb::OmdbSource;
pub use resolver::MetadataResolver;
pub use tmdb::{TmdbClient, TmdbSource, TrailerLookup};
pub use traits::{MetadataProvider, ProviderError};
pub use types::{MovieRecord, Recommendation, Release, Resolution};

/// Shared HTTP client for all providers, with a fixed per-request timeout
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::Transport {
            provider: "http",
            message: e.to_string(),
        })
}
