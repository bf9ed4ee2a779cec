//! Offline Cache Builder
//!
//! Walks a fixed title list and pre-warms the offline cache through the
//! remote providers.
//!
//! ## Per title
//! 1. Already cached -> count it, skip every provider call
//! 2. Otherwise resolve through the chain (no placeholder records)
//! 3. Hit -> write through to the cache, checkpoint every N new entries
//! 4. Sleep the fixed delay (crude rate limiting)
//!
//! A final save runs after the last title.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::cache::{CacheError, OfflineCache};
use crate::resolver::MetadataResolver;

/// What happened to a single title
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOutcome {
    AlreadyCached,
    Cached { provider: String },
    NotFound,
}

/// Totals for a builder run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildSummary {
    pub processed: usize,
    pub newly_cached: usize,
    pub already_cached: usize,
    pub not_found: usize,
    pub checkpoints: usize,
    pub total_in_cache: usize,
    pub elapsed_secs: f64,
}

pub struct CacheBuilder {
    resolver: MetadataResolver,
    delay: Duration,
    checkpoint_every: usize,
    progress_every: usize,
}

impl CacheBuilder {
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);
    pub const DEFAULT_CHECKPOINT_EVERY: usize = 10;
    pub const DEFAULT_PROGRESS_EVERY: usize = 25;

    /// The resolver should hold only remote providers (OMDb, TMDb)
    pub fn new(resolver: MetadataResolver) -> Self {
        Self {
            resolver,
            delay: Self::DEFAULT_DELAY,
            checkpoint_every: Self::DEFAULT_CHECKPOINT_EVERY,
            progress_every: Self::DEFAULT_PROGRESS_EVERY,
        }
    }

    /// Sleep after each title (default: 2s)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Save after this many new entries (default: 10)
    pub fn with_checkpoint_every(mut self, every: usize) -> Self {
        self.checkpoint_every = every.max(1);
        self
    }

    /// Log progress after this many titles (default: 25)
    pub fn with_progress_every(mut self, every: usize) -> Self {
        self.progress_every = every.max(1);
        self
    }

    /// Estimated wall-clock time for a run, dominated by the delay
    pub fn estimate(&self, titles: usize) -> Duration {
        self.delay * titles as u32
    }

    /// Resolve one title into the cache
    pub async fn cache_title(&self, cache: &mut OfflineCache, title: &str) -> CacheOutcome {
        if cache.contains(title) {
            return CacheOutcome::AlreadyCached;
        }

        match self.resolver.resolve_with_source(title).await {
            Some(resolution) => {
                cache.insert(title, resolution.record);
                CacheOutcome::Cached {
                    provider: resolution.provider,
                }
            }
            None => CacheOutcome::NotFound,
        }
    }

    /// Process every title, checkpointing as it goes
    #[instrument(skip(self, cache, titles), fields(titles = titles.len()))]
    pub async fn run<S: AsRef<str>>(
        &self,
        cache: &mut OfflineCache,
        titles: &[S],
    ) -> Result<BuildSummary, CacheError> {
        let start = Instant::now();
        let total = titles.len();
        let mut summary = BuildSummary::default();

        info!(
            "Caching {} titles (estimated {:.1} minutes)",
            total,
            self.estimate(total).as_secs_f64() / 60.0
        );

        for (i, title) in titles.iter().enumerate() {
            let title = title.as_ref();
            let outcome = self.cache_title(cache, title).await;
            debug!("[{}/{}] {}: {:?}", i + 1, total, title, outcome);

            match outcome {
                CacheOutcome::AlreadyCached => summary.already_cached += 1,
                CacheOutcome::Cached { .. } => {
                    summary.newly_cached += 1;
                    if summary.newly_cached % self.checkpoint_every == 0 {
                        cache.save()?;
                        summary.checkpoints += 1;
                    }
                }
                CacheOutcome::NotFound => summary.not_found += 1,
            }
            summary.processed += 1;

            if summary.processed % self.progress_every == 0 {
                info!(
                    "Progress: {}/{} ({} new, {} already cached, {} not found)",
                    summary.processed,
                    total,
                    summary.newly_cached,
                    summary.already_cached,
                    summary.not_found
                );
            }

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        cache.save()?;
        summary.total_in_cache = cache.len();
        summary.elapsed_secs = start.elapsed().as_secs_f64();

        info!(
            "Cache build complete: {} new, {} already cached, {} not found, {} total",
            summary.newly_cached, summary.already_cached, summary.not_found, summary.total_in_cache
        );

        Ok(summary)
    }
}
