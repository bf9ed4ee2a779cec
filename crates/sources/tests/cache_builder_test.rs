//! Offline cache builder tests with an in-process provider

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sources::{
    CacheBuilder, CacheOutcome, MetadataProvider, MetadataResolver, MovieRecord, OfflineCache,
    ProviderError,
};
use tempfile::tempdir;

/// Knows every title except those containing "unknown"
struct CountingProvider {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl MetadataProvider for CountingProvider {
    fn name(&self) -> &str {
        "counting"
    }

    async fn resolve(&self, title: &str) -> Result<Option<MovieRecord>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if title.to_lowercase().contains("unknown") {
            return Ok(None);
        }
        let mut record = MovieRecord::placeholder(title);
        record.year = Some("1999".to_string());
        Ok(Some(record))
    }
}

fn builder() -> (CacheBuilder, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let resolver = MetadataResolver::new().add_provider(CountingProvider {
        calls: calls.clone(),
    });
    let builder = CacheBuilder::new(resolver).with_delay(Duration::ZERO);
    (builder, calls)
}

#[tokio::test]
async fn test_skips_cached_titles_without_provider_calls() {
    let dir = tempdir().unwrap();
    let mut cache = OfflineCache::load(dir.path().join("movie_cache.json")).unwrap();
    cache.insert("The Exorcist", MovieRecord::placeholder("The Exorcist"));

    let (builder, calls) = builder();
    let titles = ["the exorcist", "Psycho", "Unknown Film", "Psycho"];
    let summary = builder.run(&mut cache, &titles).await.unwrap();

    assert_eq!(summary.processed, 4);
    assert_eq!(summary.already_cached, 2);
    assert_eq!(summary.newly_cached, 1);
    assert_eq!(summary.not_found, 1);
    assert_eq!(summary.total_in_cache, 2);

    // "the exorcist" and the duplicate "Psycho" never reach the provider
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_checkpoints_every_ten_new_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("movie_cache.json");
    let mut cache = OfflineCache::load(&path).unwrap();

    let titles: Vec<String> = (1..=23).map(|i| format!("Film {i}")).collect();
    let (builder, _) = builder();
    let summary = builder.run(&mut cache, &titles).await.unwrap();

    assert_eq!(summary.newly_cached, 23);
    assert_eq!(summary.checkpoints, 2);

    let reloaded = OfflineCache::load(&path).unwrap();
    assert_eq!(reloaded.len(), 23);
    assert_eq!(reloaded.get("film 7").unwrap().year.as_deref(), Some("1999"));
}

#[tokio::test]
async fn test_checkpoint_written_mid_run() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("movie_cache.json");
    let mut cache = OfflineCache::load(&path).unwrap();

    let (builder, _) = builder();
    let builder = builder.with_checkpoint_every(2);

    for title in ["A", "B"] {
        builder.cache_title(&mut cache, title).await;
    }
    assert!(!path.exists(), "cache_title alone never saves");

    let summary = builder.run(&mut cache, &["C", "D"]).await.unwrap();
    assert_eq!(summary.checkpoints, 1);
    assert_eq!(OfflineCache::load(&path).unwrap().len(), 4);
}

#[tokio::test]
async fn test_cache_title_outcomes() {
    let dir = tempdir().unwrap();
    let mut cache = OfflineCache::load(dir.path().join("movie_cache.json")).unwrap();
    let (builder, _) = builder();

    assert_eq!(
        builder.cache_title(&mut cache, "Alien").await,
        CacheOutcome::Cached {
            provider: "counting".to_string()
        }
    );
    assert_eq!(builder.cache_title(&mut cache, "ALIEN").await, CacheOutcome::AlreadyCached);
    assert_eq!(builder.cache_title(&mut cache, "unknown").await, CacheOutcome::NotFound);
}

#[test]
fn test_estimate_uses_delay() {
    let (builder, _) = builder();
    assert_eq!(builder.estimate(100), Duration::ZERO);

    let builder = builder.with_delay(Duration::from_secs(2));
    assert_eq!(builder.estimate(30), Duration::from_secs(60));
}
