//! Metadata Resolver - ordered fallback chain over providers
//!
//! The resolver owns an ordered `Vec<Box<dyn MetadataProvider>>` and asks
//! each tier in turn. The first `Ok(Some(record))` wins; misses and errors
//! move on to the next tier. `resolve` never fails: when every tier comes up
//! empty it returns a placeholder record titled with the input.
//!
//! Typical request-time order: local index -> OMDb -> TMDb.

use tracing::{debug, instrument, warn};

use crate::traits::MetadataProvider;
use crate::types::{MovieRecord, Resolution};

pub struct MetadataResolver {
    providers: Vec<Box<dyn MetadataProvider>>,
}

impl MetadataResolver {
    /// Create an empty chain
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Append a provider to the end of the chain (builder pattern)
    pub fn add_provider(mut self, provider: impl MetadataProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Provider names in the order they are tried
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Walk the chain and report which provider answered
    #[instrument(skip(self))]
    pub async fn resolve_with_source(&self, title: &str) -> Option<Resolution> {
        for provider in &self.providers {
            match provider.resolve(title).await {
                Ok(Some(record)) => {
                    debug!("'{}' resolved by {}", title, provider.name());
                    return Some(Resolution {
                        provider: provider.name().to_string(),
                        record,
                    });
                }
                Ok(None) => {
                    debug!("{} has no match for '{}'", provider.name(), title);
                }
                Err(e) => {
                    warn!("{} failed for '{}': {}", provider.name(), title, e);
                }
            }
        }

        None
    }

    /// Resolve a title into a record, falling back to a placeholder
    pub async fn resolve(&self, title: &str) -> MovieRecord {
        match self.resolve_with_source(title).await {
            Some(resolution) => resolution.record,
            None => {
                debug!("No provider knows '{}', using placeholder", title);
                MovieRecord::placeholder(title)
            }
        }
    }
}

impl Default for MetadataResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ProviderError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    enum Behaviour {
        Hit(&'static str),
        Miss,
        Fail,
    }

    struct FakeProvider {
        name: &'static str,
        behaviour: Behaviour,
        calls: Arc<AtomicUsize>,
    }

    impl FakeProvider {
        fn new(name: &'static str, behaviour: Behaviour) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    name,
                    behaviour,
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl MetadataProvider for FakeProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn resolve(&self, title: &str) -> Result<Option<MovieRecord>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behaviour {
                Behaviour::Hit(director) => {
                    let mut record = MovieRecord::placeholder(title);
                    record.director = Some(director.to_string());
                    Ok(Some(record))
                }
                Behaviour::Miss => Ok(None),
                Behaviour::Fail => Err(ProviderError::Timeout { provider: "fake" }),
            }
        }
    }

    #[tokio::test]
    async fn test_empty_chain_returns_placeholder() {
        let resolver = MetadataResolver::new();
        let record = resolver.resolve("Some Unknown Film").await;

        assert_eq!(record, MovieRecord::placeholder("Some Unknown Film"));
        assert!(resolver.resolve_with_source("Some Unknown Film").await.is_none());
    }

    #[tokio::test]
    async fn test_first_hit_wins() {
        let (first, first_calls) = FakeProvider::new("first", Behaviour::Hit("A"));
        let (second, second_calls) = FakeProvider::new("second", Behaviour::Hit("B"));
        let resolver = MetadataResolver::new().add_provider(first).add_provider(second);

        let resolution = resolver.resolve_with_source("Saw").await.unwrap();
        assert_eq!(resolution.provider, "first");
        assert_eq!(resolution.record.director.as_deref(), Some("A"));
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_errors_and_misses_fall_through() {
        let (failing, _) = FakeProvider::new("failing", Behaviour::Fail);
        let (missing, _) = FakeProvider::new("missing", Behaviour::Miss);
        let (last, last_calls) = FakeProvider::new("last", Behaviour::Hit("C"));
        let resolver = MetadataResolver::new()
            .add_provider(failing)
            .add_provider(missing)
            .add_provider(last);

        assert_eq!(resolver.provider_names(), vec!["failing", "missing", "last"]);

        let record = resolver.resolve("Scream").await;
        assert_eq!(record.director.as_deref(), Some("C"));
        assert_eq!(last_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_tiers_fail() {
        let (failing, _) = FakeProvider::new("failing", Behaviour::Fail);
        let (missing, _) = FakeProvider::new("missing", Behaviour::Miss);
        let resolver = MetadataResolver::new().add_provider(failing).add_provider(missing);

        let record = resolver.resolve("Nothing").await;
        assert_eq!(record.title, "Nothing");
        assert_eq!(record.genres, "Horror");
        assert!(record.director.is_none());
    }
}
