//! Example: Resolve a title through the provider chain
//!
//! Run with: cargo run --package sources --example resolve_title -- "The Exorcist"
//!
//! Reads OMDB_API_KEY / TMDB_API_KEY from the environment and shows:
//! 1. Which providers are in the chain
//! 2. Which provider answered, and the resolved record
//! 3. TMDb recommendations for the title

use sources::{http_client, MetadataResolver, OmdbSource, TmdbClient, TmdbSource};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info,sources=debug")
        .init();

    let title = std::env::args().nth(1).unwrap_or_else(|| "The Exorcist".to_string());
    let http = http_client(Duration::from_secs(3))?;

    let mut resolver = MetadataResolver::new();
    if let Ok(key) = std::env::var("OMDB_API_KEY") {
        resolver = resolver.add_provider(OmdbSource::new(http.clone(), key));
    }
    let tmdb = std::env::var("TMDB_API_KEY")
        .ok()
        .map(|key| Arc::new(TmdbClient::new(http.clone(), key)));
    if let Some(client) = &tmdb {
        resolver = resolver.add_provider(TmdbSource::new(client.clone()));
    }

    println!("=== Horror Oracle Resolution Example ===\n");
    println!("Chain: {:?}\n", resolver.provider_names());

    let start = Instant::now();
    match resolver.resolve_with_source(&title).await {
        Some(resolution) => {
            println!("Resolved by {} in {:?}", resolution.provider, start.elapsed());
            println!("{}", serde_json::to_string_pretty(&resolution.record)?);
        }
        None => println!("No provider knows '{}'", title),
    }

    if let Some(client) = tmdb {
        println!("\nYou might also like:");
        for rec in client.recommendations(&title).await {
            println!(
                "  {} ({})",
                rec.title.unwrap_or_default(),
                rec.year.unwrap_or_else(|| "?".to_string())
            );
        }
    }

    Ok(())
}
