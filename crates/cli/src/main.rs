mod movie_list;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{MovieIndex, DEFAULT_BATCH_SIZE};
use oracle::FeedbackStore;
use server::{OracleConfig, OracleService};
use sources::{http_client, CacheBuilder, MetadataResolver, OfflineCache, OmdbSource, TmdbClient, TmdbSource};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use movie_list::HORROR_MOVIES;

/// Per-request timeout for the offline cache builder
const BUILDER_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Horror Oracle - conversational horror movie backend
#[derive(Parser)]
#[command(name = "horror-oracle")]
#[command(about = "Horror movie oracle: HTTP service and offline data tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Address to bind (overrides ORACLE_BIND_ADDR)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Import a TMDb ID export (NDJSON) into the local movie index
    Import {
        /// Path to the export file
        input: PathBuf,

        /// SQLite database to create or update
        #[arg(long, default_value = "horror_movies.db")]
        db: PathBuf,

        /// Rows per transaction
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
    },

    /// Pre-warm the offline metadata cache from the built-in title list
    BuildCache {
        /// Cache file to load and rewrite
        #[arg(long, default_value = "movie_cache.json")]
        cache: PathBuf,

        /// Seconds to sleep after each title
        #[arg(long, default_value = "2")]
        delay_secs: u64,

        /// Save after this many new entries
        #[arg(long, default_value = "10")]
        checkpoint_every: usize,

        /// Only process the first N titles
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Look up a title in the local movie index
    Search {
        /// Title to search for (case-insensitive)
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "horror_movies.db")]
        db: PathBuf,
    },

    /// Ask the oracle a question without starting the server
    Ask {
        /// The question, e.g. "tell me more about Halloween"
        query: String,
    },

    /// Show the horror stats for a title
    Stats {
        #[arg(long)]
        title: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind } => handle_serve(bind).await?,
        Commands::Import {
            input,
            db,
            batch_size,
        } => handle_import(input, db, batch_size)?,
        Commands::BuildCache {
            cache,
            delay_secs,
            checkpoint_every,
            limit,
        } => handle_build_cache(cache, delay_secs, checkpoint_every, limit).await?,
        Commands::Search { title, db } => handle_search(title, db)?,
        Commands::Ask { query } => handle_ask(query).await?,
        Commands::Stats { title } => handle_stats(title),
    }

    Ok(())
}

/// Handle the 'serve' command
async fn handle_serve(bind: Option<String>) -> Result<()> {
    let mut config = OracleConfig::from_env()?;
    if let Some(bind) = bind {
        config.bind_addr = bind;
    }
    server::serve(config).await
}

/// Handle the 'import' command
fn handle_import(input: PathBuf, db: PathBuf, batch_size: usize) -> Result<()> {
    println!("{}", "HORROR ORACLE - TMDB IMPORT".bold().red());
    println!("Reading {} into {}...", input.display(), db.display());

    let start = Instant::now();
    let index = MovieIndex::open(&db).context("Failed to open movie index")?;
    let report = index
        .import_from_file(&input, batch_size)
        .with_context(|| format!("Failed to import {}", input.display()))?;

    println!("{} Import complete in {:.1?}", "✓".green(), start.elapsed());
    println!("  Lines processed: {}", report.lines_read);
    println!("  Movies imported: {}", report.imported);
    println!("  Lines skipped:   {}", report.skipped);
    println!("  Movies in index: {}", index.count()?);

    println!("{}", "Most popular:".bold());
    for entry in index.most_popular(5)? {
        println!("  • {} ({:.1})", entry.display_title(), entry.popularity);
    }
    Ok(())
}

/// Handle the 'build-cache' command
async fn handle_build_cache(
    cache_path: PathBuf,
    delay_secs: u64,
    checkpoint_every: usize,
    limit: Option<usize>,
) -> Result<()> {
    let config = OracleConfig::from_env()?;
    let http = http_client(BUILDER_HTTP_TIMEOUT).context("Failed to build HTTP client")?;

    // Remote tiers only; no local index and no placeholder records
    let mut resolver = MetadataResolver::new();
    if let Some(key) = &config.omdb_api_key {
        resolver = resolver.add_provider(OmdbSource::new(http.clone(), key.clone()));
    }
    if let Some(key) = &config.tmdb_api_key {
        let tmdb = Arc::new(TmdbClient::new(http.clone(), key.clone()));
        resolver = resolver.add_provider(TmdbSource::new(tmdb));
    }
    if resolver.is_empty() {
        bail!("Set OMDB_API_KEY and/or TMDB_API_KEY before building the cache");
    }

    let mut cache = OfflineCache::load(&cache_path).context("Failed to load offline cache")?;
    let titles = &HORROR_MOVIES[..limit.unwrap_or(HORROR_MOVIES.len()).min(HORROR_MOVIES.len())];

    let builder = CacheBuilder::new(resolver)
        .with_delay(Duration::from_secs(delay_secs))
        .with_checkpoint_every(checkpoint_every);

    println!("{}", "HORROR ORACLE - OFFLINE CACHE BUILDER".bold().red());
    println!("Cache file:       {}", cache_path.display());
    println!("Already cached:   {}", cache.len());
    println!("Titles to check:  {}", titles.len());
    println!(
        "Estimated time:   {:.1} minutes",
        builder.estimate(titles.len()).as_secs_f64() / 60.0
    );

    let summary = builder.run(&mut cache, titles).await?;

    println!("{}", "CACHE BUILD COMPLETE".bold().green());
    println!("{} Newly cached:   {}", "✓".green(), summary.newly_cached);
    println!("{} Already cached: {}", "•".cyan(), summary.already_cached);
    println!("{} Not found:      {}", "✗".red(), summary.not_found);
    println!("  Total in cache: {}", summary.total_in_cache);
    println!("  Took {:.1} minutes", summary.elapsed_secs / 60.0);
    Ok(())
}

/// Handle the 'search' command
fn handle_search(title: String, db: PathBuf) -> Result<()> {
    if !db.exists() {
        bail!("Movie index {} not found; run `horror-oracle import` first", db.display());
    }
    let index = MovieIndex::open(&db).context("Failed to open movie index")?;

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    let exact = index.lookup_exact(&title)?;
    let substring = index.lookup_substring(&title)?;

    match (&exact, &substring) {
        (None, None) => println!("  No match"),
        _ => {
            if let Some(entry) = &exact {
                println!("  {} {} [tmdb {}] popularity {:.1}", "exact".green(), entry.display_title(), entry.id, entry.popularity);
            }
            if let Some(entry) = &substring {
                println!("  {} {} [tmdb {}] popularity {:.1}", "best partial".yellow(), entry.display_title(), entry.id, entry.popularity);
            }
        }
    }
    Ok(())
}

/// Handle the 'ask' command
async fn handle_ask(query: String) -> Result<()> {
    let config = OracleConfig::from_env()?;
    let service = OracleService::from_config(&config)?;

    let start = Instant::now();
    let answer = service.ask(&query).await?;

    println!("{} {}", "Category:".bold(), answer.query_type.cyan());
    println!("\n{}\n", answer.response);

    if let Some(movie) = &answer.movie_details {
        println!(
            "{} {} ({})",
            "Movie:".bold().red(),
            movie.title,
            movie.year.as_deref().unwrap_or("????")
        );
        if let Some(director) = &movie.director {
            println!("  Director: {}", director);
        }
        if let Some(rating) = &movie.rating {
            println!("  Rating:   {}", rating);
        }
        println!("  Genres:   {}", movie.genres);
        if let Some(plot) = &movie.plot {
            println!("  {}", plot);
        }
    }

    if !answer.recommendations.is_empty() {
        println!("{}", "You might also like:".bold());
        for (rank, rec) in answer.recommendations.iter().enumerate() {
            println!(
                "{}. {} ({})",
                (rank + 1).to_string().green(),
                rec.title.as_deref().unwrap_or("Untitled"),
                rec.year.as_deref().unwrap_or("????")
            );
        }
    }

    println!("\n(answered in {:.2?})", start.elapsed());
    Ok(())
}

/// Handle the 'stats' command
fn handle_stats(title: String) {
    let stats = FeedbackStore::new().get_stats(&title).stats;

    println!("{}", format!("Horror stats for '{}':", title).bold().blue());
    println!("{}Gore:  {}/100", "• ".red(), stats.gore);
    println!("{}Fear:  {:.1}/10", "• ".red(), stats.fear);
    println!("{}Kills: {}", "• ".red(), stats.kills);
}
