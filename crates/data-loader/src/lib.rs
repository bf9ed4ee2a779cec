//! # Data Loader Crate
//!
//! This crate builds and queries the local movie index: a SQLite table of
//! TMDb movie ids, titles and popularity, imported once from the TMDb daily
//! ID export (newline-delimited JSON).
//!
//! ## Main Components
//!
//! - **types**: Import records, index entries, import report
//! - **parser**: Parse export lines into records (malformed lines are skipped)
//! - **index**: `MovieIndex` - schema, batch import, title lookups
//! - **error**: Error types for importing and querying
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{MovieIndex, DEFAULT_BATCH_SIZE};
//! use std::path::Path;
//!
//! let index = MovieIndex::open(Path::new("horror_movies.db"))?;
//! let report = index.import_from_file(Path::new("movie_ids.json"), DEFAULT_BATCH_SIZE)?;
//! println!("Imported {} movies", report.imported);
//!
//! if let Some(entry) = index.lookup("halloween")? {
//!     println!("{} (tmdb id {})", entry.title, entry.id);
//! }
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::{normalize_title, MovieIndex, DEFAULT_BATCH_SIZE};
pub use types::{ImportRecord, ImportReport, LocalIndexEntry, MovieId};
