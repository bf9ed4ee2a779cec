//! Core domain types for the local movie index.
//!
//! The index is built from the TMDb daily ID export: one JSON object per line
//! with the movie id, titles and a popularity score.

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// TMDb movie identifier
pub type MovieId = i64;

// =============================================================================
// Import Types
// =============================================================================

/// One parsed line of the export, ready to be written to the `movies` table.
///
/// Missing optional fields are filled with defaults by the parser, so every
/// record can be inserted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub id: MovieId,
    pub title: String,
    pub original_title: String,
    pub adult: bool,
    pub popularity: f64,
    pub video: bool,
}

/// Counters reported at the end of an import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Non-empty lines read from the export
    pub lines_read: usize,
    /// Records written (inserted or replaced)
    pub imported: usize,
    /// Lines that failed to parse and were skipped
    pub skipped: usize,
}

// =============================================================================
// Lookup Types
// =============================================================================

/// A row returned by title lookups.
///
/// Immutable once imported; the service only ever reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalIndexEntry {
    pub id: MovieId,
    pub title: String,
    /// Alternate (original-language) title, `None` when the export had none
    pub original_title: Option<String>,
    pub popularity: f64,
}

impl LocalIndexEntry {
    /// Title to show and search with. The public ID export only carries
    /// `original_title`, so `title` is often empty.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            self.original_title.as_deref().unwrap_or(&self.title)
        } else {
            &self.title
        }
    }
}
