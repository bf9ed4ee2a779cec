//! Parser for the newline-delimited JSON movie export.
//!
//! Each line is an independent JSON object:
//!
//! ```text
//! {"adult":false,"id":3924,"original_title":"Blondie","popularity":2.4,"video":false}
//! ```
//!
//! Lines are parsed independently so one bad line never aborts an import.
//! Batches are parsed in parallel with Rayon.

use crate::error::{DataLoadError, Result};
use crate::types::{ImportRecord, MovieId};
use rayon::prelude::*;
use serde::Deserialize;
use tracing::debug;

/// Raw shape of an export line.
///
/// Every field is optional here so that `null` values and missing keys are
/// tolerated; only `id` is actually required.
#[derive(Deserialize)]
struct ExportLine {
    id: Option<MovieId>,
    title: Option<String>,
    original_title: Option<String>,
    adult: Option<bool>,
    popularity: Option<f64>,
    video: Option<bool>,
}

/// Parse a single export line into an `ImportRecord`.
///
/// `line_no` is 1-based and only used for error context.
pub fn parse_line(line: &str, line_no: usize) -> Result<ImportRecord> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(DataLoadError::ParseError {
            line: line_no,
            reason: "Empty line".to_string(),
        });
    }

    let raw: ExportLine = serde_json::from_str(trimmed).map_err(|e| DataLoadError::ParseError {
        line: line_no,
        reason: format!("Invalid JSON: {}", e),
    })?;

    let id = raw.id.ok_or_else(|| DataLoadError::ParseError {
        line: line_no,
        reason: "Missing id".to_string(),
    })?;

    Ok(ImportRecord {
        id,
        title: raw.title.unwrap_or_default(),
        original_title: raw.original_title.unwrap_or_default(),
        adult: raw.adult.unwrap_or(false),
        popularity: raw.popularity.unwrap_or(0.0),
        video: raw.video.unwrap_or(false),
    })
}

/// Parse a batch of `(line_no, line)` pairs in parallel.
///
/// Returns the successfully parsed records (in input order) and the number
/// of lines that were skipped.
pub fn parse_batch(lines: &[(usize, String)]) -> (Vec<ImportRecord>, usize) {
    let parsed: Vec<Result<ImportRecord>> = lines
        .par_iter()
        .map(|(line_no, line)| parse_line(line, *line_no))
        .collect();

    let mut records = Vec::with_capacity(parsed.len());
    let mut skipped = 0;
    for result in parsed {
        match result {
            Ok(record) => records.push(record),
            Err(e) => {
                debug!("Skipping export line: {}", e);
                skipped += 1;
            }
        }
    }
    (records, skipped)
}
