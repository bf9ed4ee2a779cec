//! MovieIndex: the SQLite-backed local lookup table.
//!
//! This module owns everything that touches the `movies` table:
//! - Schema creation (table + title indexes)
//! - Batch import of the NDJSON export (insert-or-replace by id)
//! - Case-insensitive title lookups ordered by popularity
//!
//! The connection sits behind a mutex so a single `MovieIndex` can be shared
//! (via `Arc`) between request handlers. Lookups are short, synchronous
//! queries; async callers should run them on a blocking thread.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// Number of records written per transaction
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Log a progress line every this many export lines
const PROGRESS_EVERY: usize = 100_000;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS movies (
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        original_title TEXT,
        adult INTEGER DEFAULT 0,
        popularity REAL,
        video INTEGER DEFAULT 0
    );

    CREATE INDEX IF NOT EXISTS idx_title ON movies(title);
    CREATE INDEX IF NOT EXISTS idx_original_title ON movies(original_title);
";

const INSERT_SQL: &str = "
    INSERT OR REPLACE INTO movies (id, title, original_title, adult, popularity, video)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
";

const EXACT_SQL: &str = "
    SELECT id, title, original_title, popularity
    FROM movies
    WHERE LOWER(title) = ?1 OR LOWER(original_title) = ?1
    ORDER BY popularity DESC
    LIMIT 1
";

const SUBSTRING_SQL: &str = "
    SELECT id, title, original_title, popularity
    FROM movies
    WHERE LOWER(title) LIKE ?1 ESCAPE '\\' OR LOWER(original_title) LIKE ?1 ESCAPE '\\'
    ORDER BY popularity DESC
    LIMIT 1
";

/// Persisted (id, title, original title, popularity) table.
pub struct MovieIndex {
    conn: Mutex<Connection>,
}

impl MovieIndex {
    /// Open (or create) the index database at `path` and make sure the
    /// schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        info!("Opening movie index at {:?}", path);
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open a throwaway in-memory index (tests, dry runs)
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    // =========================================================================
    // Import
    // =========================================================================

    /// Import an NDJSON export file.
    ///
    /// Re-running on the same file is safe: rows are replaced by id, so the
    /// table ends up with identical content.
    pub fn import_from_file(&self, path: &Path, batch_size: usize) -> Result<ImportReport> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => DataLoadError::IoError(e),
        })?;
        info!("Importing movie export from {:?}", path);
        self.import_reader(BufReader::new(file), batch_size)
    }

    /// Import NDJSON from any buffered reader.
    ///
    /// Lines are collected into batches of `batch_size`, each batch is
    /// parsed in parallel and written in its own transaction. Malformed
    /// lines are counted and skipped.
    pub fn import_reader<R: BufRead>(&self, reader: R, batch_size: usize) -> Result<ImportReport> {
        if batch_size == 0 {
            return Err(DataLoadError::InvalidValue {
                field: "batch_size".to_string(),
                value: batch_size.to_string(),
            });
        }

        let mut report = ImportReport::default();
        let mut pending: Vec<(usize, String)> = Vec::with_capacity(batch_size);

        // Split on raw bytes so a line with invalid UTF-8 is skipped by the
        // parser instead of aborting the whole read.
        for (idx, chunk) in reader.split(b'\n').enumerate() {
            let line_no = idx + 1;
            let bytes = chunk?;
            let line = String::from_utf8_lossy(&bytes).into_owned();

            if line_no % PROGRESS_EVERY == 0 {
                info!(
                    "Processed {} lines... ({} movies imported)",
                    line_no, report.imported
                );
            }

            if line.trim().is_empty() {
                continue;
            }
            report.lines_read += 1;
            pending.push((line_no, line));

            if pending.len() >= batch_size {
                self.flush_batch(&mut pending, &mut report)?;
            }
        }

        if !pending.is_empty() {
            self.flush_batch(&mut pending, &mut report)?;
        }

        info!(
            "Import complete: {} lines read, {} imported, {} skipped",
            report.lines_read, report.imported, report.skipped
        );
        Ok(report)
    }

    fn flush_batch(
        &self,
        pending: &mut Vec<(usize, String)>,
        report: &mut ImportReport,
    ) -> Result<()> {
        let (records, skipped) = parser::parse_batch(pending);
        pending.clear();
        report.skipped += skipped;
        report.imported += self.insert_batch(&records)?;
        Ok(())
    }

    /// Insert-or-replace a batch of records in a single transaction.
    pub fn insert_batch(&self, records: &[ImportRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(INSERT_SQL)?;
            for record in records {
                stmt.execute(params![
                    record.id,
                    record.title,
                    record.original_title,
                    record.adult,
                    record.popularity,
                    record.video,
                ])?;
            }
        }
        tx.commit()?;

        debug!("Committed batch of {} records", records.len());
        Ok(records.len())
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Find the best entry for a title: exact case-insensitive match on
    /// title or original title first, then a substring match. Ties go to the
    /// most popular row.
    pub fn lookup(&self, title: &str) -> Result<Option<LocalIndexEntry>> {
        let key = normalize_title(title);
        if key.is_empty() {
            return Ok(None);
        }
        if let Some(entry) = self.query_one(EXACT_SQL, &key)? {
            return Ok(Some(entry));
        }
        self.query_one(SUBSTRING_SQL, &like_pattern(&key))
    }

    /// Exact (case-insensitive) match only
    pub fn lookup_exact(&self, title: &str) -> Result<Option<LocalIndexEntry>> {
        let key = normalize_title(title);
        if key.is_empty() {
            return Ok(None);
        }
        self.query_one(EXACT_SQL, &key)
    }

    /// Substring (`%title%`) match only
    pub fn lookup_substring(&self, title: &str) -> Result<Option<LocalIndexEntry>> {
        let key = normalize_title(title);
        if key.is_empty() {
            return Ok(None);
        }
        self.query_one(SUBSTRING_SQL, &like_pattern(&key))
    }

    fn query_one(&self, sql: &str, param: &str) -> Result<Option<LocalIndexEntry>> {
        let conn = self.conn.lock();
        let entry = conn.query_row(sql, params![param], row_to_entry).optional()?;
        Ok(entry)
    }

    /// Total number of rows in the index
    pub fn count(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// The `limit` most popular entries, highest first
    pub fn most_popular(&self, limit: usize) -> Result<Vec<LocalIndexEntry>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, title, original_title, popularity
             FROM movies
             ORDER BY popularity DESC, id ASC
             LIMIT ?1",
        )?;
        let entries = stmt
            .query_map(params![limit as i64], row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }
}

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<LocalIndexEntry> {
    let original_title: Option<String> = row.get(2)?;
    let popularity: Option<f64> = row.get(3)?;
    Ok(LocalIndexEntry {
        id: row.get(0)?,
        title: row.get(1)?,
        original_title: original_title.filter(|t| !t.is_empty()),
        popularity: popularity.unwrap_or(0.0),
    })
}

/// Normalize a title for lookups and cache keys (trimmed, lowercase)
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// `%key%` with LIKE metacharacters in `key` matched literally
fn like_pattern(key: &str) -> String {
    let mut pattern = String::with_capacity(key.len() + 2);
    pattern.push('%');
    for c in key.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn record(id: MovieId, title: &str, original: &str, popularity: f64) -> ImportRecord {
        ImportRecord {
            id,
            title: title.to_string(),
            original_title: original.to_string(),
            adult: false,
            popularity,
            video: false,
        }
    }

    #[test]
    fn test_substring_lookup_prefers_popularity() {
        let index = MovieIndex::open_in_memory().unwrap();
        index
            .insert_batch(&[
                record(1, "Halloween", "Halloween", 50.0),
                record(2, "Halloween II", "Halloween II", 80.0),
            ])
            .unwrap();

        let hit = index.lookup_substring("halloween").unwrap().unwrap();
        assert_eq!(hit.title, "Halloween II");
        assert_eq!(hit.id, 2);
    }

    #[test]
    fn test_lookup_tries_exact_before_substring() {
        let index = MovieIndex::open_in_memory().unwrap();
        index
            .insert_batch(&[
                record(1, "Halloween", "Halloween", 50.0),
                record(2, "Halloween II", "Halloween II", 80.0),
            ])
            .unwrap();

        let hit = index.lookup("  HALLOWEEN ").unwrap().unwrap();
        assert_eq!(hit.id, 1);

        // No exact row for "hallow", so the substring tier answers
        let hit = index.lookup("hallow").unwrap().unwrap();
        assert_eq!(hit.id, 2);
    }

    #[test]
    fn test_lookup_matches_original_title() {
        let index = MovieIndex::open_in_memory().unwrap();
        index
            .insert_batch(&[record(10, "", "Låt den rätte komma in", 12.0)])
            .unwrap();

        let hit = index.lookup_exact("LÅT DEN RÄTTE KOMMA IN").unwrap().unwrap();
        assert_eq!(hit.id, 10);

        let hit = index.lookup("rätte komma").unwrap().unwrap();
        assert_eq!(hit.id, 10);
        assert_eq!(hit.original_title.as_deref(), Some("Låt den rätte komma in"));
    }

    #[test]
    fn test_lookup_miss_and_blank() {
        let index = MovieIndex::open_in_memory().unwrap();
        index.insert_batch(&[record(1, "Saw", "Saw", 20.0)]).unwrap();

        assert!(index.lookup("Paddington").unwrap().is_none());
        assert!(index.lookup("   ").unwrap().is_none());
    }

    #[test]
    fn test_substring_lookup_treats_wildcards_literally() {
        let index = MovieIndex::open_in_memory().unwrap();
        index.insert_batch(&[record(1, "Saw", "Saw", 20.0)]).unwrap();

        assert!(index.lookup("_").unwrap().is_none());
        assert!(index.lookup("%").unwrap().is_none());
        assert!(index.lookup("s_w").unwrap().is_none());

        index
            .insert_batch(&[record(2, "100% Wolf", "100% Wolf", 5.0)])
            .unwrap();
        assert_eq!(index.lookup("0% w").unwrap().unwrap().id, 2);
        assert_eq!(like_pattern(r"a_b%c\d"), r"%a\_b\%c\\d%");
    }

    #[test]
    fn test_display_title_falls_back_to_original() {
        let index = MovieIndex::open_in_memory().unwrap();
        index
            .insert_batch(&[
                record(1, "", "Ringu", 30.0),
                record(2, "Scream", "Scream", 10.0),
            ])
            .unwrap();

        let popular = index.most_popular(2).unwrap();
        assert_eq!(popular[0].display_title(), "Ringu");
        assert_eq!(popular[1].display_title(), "Scream");
    }

    #[test]
    fn test_import_reader_skips_malformed_lines() {
        let index = MovieIndex::open_in_memory().unwrap();
        let export = concat!(
            "{\"id\":1,\"title\":\"Saw\",\"original_title\":\"Saw\",\"popularity\":20.0}\n",
            "this is not json\n",
            "\n",
            "{\"title\":\"no id\"}\n",
            "{\"id\":2,\"title\":\"Scream\",\"original_title\":\"Scream\",\"popularity\":30.0}\n",
            "{\"id\":3,\"title\":\"Hereditary\",\"original_title\":\"Hereditary\",\"popularity\":40.0}",
        );

        // Batch size 2 forces several commits, including a partial last batch
        let report = index.import_reader(Cursor::new(export), 2).unwrap();

        assert_eq!(report.lines_read, 5);
        assert_eq!(report.imported, 3);
        assert_eq!(report.skipped, 2);
        assert_eq!(index.count().unwrap(), 3);
    }

    #[test]
    fn test_import_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("horror_movies.db");
        let export_path = dir.path().join("movie_ids.json");

        let mut file = File::create(&export_path).unwrap();
        for id in 1..=25 {
            writeln!(
                file,
                "{{\"id\":{},\"original_title\":\"Movie {}\",\"popularity\":{}.5}}",
                id, id, id
            )
            .unwrap();
        }
        drop(file);

        let index = MovieIndex::open(&db_path).unwrap();
        let first = index.import_from_file(&export_path, 10).unwrap();
        let count_after_first = index.count().unwrap();
        let rows_after_first = index.most_popular(100).unwrap();

        let second = index.import_from_file(&export_path, 10).unwrap();

        assert_eq!(first, second);
        assert_eq!(count_after_first, 25);
        assert_eq!(index.count().unwrap(), count_after_first);
        assert_eq!(index.most_popular(100).unwrap(), rows_after_first);
    }

    #[test]
    fn test_import_missing_file() {
        let index = MovieIndex::open_in_memory().unwrap();
        let err = index
            .import_from_file(Path::new("does/not/exist.json"), DEFAULT_BATCH_SIZE)
            .unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let index = MovieIndex::open_in_memory().unwrap();
        let err = index.import_reader(Cursor::new(""), 0).unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidValue { .. }));
    }

    #[test]
    fn test_most_popular_order() {
        let index = MovieIndex::open_in_memory().unwrap();
        index
            .insert_batch(&[
                record(1, "A", "A", 1.0),
                record(2, "B", "B", 3.0),
                record(3, "C", "C", 2.0),
            ])
            .unwrap();

        let top: Vec<_> = index
            .most_popular(2)
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(top, vec![2, 3]);
    }
}
