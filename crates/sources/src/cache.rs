//! Offline metadata cache: `normalized title -> MovieRecord` persisted as a
//! single JSON file.
//!
//! Saves rewrite the whole file through a temporary sibling and a rename, so
//! an interrupted save never leaves a truncated cache behind.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use data_loader::normalize_title;
use thiserror::Error;
use tracing::{debug, info};

use crate::types::MovieRecord;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Cache file {path} is not valid JSON: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub struct OfflineCache {
    path: PathBuf,
    entries: BTreeMap<String, MovieRecord>,
}

impl OfflineCache {
    /// Load the cache at `path`; a missing file gives an empty cache
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();

        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| CacheError::Json {
                path: path.display().to_string(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No cache at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(source) => {
                return Err(CacheError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        let cache = Self { path, entries };
        info!("Loaded cache with {} movies", cache.len());
        Ok(cache)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, title: &str) -> Option<&MovieRecord> {
        self.entries.get(&normalize_title(title))
    }

    pub fn contains(&self, title: &str) -> bool {
        self.entries.contains_key(&normalize_title(title))
    }

    pub fn insert(&mut self, title: &str, record: MovieRecord) {
        self.entries.insert(normalize_title(title), record);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite the cache file
    pub fn save(&self) -> Result<(), CacheError> {
        let io_err = |source| CacheError::Io {
            path: self.path.display().to_string(),
            source,
        };

        let json = serde_json::to_string_pretty(&self.entries).map_err(|source| CacheError::Json {
            path: self.path.display().to_string(),
            source,
        })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;

        info!("Saved cache with {} movies", self.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let cache = OfflineCache::load(dir.path().join("movie_cache.json")).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_keys_are_normalized() {
        let dir = tempdir().unwrap();
        let mut cache = OfflineCache::load(dir.path().join("movie_cache.json")).unwrap();

        cache.insert("  The Thing ", MovieRecord::placeholder("The Thing"));
        assert!(cache.contains("the thing"));
        assert!(cache.contains("THE THING"));
        assert_eq!(cache.get("The Thing").unwrap().title, "The Thing");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("movie_cache.json");

        let mut cache = OfflineCache::load(&path).unwrap();
        let mut record = MovieRecord::placeholder("Alien");
        record.year = Some("1979".to_string());
        cache.insert("Alien", record.clone());
        cache.save().unwrap();

        assert!(!dir.path().join("movie_cache.json.tmp").exists());

        let reloaded = OfflineCache::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get("alien"), Some(&record));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("movie_cache.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(OfflineCache::load(&path), Err(CacheError::Json { .. })));
    }
}
