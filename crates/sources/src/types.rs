//! Shared types produced by the metadata providers.

use serde::{Deserialize, Serialize};

/// Canonical resolved movie record.
///
/// Built fresh on every resolution. `title` is always present; every other
/// field stays `None` unless a provider supplied it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    /// Four-digit release year
    pub year: Option<String>,
    pub director: Option<String>,
    /// Poster image URL
    pub poster: Option<String>,
    pub plot: Option<String>,
    /// Numeric rating, kept as the provider's string form
    pub rating: Option<String>,
    /// Comma-joined genre names
    pub genres: String,
}

impl MovieRecord {
    pub const DEFAULT_GENRES: &'static str = "Horror";

    /// The record returned when no provider knows the title
    pub fn placeholder(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: None,
            director: None,
            poster: None,
            plot: None,
            rating: None,
            genres: Self::DEFAULT_GENRES.to_string(),
        }
    }
}

/// A "you might also like" entry from TMDb
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: Option<String>,
    pub year: Option<String>,
    pub poster: Option<String>,
}

/// A theatrical or recent horror release
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub title: Option<String>,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    pub overview: String,
}

/// A successful resolution together with the provider that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub provider: String,
    pub record: MovieRecord,
}

/// Take the year out of a `YYYY-MM-DD` date, `None` for empty dates
pub(crate) fn year_from_date(date: Option<&str>) -> Option<String> {
    date.filter(|d| !d.is_empty())
        .and_then(|d| d.split('-').next())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_defaults() {
        let record = MovieRecord::placeholder("Some Unknown Film");

        assert_eq!(record.title, "Some Unknown Film");
        assert_eq!(record.genres, "Horror");
        assert!(record.year.is_none());
        assert!(record.director.is_none());
        assert!(record.poster.is_none());
        assert!(record.plot.is_none());
        assert!(record.rating.is_none());
    }

    #[test]
    fn test_year_from_date() {
        assert_eq!(year_from_date(Some("1978-10-25")), Some("1978".to_string()));
        assert_eq!(year_from_date(Some("")), None);
        assert_eq!(year_from_date(None), None);
    }

    #[test]
    fn test_record_json_shape() {
        let json = serde_json::to_value(MovieRecord::placeholder("Saw")).unwrap();
        assert_eq!(json["title"], "Saw");
        assert_eq!(json["genres"], "Horror");
        assert!(json["poster"].is_null());
    }
}
