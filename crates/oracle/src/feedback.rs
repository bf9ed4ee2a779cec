//! Community feedback: ratings, reviews and horror stats per title.
//!
//! In-memory only; everything is lost on restart. Titles are keyed
//! case-insensitively.
//!
//! Rust concept: each map sits behind its own `parking_lot::Mutex`, so a
//! rating submission never waits on a review submission.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::knowledge::curated_stats;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;
pub const MAX_REVIEW_CHARS: usize = 500;
pub const MAX_REVIEWS_PER_TITLE: usize = 10;
pub const RECENT_REVIEWS_SHOWN: usize = 5;
pub const ANONYMOUS_USER: &str = "Anonymous";

#[derive(Error, Debug, PartialEq)]
pub enum FeedbackError {
    #[error("{0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, FeedbackError>;

/// Reply to a rating submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    pub average_rating: f64,
    pub total_ratings: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub user: String,
}

/// Gore (0-100), fear (out of 10) and body count for a title
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorrorStats {
    pub gore: u32,
    pub fear: f64,
    pub kills: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingStats {
    pub average: f64,
    pub count: usize,
}

/// Everything the stats panel shows for a title
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieStats {
    pub rating: RatingStats,
    pub reviews: Vec<Review>,
    pub stats: HorrorStats,
}

#[derive(Debug, Default)]
pub struct FeedbackStore {
    ratings: Mutex<HashMap<String, Vec<i64>>>,
    reviews: Mutex<HashMap<String, VecDeque<Review>>>,
}

impl FeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a 1-5 rating and return the running average
    pub fn submit_rating(&self, title: &str, rating: i64) -> Result<RatingSummary> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(FeedbackError::Validation(format!(
                "Rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }

        let mut ratings = self.ratings.lock();
        let list = ratings.entry(feedback_key(title)).or_default();
        list.push(rating);

        debug!("Rating {} recorded for '{}' ({} total)", rating, title, list.len());
        Ok(RatingSummary {
            average_rating: average(list),
            total_ratings: list.len(),
        })
    }

    /// Store a review, evicting the oldest past ten; returns the stored count
    pub fn submit_review(&self, title: &str, text: &str) -> Result<usize> {
        if text.trim().is_empty() {
            return Err(FeedbackError::Validation("Review text required".to_string()));
        }
        if text.chars().count() > MAX_REVIEW_CHARS {
            return Err(FeedbackError::Validation(format!(
                "Review must be {} characters or less",
                MAX_REVIEW_CHARS
            )));
        }

        let review = Review {
            text: text.to_string(),
            timestamp: Utc::now(),
            user: ANONYMOUS_USER.to_string(),
        };

        let mut reviews = self.reviews.lock();
        let list = reviews.entry(feedback_key(title)).or_default();
        list.push_back(review);
        if list.len() > MAX_REVIEWS_PER_TITLE {
            list.pop_front();
        }

        Ok(list.len())
    }

    /// Rating summary, the five newest reviews, and horror stats
    pub fn get_stats(&self, title: &str) -> MovieStats {
        let key = feedback_key(title);

        let rating = {
            let ratings = self.ratings.lock();
            let list = ratings.get(&key).map(Vec::as_slice).unwrap_or_default();
            RatingStats {
                average: average(list),
                count: list.len(),
            }
        };

        let reviews = {
            let reviews = self.reviews.lock();
            reviews
                .get(&key)
                .map(|list| {
                    let skip = list.len().saturating_sub(RECENT_REVIEWS_SHOWN);
                    list.iter().skip(skip).cloned().collect()
                })
                .unwrap_or_default()
        };

        MovieStats {
            rating,
            reviews,
            stats: horror_stats(&key),
        }
    }
}

fn feedback_key(title: &str) -> String {
    title.trim().to_lowercase()
}

/// One decimal place, ties to even
fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

fn average(ratings: &[i64]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    round1(ratings.iter().sum::<i64>() as f64 / ratings.len() as f64)
}

/// Curated stats when known, otherwise stats derived from the title itself
pub fn horror_stats(normalized_title: &str) -> HorrorStats {
    curated_stats(normalized_title).unwrap_or_else(|| synthesized_stats(normalized_title))
}

/// Pseudo-random but stable: the same title always gets the same numbers
fn synthesized_stats(normalized_title: &str) -> HorrorStats {
    let mut rng = StdRng::seed_from_u64(fnv1a(normalized_title.as_bytes()));
    HorrorStats {
        gore: rng.random_range(20..=95),
        fear: round1(rng.random_range(5.0..=10.0)),
        kills: rng.random_range(1..=25),
    }
}

/// 64-bit FNV-1a
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(PRIME))
}
