//! Conversation depth: how far a "tell me more" thread about a movie has gone.
//!
//! Each follow-up moves the movie to the next stage, 1 through 4, then wraps
//! back to 1. Counters are created lazily and live for the process lifetime.

use parking_lot::Mutex;
use std::collections::HashMap;

/// Number of distinct follow-up stages
pub const STAGES: u8 = 4;

#[derive(Debug, Default)]
pub struct DepthTracker {
    stages: Mutex<HashMap<String, u8>>,
}

impl DepthTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `movie_title` to its next stage and return it (1..=4)
    pub fn advance(&self, movie_title: &str) -> u8 {
        let mut stages = self.stages.lock();
        let stage = stages.entry(movie_title.to_lowercase()).or_insert(0);
        *stage = (*stage % STAGES) + 1;
        *stage
    }

    /// Current stage, `None` if the movie was never discussed
    pub fn current(&self, movie_title: &str) -> Option<u8> {
        self.stages.lock().get(&movie_title.to_lowercase()).copied()
    }
}
