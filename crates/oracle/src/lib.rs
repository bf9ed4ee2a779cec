//! Conversation logic for the Horror Oracle.
//!
//! This crate provides:
//! - The intent classifier (ordered keyword rules -> `Category`)
//! - The response generator (language model with canned fallbacks)
//! - The conversation depth tracker for "tell me more" threads
//! - The community feedback store (ratings, reviews, horror stats)
//! - Bundled knowledge: prompts, category snippets, genre shelves
//!
//! ## Architecture
//! A query flows through the crate in two steps:
//! 1. `classify` picks a category from the raw text
//! 2. `ResponseGenerator::generate` turns query + category into text
//!
//! Mutable stores live in `OracleState`, shared behind an `Arc`.
//!
//! ## Example Usage
//! ```ignore
//! use oracle::{classify, detect_discussed_movie, OracleState, ResponseGenerator};
//! use std::sync::Arc;
//!
//! let state = Arc::new(OracleState::new());
//! let generator = ResponseGenerator::new(None, state.clone());
//!
//! let query = "tell me more about Halloween";
//! let category = classify(query);
//! let movie = detect_discussed_movie(query);
//! let text = generator.generate(query, category, movie.as_deref()).await;
//! ```

pub mod classifier;
pub mod depth;
pub mod feedback;
pub mod knowledge;
pub mod responder;
pub mod state;

// Re-export main types
pub use classifier::{classify, detect_discussed_movie, Category, IntentRule, INTENT_RULES};
pub use depth::DepthTracker;
pub use feedback::{
    FeedbackError, FeedbackStore, HorrorStats, MovieStats, RatingStats, RatingSummary, Review,
};
pub use knowledge::{genre_shelf, GenreShelf, GENRE_SHELVES};
pub use responder::{QuizError, QuizQuestion, ResponseGenerator};
pub use state::OracleState;
