//! Intent classifier: ordered keyword rules over the lowercased query.
//!
//! Rules are evaluated top to bottom and the first rule with any keyword
//! contained in the query wins. Matching is plain substring containment, so
//! "killer" also hits the `weird_kills` rule through "kill" before the
//! `slashers` rule is ever reached.
//!
//! ## Fallback
//! No rule matched: queries of at most five words are treated as a movie
//! title (`specific_movie`), anything longer as `general` chat.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the user is asking about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    TellMeMore,
    Bloodiest,
    WeirdKills,
    Nudity,
    Zombies,
    Vampires,
    Slashers,
    Recommendation,
    Scariest,
    SpecificMovie,
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::TellMeMore => "tell_me_more",
            Category::Bloodiest => "bloodiest",
            Category::WeirdKills => "weird_kills",
            Category::Nudity => "nudity",
            Category::Zombies => "zombies",
            Category::Vampires => "vampires",
            Category::Slashers => "slashers",
            Category::Recommendation => "recommendation",
            Category::Scariest => "scariest",
            Category::SpecificMovie => "specific_movie",
            Category::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classification rule: any keyword present selects the category
#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub category: Category,
    pub keywords: &'static [&'static str],
}

impl IntentRule {
    /// `query` must already be lowercased
    pub fn matches(&self, query: &str) -> bool {
        self.keywords.iter().any(|keyword| query.contains(keyword))
    }
}

/// Rules in evaluation order
pub const INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        category: Category::TellMeMore,
        keywords: &["tell me more", "more details", "more about", "obscure details"],
    },
    IntentRule {
        category: Category::Bloodiest,
        keywords: &["blood", "bloody", "bloodiest", "gore", "gory", "goriest"],
    },
    IntentRule {
        category: Category::WeirdKills,
        keywords: &["weird", "bizarre", "strange", "crazy", "kill", "death"],
    },
    IntentRule {
        category: Category::Nudity,
        keywords: &["nude", "nudity", "naked", "sex"],
    },
    IntentRule {
        category: Category::Zombies,
        keywords: &["zombie", "undead", "walking dead"],
    },
    IntentRule {
        category: Category::Vampires,
        keywords: &["vampire", "dracula", "bloodsucker"],
    },
    IntentRule {
        category: Category::Slashers,
        keywords: &["slasher", "killer", "masked"],
    },
    IntentRule {
        category: Category::Recommendation,
        keywords: &["recommend", "suggest", "similar", "like"],
    },
    IntentRule {
        category: Category::Scariest,
        keywords: &["scary", "scariest", "terrifying", "frightening"],
    },
];

/// Longest query still treated as a bare movie title
pub const MAX_TITLE_WORDS: usize = 5;

/// Titles recognised in "tell me more" follow-ups, in match order
pub const DISCUSSED_MOVIES: &[&str] = &[
    "saw",
    "halloween",
    "scream",
    "the conjuring",
    "the exorcist",
    "insidious",
    "sinister",
    "hereditary",
    "midsommar",
    "get out",
    "friday the 13th",
    "nightmare on elm street",
    "texas chainsaw massacre",
    "child's play",
    "evil dead",
    "hellraiser",
    "candyman",
];

/// Classify a free-text query. Never fails.
pub fn classify(query: &str) -> Category {
    let query = query.to_lowercase();

    if let Some(rule) = INTENT_RULES.iter().find(|rule| rule.matches(&query)) {
        return rule.category;
    }

    if query.split_whitespace().count() <= MAX_TITLE_WORDS {
        Category::SpecificMovie
    } else {
        Category::General
    }
}

/// Find which well-known movie a follow-up query is about.
///
/// Returns the first listed title contained in the query, in title case.
pub fn detect_discussed_movie(query: &str) -> Option<String> {
    let query = query.to_lowercase();
    DISCUSSED_MOVIES
        .iter()
        .find(|movie| query.contains(*movie))
        .map(|movie| title_case(movie))
}

/// Capitalise the first letter of every word ("child's play" -> "Child's Play")
fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
