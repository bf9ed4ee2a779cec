//! Response generator: conversational text for a classified query.
//!
//! ## Flow
//! 1. `tell_me_more` with a movie advances that movie's depth stage
//! 2. No model configured -> canned text (stage template, category line,
//!    or the generic clarification prompt)
//! 3. Otherwise build the system prompt (stage prompt, or persona prompt plus
//!    a JSON knowledge snippet) and ask the model
//! 4. Model failure -> a fixed apology line
//!
//! `generate` never fails. `quiz` is the one operation that reports errors,
//! since its caller needs to tell "no model" from "unusable output".

use std::sync::Arc;

use llm_client::{ChatMessage, ChatModel, CompletionRequest, LlmError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::classifier::Category;
use crate::knowledge::{self, knowledge_for};
use crate::state::OracleState;

pub const CHAT_TEMPERATURE: f32 = 0.9;
pub const CHAT_MAX_TOKENS: u32 = 200;
pub const QUIZ_TEMPERATURE: f32 = 1.0;
pub const QUIZ_MAX_TOKENS: u32 = 800;

/// One multiple-choice question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("No language model configured")]
    Unavailable,

    #[error("Language model call failed: {0}")]
    Model(#[from] LlmError),

    #[error("Quiz output was not valid JSON: {0}")]
    Format(String),
}

pub struct ResponseGenerator {
    model: Option<Arc<dyn ChatModel>>,
    state: Arc<OracleState>,
}

impl ResponseGenerator {
    pub fn new(model: Option<Arc<dyn ChatModel>>, state: Arc<OracleState>) -> Self {
        Self { model, state }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Conversational reply for a query. Never fails.
    #[instrument(skip(self, query, category), fields(category = %category))]
    pub async fn generate(&self, query: &str, category: Category, movie_title: Option<&str>) -> String {
        let thread = match (category, movie_title) {
            (Category::TellMeMore, Some(title)) => Some((title, self.state.depth.advance(title))),
            _ => None,
        };

        let Some(model) = &self.model else {
            debug!("No model configured, using canned response");
            return match thread {
                Some((title, stage)) => knowledge::tell_me_more_fallback(stage, title),
                None => knowledge::canned_response(category)
                    .unwrap_or(knowledge::GENERIC_FALLBACK)
                    .to_string(),
            };
        };

        let system = match thread {
            Some((title, stage)) => knowledge::tell_me_more_prompt(stage, title, query),
            None => persona_prompt(category),
        };

        let request = CompletionRequest {
            messages: vec![ChatMessage::system(system), ChatMessage::user(query)],
            temperature: CHAT_TEMPERATURE,
            max_tokens: CHAT_MAX_TOKENS,
        };

        match model.complete(request).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Model {} failed: {}", model.model(), e);
                match thread {
                    Some((title, _)) => knowledge::tell_me_more_apology(title),
                    None => knowledge::DISTURBED_SPIRITS.to_string(),
                }
            }
        }
    }

    /// Ten multiple-choice questions about `movie`
    #[instrument(skip(self))]
    pub async fn quiz(&self, movie: &str) -> Result<Vec<QuizQuestion>, QuizError> {
        let model = self.model.as_ref().ok_or(QuizError::Unavailable)?;

        let request = CompletionRequest {
            messages: vec![ChatMessage::user(knowledge::quiz_prompt(movie))],
            temperature: QUIZ_TEMPERATURE,
            max_tokens: QUIZ_MAX_TOKENS,
        };

        let text = model.complete(request).await?;
        parse_quiz(&text)
    }
}

/// Persona prompt, with the category's knowledge appended as JSON
fn persona_prompt(category: Category) -> String {
    let mut prompt = knowledge::PERSONA_PROMPT.to_string();

    if let Some(entries) = knowledge_for(category) {
        match serde_json::to_string(entries) {
            Ok(json) => {
                prompt.push_str("\n\nRelevant movies for this category: ");
                prompt.push_str(&json);
            }
            Err(e) => warn!("Could not serialize {} knowledge: {}", category, e),
        }
    }

    prompt
}

/// Parse the model's quiz output, tolerating a Markdown code fence
pub fn parse_quiz(text: &str) -> Result<Vec<QuizQuestion>, QuizError> {
    let body = strip_code_fence(text.trim());
    serde_json::from_str(body).map_err(|e| QuizError::Format(e.to_string()))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json") on the opening fence line
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
