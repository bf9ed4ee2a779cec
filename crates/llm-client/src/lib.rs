//! Language-model client for the oracle's conversational responses.
//!
//! This crate provides:
//! - The `ChatModel` trait the response generator talks to
//! - `OpenAiClient`, a chat-completions implementation over reqwest
//! - Error types for transport failures, API errors and malformed replies
//!
//! Callers are expected to treat every `LlmError` as "no model available"
//! and fall back to canned text; nothing here retries.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

/// Errors that can occur when calling the language model
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Failed to reach language model: {0}")]
    ConnectionError(String),

    #[error("Language model returned status {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Invalid response from language model: {0}")]
    InvalidResponse(String),
}

/// A single chat message (`system`, `user` or `assistant`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Everything needed for one completion call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Chat-completion capability.
///
/// `Send + Sync` so one client can be shared behind an `Arc` by every
/// request handler.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier (for logging)
    fn model(&self) -> &str;

    /// Run a completion and return the assistant's text
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}

// =============================================================================
// OpenAI chat completions
// =============================================================================

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for the OpenAI chat-completions endpoint.
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";
    pub const DEFAULT_MODEL: &'static str = "gpt-4o-mini";

    /// Build a client with its own connection pool and request timeout.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::ConnectionError(e.to_string()))?;
        let model = model.into();
        info!("Language model client ready (model: {})", model);

        Ok(Self {
            http,
            api_key: api_key.into(),
            model,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different API root (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        debug!(
            "Requesting completion ({} messages, temperature {}, max_tokens {})",
            request.messages.len(),
            request.temperature,
            request.max_tokens
        );

        let body = ChatCompletionBody {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Language model request failed: {}", e);
                LlmError::ConnectionError(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| LlmError::InvalidResponse("No completion choices returned".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    type Captured = Arc<Mutex<Option<Value>>>;

    async fn start_mock_openai(reply: Value, status: StatusCode) -> (String, Captured) {
        let captured: Captured = Arc::new(Mutex::new(None));
        let app = Router::new()
            .route(
                "/chat/completions",
                post(
                    move |State(seen): State<Captured>, Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            *seen.lock().unwrap() = Some(body);
                            (status, Json(reply))
                        }
                    },
                ),
            )
            .with_state(captured.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), captured)
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            messages: vec![
                ChatMessage::system("You are the Horror Oracle"),
                ChatMessage::user("zombie movies?"),
            ],
            temperature: 0.9,
            max_tokens: 200,
        }
    }

    #[test]
    fn test_message_constructors() {
        assert_eq!(ChatMessage::system("a").role, "system");
        assert_eq!(ChatMessage::user("b").role, "user");
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let reply = json!({
            "choices": [{"message": {"role": "assistant", "content": "Train to Busan, obviously."}}]
        });
        let (addr, captured) = start_mock_openai(reply, StatusCode::OK).await;

        let client = OpenAiClient::new("sk-test", "gpt-4o-mini", Duration::from_secs(3))
            .unwrap()
            .with_base_url(addr);
        let text = client.complete(request()).await.unwrap();

        assert_eq!(text, "Train to Busan, obviously.");

        let body = captured.lock().unwrap().clone().unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 200);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "zombie movies?");
        assert!((body["temperature"].as_f64().unwrap() - 0.9).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let (addr, _) =
            start_mock_openai(json!({"error": "bad key"}), StatusCode::UNAUTHORIZED).await;

        let client = OpenAiClient::new("sk-bad", "gpt-4o-mini", Duration::from_secs(3))
            .unwrap()
            .with_base_url(addr);
        let err = client.complete(request()).await.unwrap_err();

        assert!(matches!(err, LlmError::ApiError { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_empty_choices_is_invalid() {
        let (addr, _) = start_mock_openai(json!({"choices": []}), StatusCode::OK).await;

        let client = OpenAiClient::new("sk-test", "gpt-4o-mini", Duration::from_secs(3))
            .unwrap()
            .with_base_url(addr);
        let err = client.complete(request()).await.unwrap_err();

        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        // Nothing listens on port 9 locally
        let client = OpenAiClient::new("sk-test", "gpt-4o-mini", Duration::from_millis(500))
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let err = client.complete(request()).await.unwrap_err();

        assert!(matches!(err, LlmError::ConnectionError(_)));
    }
}
