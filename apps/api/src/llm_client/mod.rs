/// LLM Client: the single point of entry for every text-generation call in Pitchmail.
///
/// ARCHITECTURAL RULE: No other module may call the chat completions API directly.
///
/// Each `generate` call issues exactly one request. Nothing here retries; the caller
/// decides what to do with a failure.
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

/// The model used for all generation calls. Hardcoded to keep output style stable.
pub const MODEL: &str = "gpt-3.5-turbo";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 500;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("credential rejected (status {status})")]
    Auth { status: u16 },

    #[error("rate limited by provider")]
    RateLimited,

    #[error("API error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Coarse failure category. Each kind maps to exactly one user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationErrorKind {
    Auth,
    RateLimit,
    Upstream,
    Network,
}

impl GenerationErrorKind {
    pub fn user_message(self) -> &'static str {
        match self {
            GenerationErrorKind::Auth => {
                "Invalid API key. Please check your API key in settings."
            }
            GenerationErrorKind::RateLimit => "API rate limit exceeded. Please try again later.",
            GenerationErrorKind::Upstream => {
                "The AI service returned an error. Please try again later."
            }
            GenerationErrorKind::Network => {
                "Network error. Please check your internet connection."
            }
        }
    }
}

impl LlmError {
    pub fn kind(&self) -> GenerationErrorKind {
        match self {
            LlmError::Auth { .. } => GenerationErrorKind::Auth,
            LlmError::RateLimited => GenerationErrorKind::RateLimit,
            LlmError::Upstream { .. } | LlmError::Malformed(_) => GenerationErrorKind::Upstream,
            LlmError::Network(_) => GenerationErrorKind::Network,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
    pub error: Option<ProviderErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct ProviderErrorBody {
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

impl ChatResponse {
    /// Text of the first choice, trimmed. `None` when the provider sent nothing usable.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Client for an OpenAI-compatible chat completions API.
/// The credential is supplied per call because it belongs to the user's profile.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
}

impl LlmClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Sends one prompt and returns the generated text.
    pub async fn generate(&self, prompt: &str, credential: &str) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompts::EMAIL_WRITER_SYSTEM,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        debug!(
            "Sending generation request with key {}",
            mask_credential(credential)
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(credential)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::Malformed(format!("invalid JSON: {e}")))?;

        if let Some(err) = parsed.error.as_ref() {
            warn!("LLM API reported an error in a success response: {}", err.message);
            return Err(LlmError::Upstream {
                status: status.as_u16(),
                message: err.message.clone(),
            });
        }

        if let Some(usage) = parsed.usage.as_ref() {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        parsed
            .text()
            .map(str::to_string)
            .ok_or_else(|| LlmError::Malformed("response has no message content".to_string()))
    }

    /// Checks a credential with a cheap authenticated GET.
    pub async fn validate_credential(&self, credential: &str) -> Result<(), LlmError> {
        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(credential)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_failure(status, &body))
    }
}

fn classify_failure(status: StatusCode, body: &str) -> LlmError {
    let message = serde_json::from_str::<ProviderError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());

    warn!("LLM API returned {}: {}", status, message);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Auth {
            status: status.as_u16(),
        },
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited,
        _ => LlmError::Upstream {
            status: status.as_u16(),
            message,
        },
    }
}

/// Short, log-safe rendering of a credential.
pub fn mask_credential(credential: &str) -> String {
    if credential.is_empty() {
        return "<none>".to_string();
    }
    let prefix: String = credential.chars().take(6).collect();
    format!("{prefix}...")
}
