use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

pub const SYSTEM_PROMPT: &str = "Você é um assistente jurídico da Defensoria Pública, especializado em orientação para pessoas hipossuficientes.";

pub const SUMMARY_INSTRUCTION: &str = "Resuma juridicamente o seguinte texto com linguagem acessível:";

pub const TEMPERATURE: f64 = 0.7;

pub type CompletionResult = Result<String, CompletionError>;

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("missing credential")]
    MissingCredential,
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },
    #[error("Invalid JSON in response: {0}")]
    Parse(String),
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),
}

impl CompletionError {
    /// Flat tag reported to clients next to the human-readable message.
    pub fn kind(&self) -> &'static str {
        match self {
            CompletionError::MissingCredential => "configuration",
            CompletionError::Transport(_) => "transport",
            CompletionError::Api { .. } => "api",
            CompletionError::Parse(_) => "parse",
            CompletionError::UnexpectedShape(_) => "unexpected_shape",
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, CompletionError::MissingCredential)
    }

    pub fn status_code(&self) -> StatusCode {
        if self.is_configuration() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::BAD_GATEWAY
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
}

impl LlmClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Sends `prompt` as the user turn under the fixed legal-aid system
    /// instruction and returns the first choice's content.
    ///
    /// An empty `credential` short-circuits with
    /// [`CompletionError::MissingCredential`] before any network traffic.
    pub async fn complete(&self, prompt: &str, model: &str, credential: &str) -> CompletionResult {
        if credential.is_empty() {
            return Err(CompletionError::MissingCredential);
        }

        let request = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
        };

        tracing::debug!(model, prompt_chars = prompt.chars().count(), "sending chat completion");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", credential))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(error_response) => error_response.error.message,
                Err(_) if body.trim().is_empty() => "empty error body".to_string(),
                Err(_) => body,
            };
            return Err(CompletionError::Api { status, message });
        }

        parse_content(&body)
    }

    pub async fn summarize(&self, text: &str, model: &str, credential: &str) -> CompletionResult {
        let prompt = format!("{}\n\n{}", SUMMARY_INSTRUCTION, text);
        self.complete(&prompt, model, credential).await
    }
}

fn parse_content(body: &str) -> CompletionResult {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| CompletionError::Parse(e.to_string()))?;

    let chat_response: ChatResponse =
        serde_json::from_value(value).map_err(|e| CompletionError::UnexpectedShape(e.to_string()))?;

    chat_response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| CompletionError::UnexpectedShape("No choices in response".to_string()))?
        .message
        .content
        .ok_or_else(|| CompletionError::UnexpectedShape("Choice has no message content".to_string()))
}
