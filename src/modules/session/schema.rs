use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::ai::model::LlmModel;
use crate::modules::ai::schema::not_blank;
use crate::modules::session::model::Speaker;

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(custom(function = "not_blank"))]
    pub message: String,
    pub model: Option<LlmModel>,
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub messages: Vec<EntryResponse>,
    pub message_count: usize,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct EntryResponse {
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub data: Vec<SessionSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub id: String,
    pub message_count: usize,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub message: EntryResponse,
    pub response: EntryResponse,
    pub model: LlmModel,
    /// Set when `response` carries an error report instead of an answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
}
