use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::modules::ai::model::{LlmModel, Page};

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Message cannot be blank".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
pub struct CompleteRequest {
    #[validate(custom(function = "not_blank"))]
    pub prompt: String,
    pub model: Option<LlmModel>,
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AiResponse {
    pub model: LlmModel,
    pub content: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub models: Vec<ModelInfo>,
    pub pages: Vec<PageInfo>,
    pub default_model: LlmModel,
    pub has_default_api_key: bool,
    pub preview_chars: usize,
    pub summary_input_chars: usize,
}

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub id: LlmModel,
    pub name: String,
    pub context_length: u32,
}

#[derive(Debug, Serialize)]
pub struct PageInfo {
    pub id: Page,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: None,
        }
    }
}
