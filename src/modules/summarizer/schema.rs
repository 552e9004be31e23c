use serde::Serialize;

use crate::modules::ai::model::LlmModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Extracted,
    Empty,
    Unsupported,
    Failed,
}

#[derive(Debug, Serialize)]
pub struct DocumentReport {
    pub name: String,
    pub mime_type: String,
    pub status: DocumentStatus,
    pub characters: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    /// Warning or error shown in place of the content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub documents: Vec<DocumentReport>,
    pub extracted: usize,
    pub failed: usize,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub model: LlmModel,
    pub documents: Vec<DocumentReport>,
    pub summarized: usize,
}
