use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown model: {0}")]
pub struct UnknownModel(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LlmModel {
    #[serde(rename = "llama3-70b-8192")]
    Llama3_70b,
    #[serde(rename = "llama3-8b-8192")]
    Llama3_8b,
    #[serde(rename = "mixtral-8x7b-32768")]
    Mixtral8x7b,
    #[serde(rename = "gemma-7b-it")]
    Gemma7b,
}

impl LlmModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmModel::Llama3_70b => "llama3-70b-8192",
            LlmModel::Llama3_8b => "llama3-8b-8192",
            LlmModel::Mixtral8x7b => "mixtral-8x7b-32768",
            LlmModel::Gemma7b => "gemma-7b-it",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LlmModel::Llama3_70b => "Llama 3 70B",
            LlmModel::Llama3_8b => "Llama 3 8B",
            LlmModel::Mixtral8x7b => "Mixtral 8x7B",
            LlmModel::Gemma7b => "Gemma 7B Instruct",
        }
    }

    pub fn context_length(&self) -> u32 {
        match self {
            LlmModel::Llama3_70b | LlmModel::Llama3_8b | LlmModel::Gemma7b => 8192,
            LlmModel::Mixtral8x7b => 32768,
        }
    }

    pub fn all() -> Vec<LlmModel> {
        vec![
            LlmModel::Llama3_70b,
            LlmModel::Llama3_8b,
            LlmModel::Mixtral8x7b,
            LlmModel::Gemma7b,
        ]
    }
}

impl Default for LlmModel {
    fn default() -> Self {
        LlmModel::Llama3_70b
    }
}

impl fmt::Display for LlmModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LlmModel {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        LlmModel::all()
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownModel(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Chat,
    Summarizer,
}

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Page::Chat => "Chatbot Jurídico",
            Page::Summarizer => "Sumarizador Jurídico",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Page::Chat => "Assistente jurídico da Defensoria Pública para dúvidas jurídicas.",
            Page::Summarizer => "Envie arquivos PDF ou TXT para obter um resumo jurídico de cada documento.",
        }
    }

    pub fn all() -> Vec<Page> {
        vec![Page::Chat, Page::Summarizer]
    }
}
