use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

use crate::modules::ai::model::LlmModel;
use crate::services::llm::DEFAULT_BASE_URL;

pub const DEFAULT_PREVIEW_CHARS: usize = 2000;
pub const DEFAULT_SUMMARY_INPUT_CHARS: usize = 8000;
pub const DEFAULT_MAX_UPLOAD_MB: usize = 200;
pub const DEFAULT_SESSION_IDLE_MINUTES: u64 = 720;

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub groq_base_url: String,
    /// Used when a request does not carry its own key.
    pub default_api_key: Option<String>,
    pub default_model: LlmModel,
    pub preview_chars: usize,
    pub summary_input_chars: usize,
    pub max_upload_bytes: usize,
    /// Sessions idle for longer are swept. Zero keeps them forever.
    pub session_idle_minutes: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            groq_base_url: DEFAULT_BASE_URL.to_string(),
            default_api_key: None,
            default_model: LlmModel::default(),
            preview_chars: DEFAULT_PREVIEW_CHARS,
            summary_input_chars: DEFAULT_SUMMARY_INPUT_CHARS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            session_idle_minutes: DEFAULT_SESSION_IDLE_MINUTES,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let default_model = match env::var("DEFAULT_MODEL") {
            Ok(name) => LlmModel::from_str(&name).with_context(|| "DEFAULT_MODEL is not a supported model")?,
            Err(_) => defaults.default_model,
        };

        let max_upload_mb: usize = parse_var("MAX_UPLOAD_MB", DEFAULT_MAX_UPLOAD_MB)?;

        Ok(Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port)?,
            groq_base_url: env::var("GROQ_BASE_URL").unwrap_or(defaults.groq_base_url),
            default_api_key: env::var("GROQ_API_KEY").ok().filter(|key| !key.is_empty()),
            default_model,
            preview_chars: parse_var("PREVIEW_CHARS", defaults.preview_chars)?,
            summary_input_chars: parse_var("SUMMARY_INPUT_CHARS", defaults.summary_input_chars)?,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            session_idle_minutes: parse_var("SESSION_IDLE_MINUTES", defaults.session_idle_minutes)?,
        })
    }

    pub fn session_idle_window(&self) -> Option<chrono::Duration> {
        match self.session_idle_minutes {
            0 => None,
            minutes => Some(chrono::Duration::minutes(minutes as i64)),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Request key if present and non-empty, else the configured default.
    pub fn resolve_api_key(&self, requested: Option<String>) -> String {
        requested
            .filter(|key| !key.is_empty())
            .or_else(|| self.default_api_key.clone())
            .unwrap_or_default()
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number, got {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.preview_chars, 2000);
        assert_eq!(settings.summary_input_chars, 8000);
        assert_eq!(settings.default_model, LlmModel::Llama3_70b);
        assert_eq!(settings.bind_address(), "0.0.0.0:8080");
        assert_eq!(settings.session_idle_window(), Some(chrono::Duration::hours(12)));
    }

    #[test]
    fn test_zero_idle_minutes_disables_sweep() {
        let settings = Settings {
            session_idle_minutes: 0,
            ..Settings::default()
        };
        assert_eq!(settings.session_idle_window(), None);
    }

    #[test]
    fn test_resolve_api_key_prefers_request() {
        let settings = Settings {
            default_api_key: Some("from-env".to_string()),
            ..Settings::default()
        };

        assert_eq!(settings.resolve_api_key(Some("from-request".to_string())), "from-request");
        assert_eq!(settings.resolve_api_key(Some(String::new())), "from-env");
        assert_eq!(settings.resolve_api_key(None), "from-env");
        assert_eq!(Settings::default().resolve_api_key(None), "");
    }
}
