use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};

use crate::config::settings::Settings;
use crate::modules::session::store::SessionStore;
use crate::services::llm::LlmClient;

pub mod config;
pub mod modules;
pub mod services;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub llm: LlmClient,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            llm: LlmClient::new(settings.groq_base_url.clone()),
            settings: Arc::new(settings),
            sessions: SessionStore::new(),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let upload_limit = state.settings.max_upload_bytes;

    Router::new()
        .merge(modules::ai::routes::routes())
        .merge(modules::session::routes::routes())
        .merge(modules::summarizer::routes::routes())
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
