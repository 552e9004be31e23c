use axum::{routing::post, Router};

use crate::modules::summarizer::controller;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/summarizer/extract", post(controller::extract))
        .route("/api/summarizer/summarize", post(controller::summarize))
}
