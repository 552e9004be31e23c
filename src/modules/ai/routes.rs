use axum::{
    routing::{get, post},
    Router,
};

use crate::modules::ai::controller;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/ai/complete", post(controller::complete))
        .route("/api/ai/config", get(controller::config))
}
