use axum::{
    routing::{get, post},
    Router,
};

use crate::modules::session::controller;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/session", post(controller::create_session))
        .route(
            "/api/session/{id}",
            get(controller::get_session).delete(controller::delete_session),
        )
        .route("/api/session/{id}/chat", post(controller::chat))
        .route("/api/sessions", get(controller::list_sessions))
}
