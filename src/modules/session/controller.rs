use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::modules::ai::schema::MessageResponse;
use crate::modules::session::{
    model::{Session, TranscriptEntry},
    schema::{ChatRequest, ChatResponse, EntryResponse, SessionListResponse, SessionResponse, SessionSummary},
};
use crate::AppState;

const LIST_LIMIT: usize = 50;

type ApiError = (StatusCode, Json<MessageResponse>);

fn to_entry_response(e: &TranscriptEntry) -> EntryResponse {
    EntryResponse {
        speaker: e.speaker,
        text: e.text.clone(),
        timestamp: e.timestamp.to_rfc3339(),
    }
}

fn to_session_response(s: &Session) -> SessionResponse {
    SessionResponse {
        id: s.id.to_string(),
        messages: s.transcript.entries().iter().map(to_entry_response).collect(),
        message_count: s.transcript.len(),
        created_at: s.created_at.to_rfc3339(),
        updated_at: s.updated_at.to_rfc3339(),
    }
}

fn to_session_summary(s: &Session) -> SessionSummary {
    SessionSummary {
        id: s.id.to_string(),
        message_count: s.transcript.len(),
        created_at: s.created_at.to_rfc3339(),
        updated_at: s.updated_at.to_rfc3339(),
    }
}

fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(MessageResponse::new("Invalid ID format")),
        )
    })
}

fn not_found() -> ApiError {
    (StatusCode::NOT_FOUND, Json(MessageResponse::new("Session not found")))
}

pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionResponse>) {
    let session = state.sessions.create().await;
    tracing::info!(session_id = %session.id, "session created");
    (StatusCode::CREATED, Json(to_session_response(&session)))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let id = parse_id(&id)?;

    match state.sessions.find_by_id(&id).await {
        Some(s) => Ok(Json(to_session_response(&s))),
        None => Err(not_found()),
    }
}

pub async fn list_sessions(State(state): State<AppState>) -> Json<SessionListResponse> {
    let sessions = state.sessions.find_all(LIST_LIMIT).await;
    let total = state.sessions.count().await;

    Json(SessionListResponse {
        data: sessions.iter().map(to_session_summary).collect(),
        total,
    })
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;

    if state.sessions.delete(&id).await {
        tracing::info!(session_id = %id, "session ended");
        Ok(Json(MessageResponse::new("Deleted successfully")))
    } else {
        Err(not_found())
    }
}

/// Sends one question to the completion endpoint and records the exchange.
///
/// Completion failures do not fail the request: the error text takes the
/// place of the answer in the transcript, as the user would see it.
pub async fn chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if let Err(e) = payload.validate() {
        return Err((StatusCode::BAD_REQUEST, Json(MessageResponse::new(e.to_string()))));
    }

    let id = parse_id(&id)?;

    if !state.sessions.exists(&id).await {
        return Err(not_found());
    }

    let model = payload.model.unwrap_or(state.settings.default_model);
    let api_key = state.settings.resolve_api_key(payload.api_key);

    let (reply, error_kind) = match state.llm.complete(&payload.message, model.as_str(), &api_key).await {
        Ok(content) => (content, None),
        Err(e) => {
            tracing::warn!(session_id = %id, %model, kind = e.kind(), error = %e, "chat completion failed");
            (e.to_string(), Some(e.kind()))
        }
    };

    let (user, assistant) = state
        .sessions
        .record_exchange(&id, payload.message, reply)
        .await
        .ok_or_else(not_found)?;

    Ok(Json(ChatResponse {
        session_id: id.to_string(),
        message: to_entry_response(&user),
        response: to_entry_response(&assistant),
        model,
        error_kind,
    }))
}
