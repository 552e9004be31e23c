use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use validator::Validate;

use crate::modules::ai::{
    model::{LlmModel, Page},
    schema::{AiResponse, CompleteRequest, ConfigResponse, MessageResponse, ModelInfo, PageInfo},
};
use crate::AppState;

pub async fn complete(
    State(state): State<AppState>,
    Json(payload): Json<CompleteRequest>,
) -> Result<Json<AiResponse>, (StatusCode, Json<MessageResponse>)> {
    if let Err(e) = payload.validate() {
        return Err((StatusCode::BAD_REQUEST, Json(MessageResponse::new(e.to_string()))));
    }

    let model = payload.model.unwrap_or(state.settings.default_model);
    let api_key = state.settings.resolve_api_key(payload.api_key);

    let content = state
        .llm
        .complete(&payload.prompt, model.as_str(), &api_key)
        .await
        .map_err(|e| {
            tracing::warn!(%model, kind = e.kind(), error = %e, "completion failed");
            (
                e.status_code(),
                Json(MessageResponse {
                    message: e.to_string(),
                    kind: Some(e.kind()),
                }),
            )
        })?;

    tracing::info!(%model, "completion served");

    Ok(Json(AiResponse {
        model,
        content,
        created_at: Utc::now().to_rfc3339(),
    }))
}

pub async fn config(State(state): State<AppState>) -> Json<ConfigResponse> {
    let models = LlmModel::all()
        .into_iter()
        .map(|m| ModelInfo {
            id: m,
            name: m.display_name().to_string(),
            context_length: m.context_length(),
        })
        .collect();

    let pages = Page::all()
        .into_iter()
        .map(|p| PageInfo {
            id: p,
            title: p.title().to_string(),
            description: p.description().to_string(),
        })
        .collect();

    Json(ConfigResponse {
        models,
        pages,
        default_model: state.settings.default_model,
        has_default_api_key: state.settings.default_api_key.is_some(),
        preview_chars: state.settings.preview_chars,
        summary_input_chars: state.settings.summary_input_chars,
    })
}
