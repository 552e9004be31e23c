use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};

use crate::modules::ai::{model::LlmModel, schema::MessageResponse};
use crate::modules::summarizer::schema::{DocumentReport, DocumentStatus, ExtractResponse, SummarizeResponse};
use crate::services::extractor::{self, DocumentKind, ExtractedDocument, ExtractionError, UploadedFile};
use crate::AppState;

type ApiError = (StatusCode, Json<MessageResponse>);

struct UploadForm {
    files: Vec<UploadedFile>,
    api_key: Option<String>,
    model: Option<LlmModel>,
}

fn bad_request(message: String) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(MessageResponse::new(message)))
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm {
        files: Vec::new(),
        api_key: None,
        model: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Failed to read multipart: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" | "files" => {
                let file_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| format!("document-{}", form.files.len() + 1));
                let mime_type = field.content_type().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(format!("Failed to read file: {}", e)))?;

                form.files.push(UploadedFile {
                    name: file_name,
                    mime_type,
                    bytes: data.to_vec(),
                });
            }
            "api_key" => {
                let key = field
                    .text()
                    .await
                    .map_err(|e| bad_request(format!("Failed to read api_key: {}", e)))?;
                form.api_key = Some(key);
            }
            "model" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| bad_request(format!("Failed to read model: {}", e)))?;
                let model = raw.parse::<LlmModel>().map_err(|e| bad_request(e.to_string()))?;
                form.model = Some(model);
            }
            _ => {}
        }
    }

    if form.files.is_empty() {
        return Err(bad_request("No files provided".to_string()));
    }

    Ok(form)
}

fn to_report(
    file: &UploadedFile,
    result: &Result<ExtractedDocument, ExtractionError>,
    preview_chars: usize,
) -> DocumentReport {
    let mut report = DocumentReport {
        name: file.name.clone(),
        mime_type: file.mime_type.clone(),
        status: DocumentStatus::Failed,
        characters: 0,
        preview: None,
        message: None,
        summary: None,
        summary_error: None,
    };

    match result {
        Ok(doc) if doc.kind == DocumentKind::Unsupported => {
            report.status = DocumentStatus::Unsupported;
            report.message = Some(format!(
                "Unsupported file type `{}` for `{}`; only PDF and TXT files are accepted.",
                doc.mime_type, doc.name
            ));
        }
        Ok(doc) if doc.is_empty() => {
            report.status = DocumentStatus::Empty;
            report.message = Some(format!("No content extracted from `{}`.", doc.name));
        }
        Ok(doc) => {
            report.status = DocumentStatus::Extracted;
            report.characters = doc.char_count();
            report.preview = Some(extractor::truncate_chars(&doc.text, preview_chars).to_string());
        }
        Err(e) => {
            report.message = Some(e.to_string());
        }
    }

    report
}

type Extraction = (Vec<UploadedFile>, Vec<Result<ExtractedDocument, ExtractionError>>);

/// PDF parsing is CPU-bound, so it runs on the blocking pool. Files are
/// still handled one after another.
async fn extract_off_runtime(files: Vec<UploadedFile>) -> Result<Extraction, ApiError> {
    tokio::task::spawn_blocking(move || {
        let results = extractor::extract_all(&files);
        (files, results)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "extraction task failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageResponse::new(format!("Extraction task failed: {}", e))),
        )
    })
}

pub async fn extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, ApiError> {
    let form = read_form(multipart).await?;
    let (files, results) = extract_off_runtime(form.files).await?;

    let documents: Vec<DocumentReport> = files
        .iter()
        .zip(results.iter())
        .map(|(file, result)| to_report(file, result, state.settings.preview_chars))
        .collect();

    let extracted = documents
        .iter()
        .filter(|d| d.status == DocumentStatus::Extracted)
        .count();
    let failed = documents
        .iter()
        .filter(|d| d.status == DocumentStatus::Failed)
        .count();

    tracing::info!(files = documents.len(), extracted, failed, "documents extracted");

    Ok(Json(ExtractResponse {
        documents,
        extracted,
        failed,
    }))
}

/// Extracts every upload and asks for one summary per readable document,
/// one call at a time in upload order.
pub async fn summarize(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let form = read_form(multipart).await?;
    let model = form.model.unwrap_or(state.settings.default_model);
    let api_key = state.settings.resolve_api_key(form.api_key);
    let (files, results) = extract_off_runtime(form.files).await?;

    let mut documents = Vec::with_capacity(files.len());
    let mut summarized = 0;

    for (file, result) in files.iter().zip(results.iter()) {
        let mut report = to_report(file, result, state.settings.preview_chars);

        if let (DocumentStatus::Extracted, Ok(doc)) = (report.status, result) {
            let input = extractor::truncate_chars(&doc.text, state.settings.summary_input_chars);

            match state.llm.summarize(input, model.as_str(), &api_key).await {
                Ok(summary) => {
                    summarized += 1;
                    report.summary = Some(summary);
                }
                Err(e) => {
                    tracing::warn!(file = %file.name, kind = e.kind(), error = %e, "summary failed");
                    report.summary_error = Some(e.to_string());
                }
            }
        }

        documents.push(report);
    }

    tracing::info!(files = documents.len(), summarized, %model, "documents summarized");

    Ok(Json(SummarizeResponse {
        model,
        documents,
        summarized,
    }))
}
