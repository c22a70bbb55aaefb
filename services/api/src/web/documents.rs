//! services/api/src/web/documents.rs
//!
//! Handlers for course documents: upload, removal, and the two study tools that run
//! on a lecture note's text (summary and flashcards).

use crate::error::{ApiError, ErrorBody};
use crate::web::{rest::CourseFilter, state::AppState};
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use study_dashboard_core::{
    domain::{Document, GenerateFlashcardsInput, ItemCount, NewDocument, NewNote, Note},
    flow::SummarizeFlow,
};
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// The payload for turning a lecture note into flashcards.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardsRequest {
    /// Clamped to 1..=10; 5 when absent.
    pub num_flashcards: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub document_id: Uuid,
    pub document_name: String,
    pub summary: String,
}

/// An uploaded file, before it is stored.
struct Upload {
    name: String,
    file_type: String,
    content: Option<String>,
}

/// Upper-cased MIME subtype, falling back to the file extension.
fn file_type_of(name: &str, content_type: Option<&str>) -> String {
    content_type
        .and_then(|ct| ct.split('/').nth(1))
        .map(|subtype| subtype.split(';').next().unwrap_or(subtype).trim())
        .filter(|subtype| !subtype.is_empty())
        .or_else(|| name.rsplit_once('.').map(|(_, ext)| ext))
        .map(str::to_ascii_uppercase)
        .unwrap_or_else(|| "FILE".to_string())
}

fn is_text(name: &str, content_type: Option<&str>) -> bool {
    match content_type {
        Some(ct) if ct.starts_with("text/") => true,
        _ => {
            let lower = name.to_ascii_lowercase();
            lower.ends_with(".txt") || lower.ends_with(".md")
        }
    }
}

/// List documents, newest first.
#[utoipa::path(
    get,
    path = "/documents",
    params(CourseFilter),
    responses((status = 200, description = "Documents, newest first"))
)]
pub async fn list_documents_handler(
    State(app_state): State<Arc<AppState>>,
    Query(filter): Query<CourseFilter>,
) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(app_state.repo.list_documents(filter.course_id).await?))
}

/// Upload a document to a course.
///
/// Accepts a multipart/form-data request with a `file` part and an optional
/// `isLectureNote` part (`true`/`false`). Text files keep their content so they can be
/// summarized later.
#[utoipa::path(
    post,
    path = "/courses/{id}/documents",
    params(("id" = Uuid, Path, description = "The course id.")),
    request_body(content_type = "multipart/form-data", description = "The document to upload."),
    responses(
        (status = 201, description = "The stored document"),
        (status = 400, description = "Missing file", body = ErrorBody),
        (status = 404, description = "Unknown course", body = ErrorBody)
    )
)]
pub async fn upload_document_handler(
    State(app_state): State<Arc<AppState>>,
    Path(course_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    app_state.repo.get_course(course_id).await?;

    let mut upload: Option<Upload> = None;
    let mut is_lecture_note = false;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart data: {}", e)))?
    {
        match field.name() {
            Some("isLectureNote") => {
                let value = field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read isLectureNote: {}", e))
                })?;
                is_lecture_note = value.trim().eq_ignore_ascii_case("true");
            }
            Some("file") => {
                let name = field.file_name().unwrap_or("untitled.txt").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read file bytes: {}", e))
                })?;
                let content = if is_text(&name, content_type.as_deref()) {
                    match String::from_utf8(data.to_vec()) {
                        Ok(text) => Some(text),
                        Err(_) => {
                            warn!(
                                "Uploaded file '{}' is not valid UTF-8; storing without content",
                                name
                            );
                            None
                        }
                    }
                } else {
                    None
                };
                upload = Some(Upload {
                    file_type: file_type_of(&name, content_type.as_deref()),
                    name,
                    content,
                });
            }
            _ => {}
        }
    }

    let upload = upload
        .ok_or_else(|| ApiError::BadRequest("Multipart form must include a file".to_string()))?;
    let new_document = NewDocument {
        course_id,
        name: upload.name,
        url: "#".to_string(),
        file_type: upload.file_type,
        is_lecture_note,
        content: upload.content,
    };
    new_document.validate()?;

    let document = app_state.repo.create_document(new_document).await?;
    info!(
        "Uploaded document '{}' ({}) to course {}",
        document.name, document.file_type, course_id
    );
    Ok((StatusCode::CREATED, Json(document)))
}

/// Delete a document and return it.
#[utoipa::path(
    delete,
    path = "/documents/{id}",
    params(("id" = Uuid, Path, description = "The document id.")),
    responses(
        (status = 200, description = "The removed document"),
        (status = 404, description = "Unknown document", body = ErrorBody)
    )
)]
pub async fn delete_document_handler(
    State(app_state): State<Arc<AppState>>,
    Path(document_id): Path<Uuid>,
) -> Result<Json<Document>, ApiError> {
    let document = app_state.repo.delete_document(document_id).await?;
    info!("Deleted document {}", document.id);
    Ok(Json(document))
}

/// Summarize a lecture note.
///
/// Walks the summarize flow: the document's course is selected, the document is picked
/// from that course's summarizable lecture notes, and the study assistant is called once.
#[utoipa::path(
    post,
    path = "/documents/{id}/summarize",
    params(("id" = Uuid, Path, description = "The document id.")),
    responses(
        (status = 200, description = "The summary"),
        (status = 400, description = "The document is not a lecture note with content", body = ErrorBody),
        (status = 404, description = "Unknown document", body = ErrorBody),
        (status = 502, description = "The model returned nothing usable", body = ErrorBody)
    )
)]
pub async fn summarize_document_handler(
    State(app_state): State<Arc<AppState>>,
    Path(document_id): Path<Uuid>,
) -> Result<Json<DocumentSummary>, ApiError> {
    let document = app_state.repo.get_document(document_id).await?;
    let course = app_state.repo.get_course(document.course_id).await?;
    let documents = app_state.repo.list_documents(Some(course.id)).await?;

    let flow = SummarizeFlow::Idle
        .select_course(course, &documents)?
        .select_document(document_id)?;
    let (flow, input) = flow.begin_summarizing()?;

    let summary = match app_state.study_tools.summarize_notes(input).await {
        Ok(output) => output.summary,
        Err(e) => {
            let flow = flow.fail()?;
            warn!("Summary of document {} failed, back to {}", document_id, flow.state_name());
            return Err(e.into());
        }
    };
    let flow = flow.finish(summary.clone())?;
    info!("Summarized document {} ({})", document_id, flow.state_name());

    Ok(Json(DocumentSummary {
        document_id,
        document_name: document.name,
        summary,
    }))
}

/// Generate flashcards from a lecture note and store each one as a note.
#[utoipa::path(
    post,
    path = "/documents/{id}/flashcards",
    params(("id" = Uuid, Path, description = "The document id.")),
    request_body = FlashcardsRequest,
    responses(
        (status = 201, description = "The notes created from the flashcards"),
        (status = 400, description = "The document has no text to work from", body = ErrorBody),
        (status = 404, description = "Unknown document", body = ErrorBody),
        (status = 502, description = "The model returned nothing usable", body = ErrorBody)
    )
)]
pub async fn generate_flashcards_handler(
    State(app_state): State<Arc<AppState>>,
    Path(document_id): Path<Uuid>,
    Json(request): Json<FlashcardsRequest>,
) -> Result<(StatusCode, Json<Vec<Note>>), ApiError> {
    let document = app_state.repo.get_document(document_id).await?;
    if !document.is_summarizable() {
        return Err(ApiError::BadRequest(format!(
            "Document '{}' is not a lecture note with text content",
            document.name
        )));
    }
    let course = app_state.repo.get_course(document.course_id).await?;

    let generated = app_state
        .study_tools
        .generate_flashcards(GenerateFlashcardsInput {
            course_name: course.name,
            notes: document.content.clone().unwrap_or_default(),
            num_flashcards: ItemCount::clamped(request.num_flashcards),
        })
        .await?;

    let new_notes: Vec<NewNote> = generated
        .flashcards
        .into_iter()
        .map(|card| card.into_note(course.id, &document.name))
        .collect();
    let notes = app_state.repo.create_notes(new_notes).await?;
    info!(
        "Stored {} flashcards from document {} as notes",
        notes.len(),
        document_id
    );
    Ok((StatusCode::CREATED, Json(notes)))
}
