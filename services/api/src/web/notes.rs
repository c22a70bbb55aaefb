//! services/api/src/web/notes.rs
//!
//! Handlers for the user's quick notes.

use crate::error::{ApiError, ErrorBody};
use crate::web::{rest::CourseFilter, state::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use std::sync::Arc;
use study_dashboard_core::domain::{NewNote, Note, NoteUpdate, SummarizeNotesInput};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

/// The payload for creating a note.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteRequest {
    pub course_id: Uuid,
    pub title: String,
    pub content: String,
}

/// The payload for editing a note. Its summary is kept.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteEditRequest {
    pub title: String,
    pub content: String,
}

/// List notes, newest first.
#[utoipa::path(
    get,
    path = "/notes",
    params(CourseFilter),
    responses((status = 200, description = "Notes, newest first"))
)]
pub async fn list_notes_handler(
    State(app_state): State<Arc<AppState>>,
    Query(filter): Query<CourseFilter>,
) -> Result<Json<Vec<Note>>, ApiError> {
    Ok(Json(app_state.repo.list_notes(filter.course_id).await?))
}

/// Create a note for an existing course.
#[utoipa::path(
    post,
    path = "/notes",
    request_body = NoteRequest,
    responses(
        (status = 201, description = "The stored note"),
        (status = 400, description = "Blank title or content", body = ErrorBody),
        (status = 404, description = "Unknown course", body = ErrorBody)
    )
)]
pub async fn create_note_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<NoteRequest>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let new_note = NewNote {
        course_id: request.course_id,
        title: request.title,
        content: request.content,
        summary: None,
    };
    new_note.validate()?;
    app_state.repo.get_course(new_note.course_id).await?;

    let note = app_state.repo.create_note(new_note).await?;
    info!("Created note {} for course {}", note.id, note.course_id);
    Ok((StatusCode::CREATED, Json(note)))
}

/// Edit a note's title and content.
#[utoipa::path(
    put,
    path = "/notes/{id}",
    params(("id" = Uuid, Path, description = "The note id.")),
    request_body = NoteEditRequest,
    responses(
        (status = 200, description = "The updated note"),
        (status = 400, description = "Blank title or content", body = ErrorBody),
        (status = 404, description = "Unknown note", body = ErrorBody)
    )
)]
pub async fn update_note_handler(
    State(app_state): State<Arc<AppState>>,
    Path(note_id): Path<Uuid>,
    Json(request): Json<NoteEditRequest>,
) -> Result<Json<Note>, ApiError> {
    let update = NoteUpdate {
        title: request.title,
        content: request.content,
    };
    update.validate()?;
    Ok(Json(app_state.repo.update_note(note_id, update).await?))
}

/// Delete a note and return it.
#[utoipa::path(
    delete,
    path = "/notes/{id}",
    params(("id" = Uuid, Path, description = "The note id.")),
    responses(
        (status = 200, description = "The removed note"),
        (status = 404, description = "Unknown note", body = ErrorBody)
    )
)]
pub async fn delete_note_handler(
    State(app_state): State<Arc<AppState>>,
    Path(note_id): Path<Uuid>,
) -> Result<Json<Note>, ApiError> {
    let note = app_state.repo.delete_note(note_id).await?;
    info!("Deleted note {}", note.id);
    Ok(Json(note))
}

/// Summarize a note with the study assistant and store the summary on it.
#[utoipa::path(
    post,
    path = "/notes/{id}/summarize",
    params(("id" = Uuid, Path, description = "The note id.")),
    responses(
        (status = 200, description = "The note with its new summary"),
        (status = 404, description = "Unknown note", body = ErrorBody),
        (status = 502, description = "The model returned nothing usable", body = ErrorBody)
    )
)]
pub async fn summarize_note_handler(
    State(app_state): State<Arc<AppState>>,
    Path(note_id): Path<Uuid>,
) -> Result<Json<Note>, ApiError> {
    let note = app_state.repo.get_note(note_id).await?;
    let course = app_state.repo.get_course(note.course_id).await?;

    let summary = app_state
        .study_tools
        .summarize_notes(SummarizeNotesInput {
            course_name: course.name,
            notes: note.content,
        })
        .await?;
    let note = app_state
        .repo
        .set_note_summary(note_id, &summary.summary)
        .await?;
    Ok(Json(note))
}
