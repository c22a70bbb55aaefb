//! services/api/src/web/rest.rs
//!
//! Contains the course handlers, the query types shared by the list endpoints, and
//! the master definition for the OpenAPI specification.

use crate::error::{ApiError, ErrorBody, Severity};
use crate::web::{documents, notes, quizzes, state::AppState, study_tools, timetable};
use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use study_dashboard_core::{
    domain::{Course, Document, Note, Quiz, QuizAttempt, UserProfile},
    flow::summarizable_documents,
};
use utoipa::{IntoParams, OpenApi};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        get_profile_handler,
        list_courses_handler,
        get_course_handler,
        notes::list_notes_handler,
        notes::create_note_handler,
        notes::update_note_handler,
        notes::delete_note_handler,
        notes::summarize_note_handler,
        documents::list_documents_handler,
        documents::upload_document_handler,
        documents::delete_document_handler,
        documents::summarize_document_handler,
        documents::generate_flashcards_handler,
        quizzes::list_quizzes_handler,
        quizzes::get_quiz_handler,
        quizzes::start_quiz_handler,
        quizzes::submit_attempt_handler,
        quizzes::generate_quiz_handler,
        quizzes::list_attempts_handler,
        quizzes::get_attempt_handler,
        timetable::list_events_handler,
        timetable::create_event_handler,
        timetable::update_event_handler,
        timetable::delete_event_handler,
        timetable::grid_handler,
        timetable::upcoming_handler,
        study_tools::summarize_handler,
        study_tools::quiz_handler,
        study_tools::flashcards_handler,
    ),
    components(
        schemas(
            ErrorBody,
            Severity,
            notes::NoteRequest,
            notes::NoteEditRequest,
            quizzes::GenerateQuizRequest,
            quizzes::SubmitAttemptRequest,
            documents::FlashcardsRequest,
            timetable::TimetableEventRequest,
            study_tools::SummarizeNotesRequest,
            study_tools::QuizToolRequest,
            study_tools::FlashcardsToolRequest,
        )
    ),
    tags(
        (name = "Study Dashboard API", description = "Courses, notes, documents, quizzes, the weekly timetable and the AI study tools.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Query Structs
//=========================================================================================

/// Narrows a list endpoint to one course.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CourseFilter {
    pub course_id: Option<Uuid>,
}

/// Everything the course page shows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseOverview {
    pub course: Course,
    pub notes: Vec<Note>,
    pub documents: Vec<Document>,
    /// The documents that can be summarized.
    pub lecture_notes: Vec<Document>,
    pub quizzes: Vec<Quiz>,
    pub attempts: Vec<QuizAttempt>,
}

//=========================================================================================
// Profile & Course Handlers
//=========================================================================================

/// The student's profile for the dashboard header.
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "The user profile"),
        (status = 404, description = "No profile was seeded", body = ErrorBody)
    )
)]
pub async fn get_profile_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<UserProfile>, ApiError> {
    Ok(Json(app_state.repo.get_profile().await?))
}

/// List every enrolled course.
#[utoipa::path(
    get,
    path = "/courses",
    responses(
        (status = 200, description = "All courses")
    )
)]
pub async fn list_courses_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<Course>>, ApiError> {
    Ok(Json(app_state.repo.list_courses().await?))
}

/// Fetch a course with its notes, documents, quizzes and attempts.
#[utoipa::path(
    get,
    path = "/courses/{id}",
    params(("id" = Uuid, Path, description = "The course id.")),
    responses(
        (status = 200, description = "The course overview"),
        (status = 404, description = "Unknown course", body = ErrorBody)
    )
)]
pub async fn get_course_handler(
    State(app_state): State<Arc<AppState>>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<CourseOverview>, ApiError> {
    let repo = &app_state.repo;
    let course = repo.get_course(course_id).await?;
    let notes = repo.list_notes(Some(course_id)).await?;
    let documents = repo.list_documents(Some(course_id)).await?;
    let lecture_notes = summarizable_documents(&documents, course_id);
    let quizzes = repo.list_quizzes(Some(course_id)).await?;
    let attempts = repo.list_attempts(Some(course_id)).await?;

    Ok(Json(CourseOverview {
        course,
        notes,
        documents,
        lecture_notes,
        quizzes,
        attempts,
    }))
}
