//! services/api/src/web/quizzes.rs
//!
//! Handlers for quizzes and the attempt history.

use crate::error::{ApiError, ErrorBody};
use crate::web::{rest::CourseFilter, state::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use study_dashboard_core::{
    domain::{GenerateQuizInput, ItemCount, Quiz, QuizAttempt},
    quiz::{grade_attempt, materialize_quiz, shuffle_questions, MaterializedQuiz},
};
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizRequest {
    /// Clamped to 1..=10; 5 when absent.
    pub num_questions: Option<i64>,
}

/// The selections made during one pass through a quiz.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAttemptRequest {
    /// Question id to selected option id. Unanswered questions are simply left out.
    pub answers: HashMap<Uuid, Uuid>,
}

//=========================================================================================
// Quiz Handlers
//=========================================================================================

#[utoipa::path(
    get,
    path = "/quizzes",
    params(CourseFilter),
    responses((status = 200, description = "Stored quizzes"))
)]
pub async fn list_quizzes_handler(
    State(app_state): State<Arc<AppState>>,
    Query(filter): Query<CourseFilter>,
) -> Result<Json<Vec<Quiz>>, ApiError> {
    Ok(Json(app_state.repo.list_quizzes(filter.course_id).await?))
}

#[utoipa::path(
    get,
    path = "/quizzes/{id}",
    params(("id" = Uuid, Path, description = "The quiz id.")),
    responses(
        (status = 200, description = "The quiz"),
        (status = 404, description = "Unknown quiz", body = ErrorBody)
    )
)]
pub async fn get_quiz_handler(
    State(app_state): State<Arc<AppState>>,
    Path(quiz_id): Path<Uuid>,
) -> Result<Json<Quiz>, ApiError> {
    Ok(Json(app_state.repo.get_quiz(quiz_id).await?))
}

/// Start a quiz: returns a copy with the questions in a fresh random order.
#[utoipa::path(
    post,
    path = "/quizzes/{id}/start",
    params(("id" = Uuid, Path, description = "The quiz id.")),
    responses(
        (status = 200, description = "The shuffled quiz"),
        (status = 404, description = "Unknown quiz", body = ErrorBody)
    )
)]
pub async fn start_quiz_handler(
    State(app_state): State<Arc<AppState>>,
    Path(quiz_id): Path<Uuid>,
) -> Result<Json<Quiz>, ApiError> {
    let quiz = app_state.repo.get_quiz(quiz_id).await?;
    Ok(Json(shuffle_questions(&quiz, &mut rand::rng())))
}

/// Grade a completed pass through a quiz and record it.
#[utoipa::path(
    post,
    path = "/quizzes/{id}/attempts",
    params(("id" = Uuid, Path, description = "The quiz id.")),
    request_body = SubmitAttemptRequest,
    responses(
        (status = 201, description = "The recorded attempt"),
        (status = 400, description = "An answer does not belong to the quiz", body = ErrorBody),
        (status = 404, description = "Unknown quiz", body = ErrorBody)
    )
)]
pub async fn submit_attempt_handler(
    State(app_state): State<Arc<AppState>>,
    Path(quiz_id): Path<Uuid>,
    Json(request): Json<SubmitAttemptRequest>,
) -> Result<(StatusCode, Json<QuizAttempt>), ApiError> {
    let quiz = app_state.repo.get_quiz(quiz_id).await?;
    let attempt = grade_attempt(&quiz, &request.answers, Utc::now())?;
    app_state.repo.save_attempt(attempt.clone()).await?;
    info!(
        "Recorded attempt {} on '{}': {}/{}",
        attempt.id, attempt.quiz_title, attempt.score, attempt.total_questions
    );
    Ok((StatusCode::CREATED, Json(attempt)))
}

/// Generate a new quiz for a course, store it, and return it shuffled.
///
/// A correct answer that matches none of its options fails the request with a
/// `warning`, unless the server runs with the `first-option` policy; then the quiz is
/// stored with the first option marked correct and the affected questions are listed
/// under `warnings`.
#[utoipa::path(
    post,
    path = "/courses/{id}/quizzes/generate",
    params(("id" = Uuid, Path, description = "The course id.")),
    request_body = GenerateQuizRequest,
    responses(
        (status = 201, description = "The stored quiz and any warnings"),
        (status = 404, description = "Unknown course", body = ErrorBody),
        (status = 422, description = "A correct answer matched no option", body = ErrorBody),
        (status = 502, description = "The model returned nothing usable", body = ErrorBody)
    )
)]
pub async fn generate_quiz_handler(
    State(app_state): State<Arc<AppState>>,
    Path(course_id): Path<Uuid>,
    Json(request): Json<GenerateQuizRequest>,
) -> Result<(StatusCode, Json<MaterializedQuiz>), ApiError> {
    let course = app_state.repo.get_course(course_id).await?;
    let generated = app_state
        .study_tools
        .generate_quiz(GenerateQuizInput {
            course_name: course.name.clone(),
            course_description: Some(course.description.clone()),
            num_questions: ItemCount::clamped(request.num_questions),
        })
        .await?;

    let MaterializedQuiz { quiz, warnings } = materialize_quiz(generated, course.id, &course.name);
    for warning in &warnings {
        warn!("Generated quiz '{}': {:?}", quiz.title, warning);
    }
    let quiz = shuffle_questions(&quiz, &mut rand::rng());
    app_state.repo.save_quiz(quiz.clone()).await?;
    info!(
        "Stored generated quiz {} with {} questions for course {}",
        quiz.id,
        quiz.questions.len(),
        course.id
    );

    Ok((StatusCode::CREATED, Json(MaterializedQuiz { quiz, warnings })))
}

//=========================================================================================
// Attempt History Handlers
//=========================================================================================

#[utoipa::path(
    get,
    path = "/attempts",
    params(CourseFilter),
    responses((status = 200, description = "Attempts, most recent first"))
)]
pub async fn list_attempts_handler(
    State(app_state): State<Arc<AppState>>,
    Query(filter): Query<CourseFilter>,
) -> Result<Json<Vec<QuizAttempt>>, ApiError> {
    Ok(Json(app_state.repo.list_attempts(filter.course_id).await?))
}

#[utoipa::path(
    get,
    path = "/attempts/{id}",
    params(("id" = Uuid, Path, description = "The attempt id.")),
    responses(
        (status = 200, description = "The attempt with every answered question"),
        (status = 404, description = "Unknown attempt", body = ErrorBody)
    )
)]
pub async fn get_attempt_handler(
    State(app_state): State<Arc<AppState>>,
    Path(attempt_id): Path<Uuid>,
) -> Result<Json<QuizAttempt>, ApiError> {
    Ok(Json(app_state.repo.get_attempt(attempt_id).await?))
}
