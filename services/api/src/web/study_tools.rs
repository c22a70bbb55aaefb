//! services/api/src/web/study_tools.rs
//!
//! The three study tools exposed as-is. Nothing is stored; the counts in the quiz and
//! flashcard requests are clamped to 1..=10 and default to 5.

use crate::error::{ApiError, ErrorBody};
use crate::web::state::AppState;
use axum::{extract::State, response::Json};
use serde::Deserialize;
use std::sync::Arc;
use study_dashboard_core::{
    domain::{
        GenerateFlashcardsInput, GenerateQuizInput, GeneratedFlashcards, ItemCount,
        NotesSummary, SummarizeNotesInput,
    },
    study_tools::CheckedQuiz,
};
use tracing::warn;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeNotesRequest {
    pub course_name: String,
    pub notes: String,
}

impl From<SummarizeNotesRequest> for SummarizeNotesInput {
    fn from(request: SummarizeNotesRequest) -> Self {
        Self {
            course_name: request.course_name,
            notes: request.notes,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizToolRequest {
    pub course_name: String,
    #[serde(default)]
    pub course_description: Option<String>,
    /// Clamped to 1..=10; 5 when absent.
    #[serde(default)]
    pub num_questions: Option<i64>,
}

impl From<QuizToolRequest> for GenerateQuizInput {
    fn from(request: QuizToolRequest) -> Self {
        Self {
            course_name: request.course_name,
            course_description: request.course_description,
            num_questions: ItemCount::clamped(request.num_questions),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardsToolRequest {
    pub course_name: String,
    pub notes: String,
    /// Clamped to 1..=10; 5 when absent.
    #[serde(default)]
    pub num_flashcards: Option<i64>,
}

impl From<FlashcardsToolRequest> for GenerateFlashcardsInput {
    fn from(request: FlashcardsToolRequest) -> Self {
        Self {
            course_name: request.course_name,
            notes: request.notes,
            num_flashcards: ItemCount::clamped(request.num_flashcards),
        }
    }
}

/// Summarize free-text notes for a course.
#[utoipa::path(
    post,
    path = "/study-tools/summarize",
    request_body = SummarizeNotesRequest,
    responses(
        (status = 200, description = "The summary"),
        (status = 400, description = "Blank course name or notes", body = ErrorBody),
        (status = 502, description = "The model returned nothing usable", body = ErrorBody)
    )
)]
pub async fn summarize_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<SummarizeNotesRequest>,
) -> Result<Json<NotesSummary>, ApiError> {
    Ok(Json(app_state.study_tools.summarize_notes(request.into()).await?))
}

/// Generate a multiple-choice quiz for a course.
///
/// With the `first-option` policy a correct answer that matches none of its options is
/// replaced by the first option, and the question is listed under `warnings`.
#[utoipa::path(
    post,
    path = "/study-tools/quiz",
    request_body = QuizToolRequest,
    responses(
        (status = 200, description = "The generated quiz and any warnings"),
        (status = 400, description = "Blank course name", body = ErrorBody),
        (status = 422, description = "A correct answer matched no option", body = ErrorBody),
        (status = 502, description = "The model returned nothing usable", body = ErrorBody)
    )
)]
pub async fn quiz_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<QuizToolRequest>,
) -> Result<Json<CheckedQuiz>, ApiError> {
    let checked = app_state.study_tools.generate_quiz(request.into()).await?;
    for warning in &checked.warnings {
        warn!(
            "Question {} ('{}'): answer '{}' matched no option, using the first one",
            warning.question_number, warning.question_text, warning.generated_answer
        );
    }
    Ok(Json(checked))
}

/// Generate question/answer flashcards from free-text notes.
#[utoipa::path(
    post,
    path = "/study-tools/flashcards",
    request_body = FlashcardsToolRequest,
    responses(
        (status = 200, description = "The generated flashcards"),
        (status = 400, description = "Blank course name or notes", body = ErrorBody),
        (status = 502, description = "The model returned nothing usable", body = ErrorBody)
    )
)]
pub async fn flashcards_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<FlashcardsToolRequest>,
) -> Result<Json<GeneratedFlashcards>, ApiError> {
    Ok(Json(app_state.study_tools.generate_flashcards(request.into()).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::test_support::{generated_question, into_json, seeded_state, FakeAssistant};
    use axum::http::StatusCode;
    use study_dashboard_core::{domain::GeneratedQuiz, AnswerMismatchPolicy};

    #[tokio::test]
    async fn blank_notes_never_reach_the_model() {
        let assistant = Arc::new(FakeAssistant::default());
        let state = seeded_state(assistant.clone(), AnswerMismatchPolicy::Reject).await;

        let request: SummarizeNotesRequest =
            serde_json::from_str(r#"{"courseName":"HCI","notes":"   "}"#).unwrap();
        let (status, body) = into_json(summarize_handler(State(state), Json(request)).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "notes must not be empty");
        assert_eq!(assistant.call_count(), 0);
    }

    #[tokio::test]
    async fn flashcard_count_defaults_to_five() {
        let assistant = Arc::new(FakeAssistant::default());
        let state = seeded_state(assistant.clone(), AnswerMismatchPolicy::Reject).await;
        assistant.reply_flashcards(5);

        let request: FlashcardsToolRequest = serde_json::from_str(
            r#"{"courseName":"Simulation","notes":"Entities, attributes, activities, events."}"#,
        )
        .unwrap();
        let Json(out) = flashcards_handler(State(state), Json(request)).await.unwrap();
        assert_eq!(out.flashcards.len(), 5);
        assert_eq!(assistant.call_count(), 1);
    }

    #[tokio::test]
    async fn zero_questions_are_clamped_and_a_failed_call_is_a_bad_gateway() {
        let assistant = Arc::new(FakeAssistant::default());
        let state = seeded_state(assistant.clone(), AnswerMismatchPolicy::Reject).await;

        // No canned reply: the fake backend errors after recording the request.
        let request: QuizToolRequest =
            serde_json::from_str(r#"{"courseName":"HCI","numQuestions":0}"#).unwrap();
        let (status, body) = into_json(quiz_handler(State(state), Json(request)).await).await;
        assert_eq!(*assistant.last_question_count.lock().unwrap(), Some(1));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["severity"], "error");
    }

    #[tokio::test]
    async fn fallback_policy_repairs_the_answer_and_reports_it() {
        let assistant = Arc::new(FakeAssistant::default());
        let state =
            seeded_state(assistant.clone(), AnswerMismatchPolicy::FallbackToFirstOption).await;
        assistant.reply_quiz(GeneratedQuiz {
            title: "Heuristics".to_string(),
            description: None,
            questions: vec![generated_question(
                "Which heuristic covers undo?",
                [
                    "User control and freedom",
                    "Aesthetic and minimalist design",
                    "Recognition rather than recall",
                    "Help and documentation",
                ],
                "Undo support",
            )],
        });

        let request: QuizToolRequest =
            serde_json::from_str(r#"{"courseName":"HCI","numQuestions":1}"#).unwrap();
        let (status, body) = into_json(quiz_handler(State(state), Json(request)).await).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["questions"][0]["correctOptionText"],
            "User control and freedom"
        );
        assert_eq!(body["warnings"][0]["questionNumber"], 1);
        assert_eq!(body["warnings"][0]["generatedAnswer"], "Undo support");
    }

    #[tokio::test]
    async fn matching_quiz_comes_back_without_warnings() {
        let assistant = Arc::new(FakeAssistant::default());
        let state = seeded_state(assistant.clone(), AnswerMismatchPolicy::Reject).await;
        assistant.reply_quiz(GeneratedQuiz {
            title: "Heuristics".to_string(),
            description: None,
            questions: vec![generated_question(
                "Which heuristic covers undo?",
                [
                    "User control and freedom",
                    "Aesthetic and minimalist design",
                    "Recognition rather than recall",
                    "Help and documentation",
                ],
                "User control and freedom",
            )],
        });

        let request: QuizToolRequest =
            serde_json::from_str(r#"{"courseName":"HCI","numQuestions":1}"#).unwrap();
        let Json(checked) = quiz_handler(State(state), Json(request)).await.unwrap();
        assert!(checked.warnings.is_empty());
        assert_eq!(checked.quiz.title, "Heuristics");
    }
}
