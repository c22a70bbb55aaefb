//! services/api/src/web/test_support.rs
//!
//! Fakes and helpers shared by the handler tests.

use crate::adapters::{fixtures, memory::InMemoryStore};
use crate::web::state::AppState;
use async_trait::async_trait;
use axum::response::{IntoResponse, Response};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use study_dashboard_core::{
    domain::{
        Course, Flashcard, GenerateFlashcardsInput, GenerateQuizInput, GeneratedFlashcards,
        GeneratedOption, GeneratedQuestion, GeneratedQuiz, NotesSummary, SummarizeNotesInput,
    },
    ports::{PortError, PortResult, StudyAssistantService, StudyRepository},
    AnswerMismatchPolicy, StudyTools,
};

/// An assistant that answers from canned responses and remembers what it was asked.
#[derive(Default)]
pub struct FakeAssistant {
    pub calls: AtomicUsize,
    pub summary: Mutex<Option<PortResult<NotesSummary>>>,
    pub quiz: Mutex<Option<PortResult<GeneratedQuiz>>>,
    pub flashcards: Mutex<Option<PortResult<GeneratedFlashcards>>>,
    pub last_notes: Mutex<Option<String>>,
    pub last_question_count: Mutex<Option<usize>>,
}

impl FakeAssistant {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn reply_summary(&self, summary: &str) {
        *self.summary.lock().unwrap() = Some(Ok(NotesSummary {
            summary: summary.to_string(),
        }));
    }

    pub fn reply_quiz(&self, quiz: GeneratedQuiz) {
        *self.quiz.lock().unwrap() = Some(Ok(quiz));
    }

    pub fn reply_flashcards(&self, count: usize) {
        let flashcards = (1..=count)
            .map(|i| Flashcard {
                question: format!("Question {i}?"),
                answer: format!("Answer {i}."),
            })
            .collect();
        *self.flashcards.lock().unwrap() = Some(Ok(GeneratedFlashcards { flashcards }));
    }
}

fn take<T>(slot: &Mutex<Option<PortResult<T>>>) -> PortResult<T> {
    slot.lock()
        .unwrap()
        .take()
        .unwrap_or_else(|| Err(PortError::Unexpected("no canned response".to_string())))
}

#[async_trait]
impl StudyAssistantService for FakeAssistant {
    async fn summarize_notes(&self, input: &SummarizeNotesInput) -> PortResult<NotesSummary> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_notes.lock().unwrap() = Some(input.notes.clone());
        take(&self.summary)
    }

    async fn generate_quiz(&self, input: &GenerateQuizInput) -> PortResult<GeneratedQuiz> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_question_count.lock().unwrap() = Some(input.num_questions.get());
        take(&self.quiz)
    }

    async fn generate_flashcards(
        &self,
        input: &GenerateFlashcardsInput,
    ) -> PortResult<GeneratedFlashcards> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_notes.lock().unwrap() = Some(input.notes.clone());
        take(&self.flashcards)
    }
}

pub fn generated_question(text: &str, options: [&str; 4], correct: &str) -> GeneratedQuestion {
    GeneratedQuestion {
        text: text.to_string(),
        options: options
            .iter()
            .map(|t| GeneratedOption { text: t.to_string() })
            .collect(),
        correct_option_text: correct.to_string(),
        explanation: None,
    }
}

/// A store seeded with the demo fixtures, behind the given assistant.
pub async fn seeded_state(
    assistant: Arc<FakeAssistant>,
    policy: AnswerMismatchPolicy,
) -> Arc<AppState> {
    let store = Arc::new(InMemoryStore::new());
    fixtures::seed(store.as_ref()).await.unwrap();
    let study_tools = StudyTools::new(assistant).with_mismatch_policy(policy);
    Arc::new(AppState::new(store, study_tools))
}

pub async fn course_by_code(state: &AppState, code: &str) -> Course {
    state
        .repo
        .list_courses()
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.code == code)
        .unwrap()
}

/// Renders a handler result and decodes its JSON body.
pub async fn into_json(
    response: impl IntoResponse,
) -> (axum::http::StatusCode, serde_json::Value) {
    let response: Response = response.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}
