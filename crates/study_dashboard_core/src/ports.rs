//! crates/study_dashboard_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the dashboard's core logic.
//! These traits form the boundary of the hexagonal architecture: the store that owns
//! every record, and the generative model behind the study tools.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Course, Document, GenerateFlashcardsInput, GenerateQuizInput, GeneratedFlashcards,
    GeneratedQuiz, NewDocument, NewNote, Note, NoteUpdate, NotesSummary, Quiz, QuizAttempt,
    SummarizeNotesInput, TimetableEvent, TimetableEventDraft, UserProfile, ValidationError,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., storage, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The backend answered, but not with the structure that was asked for.
    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl From<ValidationError> for PortError {
    fn from(err: ValidationError) -> Self {
        PortError::InvalidInput(err.0)
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The single owner of all dashboard records. Every mutation goes through here.
#[async_trait]
pub trait StudyRepository: Send + Sync {
    // --- Courses ---
    async fn list_courses(&self) -> PortResult<Vec<Course>>;

    async fn get_course(&self, course_id: Uuid) -> PortResult<Course>;

    async fn insert_course(&self, course: Course) -> PortResult<()>;

    // --- Profile ---
    /// `NotFound` until a profile has been stored.
    async fn get_profile(&self) -> PortResult<UserProfile>;

    async fn set_profile(&self, profile: UserProfile) -> PortResult<()>;

    // --- Notes (newest first) ---
    async fn list_notes(&self, course_id: Option<Uuid>) -> PortResult<Vec<Note>>;

    async fn get_note(&self, note_id: Uuid) -> PortResult<Note>;

    async fn create_note(&self, note: NewNote) -> PortResult<Note>;

    /// Stores several notes at once. Either all are stored or none is.
    async fn create_notes(&self, notes: Vec<NewNote>) -> PortResult<Vec<Note>>;

    async fn update_note(&self, note_id: Uuid, update: NoteUpdate) -> PortResult<Note>;

    async fn set_note_summary(&self, note_id: Uuid, summary: &str) -> PortResult<Note>;

    async fn delete_note(&self, note_id: Uuid) -> PortResult<Note>;

    // --- Documents (newest first) ---
    async fn list_documents(&self, course_id: Option<Uuid>) -> PortResult<Vec<Document>>;

    async fn get_document(&self, document_id: Uuid) -> PortResult<Document>;

    async fn create_document(&self, document: NewDocument) -> PortResult<Document>;

    async fn delete_document(&self, document_id: Uuid) -> PortResult<Document>;

    // --- Quizzes and attempts ---
    async fn list_quizzes(&self, course_id: Option<Uuid>) -> PortResult<Vec<Quiz>>;

    async fn get_quiz(&self, quiz_id: Uuid) -> PortResult<Quiz>;

    /// Inserts or replaces a quiz after checking its question invariants.
    async fn save_quiz(&self, quiz: Quiz) -> PortResult<()>;

    async fn list_attempts(&self, course_id: Option<Uuid>) -> PortResult<Vec<QuizAttempt>>;

    async fn get_attempt(&self, attempt_id: Uuid) -> PortResult<QuizAttempt>;

    async fn save_attempt(&self, attempt: QuizAttempt) -> PortResult<()>;

    // --- Timetable ---
    async fn list_events(&self) -> PortResult<Vec<TimetableEvent>>;

    async fn get_event(&self, event_id: Uuid) -> PortResult<TimetableEvent>;

    async fn create_event(&self, draft: TimetableEventDraft) -> PortResult<TimetableEvent>;

    async fn update_event(
        &self,
        event_id: Uuid,
        draft: TimetableEventDraft,
    ) -> PortResult<TimetableEvent>;

    async fn delete_event(&self, event_id: Uuid) -> PortResult<TimetableEvent>;
}

/// One prompt/response round trip per call against a generative model.
/// Implementations parse the model's structured output but do not validate it.
#[async_trait]
pub trait StudyAssistantService: Send + Sync {
    async fn summarize_notes(&self, input: &SummarizeNotesInput) -> PortResult<NotesSummary>;

    async fn generate_quiz(&self, input: &GenerateQuizInput) -> PortResult<GeneratedQuiz>;

    async fn generate_flashcards(
        &self,
        input: &GenerateFlashcardsInput,
    ) -> PortResult<GeneratedFlashcards>;
}
