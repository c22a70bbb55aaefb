//! services/api/src/adapters/memory.rs
//!
//! This module contains the in-memory store, the concrete implementation of the
//! `StudyRepository` port. All records live behind one lock; every method is a single
//! critical section, so writes never interleave. Nothing survives a restart.

use async_trait::async_trait;
use chrono::Utc;
use study_dashboard_core::domain::{
    Course, Document, NewDocument, NewNote, Note, NoteUpdate, Quiz, QuizAttempt,
    TimetableEvent, TimetableEventDraft, UserProfile,
};
use study_dashboard_core::ports::{PortError, PortResult, StudyRepository};
use tokio::sync::RwLock;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

#[derive(Default)]
struct Tables {
    profile: Option<UserProfile>,
    courses: Vec<Course>,
    /// Newest first, like the dashboard lists them.
    notes: Vec<Note>,
    /// Newest first.
    documents: Vec<Document>,
    quizzes: Vec<Quiz>,
    /// Newest first by `attempted_at`.
    attempts: Vec<QuizAttempt>,
    events: Vec<TimetableEvent>,
}

/// An in-memory store that implements the `StudyRepository` port.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Creates an empty `InMemoryStore`.
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(kind: &str, id: Uuid) -> PortError {
    PortError::NotFound(format!("{} {} not found", kind, id))
}

fn position<T>(rows: &[T], id: Uuid, id_of: impl Fn(&T) -> Uuid, kind: &str) -> PortResult<usize> {
    rows.iter()
        .position(|row| id_of(row) == id)
        .ok_or_else(|| not_found(kind, id))
}

fn note_from(new: NewNote) -> Note {
    let now = Utc::now();
    Note {
        id: Uuid::new_v4(),
        course_id: new.course_id,
        title: new.title,
        content: new.content,
        summary: new.summary,
        created_at: now,
        updated_at: now,
    }
}

fn event_from(id: Uuid, draft: TimetableEventDraft) -> TimetableEvent {
    TimetableEvent {
        id,
        course_id: draft.course_id.unwrap_or_else(Uuid::new_v4),
        course_name: Some(draft.course_name),
        course_color: Some(draft.course_color),
        day: draft.day,
        start_time: draft.start_time,
        end_time: draft.end_time,
        description: draft.description,
    }
}

//=========================================================================================
// `StudyRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl StudyRepository for InMemoryStore {
    async fn list_courses(&self) -> PortResult<Vec<Course>> {
        Ok(self.tables.read().await.courses.clone())
    }

    async fn get_course(&self, course_id: Uuid) -> PortResult<Course> {
        let tables = self.tables.read().await;
        tables
            .courses
            .iter()
            .find(|c| c.id == course_id)
            .cloned()
            .ok_or_else(|| not_found("Course", course_id))
    }

    async fn insert_course(&self, course: Course) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        match tables.courses.iter_mut().find(|c| c.id == course.id) {
            Some(existing) => *existing = course,
            None => tables.courses.push(course),
        }
        Ok(())
    }

    async fn get_profile(&self) -> PortResult<UserProfile> {
        self.tables
            .read()
            .await
            .profile
            .clone()
            .ok_or_else(|| PortError::NotFound("No user profile has been stored".to_string()))
    }

    async fn set_profile(&self, profile: UserProfile) -> PortResult<()> {
        self.tables.write().await.profile = Some(profile);
        Ok(())
    }

    async fn list_notes(&self, course_id: Option<Uuid>) -> PortResult<Vec<Note>> {
        let tables = self.tables.read().await;
        Ok(tables
            .notes
            .iter()
            .filter(|n| course_id.is_none_or(|id| n.course_id == id))
            .cloned()
            .collect())
    }

    async fn get_note(&self, note_id: Uuid) -> PortResult<Note> {
        let tables = self.tables.read().await;
        tables
            .notes
            .iter()
            .find(|n| n.id == note_id)
            .cloned()
            .ok_or_else(|| not_found("Note", note_id))
    }

    async fn create_note(&self, note: NewNote) -> PortResult<Note> {
        note.validate()?;
        let note = note_from(note);
        self.tables.write().await.notes.insert(0, note.clone());
        Ok(note)
    }

    async fn create_notes(&self, notes: Vec<NewNote>) -> PortResult<Vec<Note>> {
        for note in &notes {
            note.validate()?;
        }
        let created: Vec<Note> = notes.into_iter().map(note_from).collect();
        let mut tables = self.tables.write().await;
        for note in created.iter().rev() {
            tables.notes.insert(0, note.clone());
        }
        Ok(created)
    }

    async fn update_note(&self, note_id: Uuid, update: NoteUpdate) -> PortResult<Note> {
        update.validate()?;
        let mut tables = self.tables.write().await;
        let index = position(&tables.notes, note_id, |n| n.id, "Note")?;
        let note = &mut tables.notes[index];
        note.title = update.title;
        note.content = update.content;
        note.updated_at = Utc::now();
        Ok(note.clone())
    }

    async fn set_note_summary(&self, note_id: Uuid, summary: &str) -> PortResult<Note> {
        let mut tables = self.tables.write().await;
        let index = position(&tables.notes, note_id, |n| n.id, "Note")?;
        let note = &mut tables.notes[index];
        note.summary = Some(summary.to_string());
        Ok(note.clone())
    }

    async fn delete_note(&self, note_id: Uuid) -> PortResult<Note> {
        let mut tables = self.tables.write().await;
        let index = position(&tables.notes, note_id, |n| n.id, "Note")?;
        Ok(tables.notes.remove(index))
    }

    async fn list_documents(&self, course_id: Option<Uuid>) -> PortResult<Vec<Document>> {
        let tables = self.tables.read().await;
        Ok(tables
            .documents
            .iter()
            .filter(|d| course_id.is_none_or(|id| d.course_id == id))
            .cloned()
            .collect())
    }

    async fn get_document(&self, document_id: Uuid) -> PortResult<Document> {
        let tables = self.tables.read().await;
        tables
            .documents
            .iter()
            .find(|d| d.id == document_id)
            .cloned()
            .ok_or_else(|| not_found("Document", document_id))
    }

    async fn create_document(&self, document: NewDocument) -> PortResult<Document> {
        document.validate()?;
        let document = Document {
            id: Uuid::new_v4(),
            course_id: document.course_id,
            name: document.name,
            url: document.url,
            file_type: document.file_type,
            uploaded_at: Utc::now(),
            is_lecture_note: document.is_lecture_note,
            content: document.content,
        };
        self.tables.write().await.documents.insert(0, document.clone());
        Ok(document)
    }

    async fn delete_document(&self, document_id: Uuid) -> PortResult<Document> {
        let mut tables = self.tables.write().await;
        let index = position(&tables.documents, document_id, |d| d.id, "Document")?;
        Ok(tables.documents.remove(index))
    }

    async fn list_quizzes(&self, course_id: Option<Uuid>) -> PortResult<Vec<Quiz>> {
        let tables = self.tables.read().await;
        Ok(tables
            .quizzes
            .iter()
            .filter(|q| course_id.is_none_or(|id| q.course_id == id))
            .cloned()
            .collect())
    }

    async fn get_quiz(&self, quiz_id: Uuid) -> PortResult<Quiz> {
        let tables = self.tables.read().await;
        tables
            .quizzes
            .iter()
            .find(|q| q.id == quiz_id)
            .cloned()
            .ok_or_else(|| not_found("Quiz", quiz_id))
    }

    async fn save_quiz(&self, quiz: Quiz) -> PortResult<()> {
        quiz.validate()?;
        let mut tables = self.tables.write().await;
        match tables.quizzes.iter_mut().find(|q| q.id == quiz.id) {
            Some(existing) => *existing = quiz,
            None => tables.quizzes.push(quiz),
        }
        Ok(())
    }

    async fn list_attempts(&self, course_id: Option<Uuid>) -> PortResult<Vec<QuizAttempt>> {
        let tables = self.tables.read().await;
        Ok(tables
            .attempts
            .iter()
            .filter(|a| course_id.is_none_or(|id| a.course_id == id))
            .cloned()
            .collect())
    }

    async fn get_attempt(&self, attempt_id: Uuid) -> PortResult<QuizAttempt> {
        let tables = self.tables.read().await;
        tables
            .attempts
            .iter()
            .find(|a| a.id == attempt_id)
            .cloned()
            .ok_or_else(|| not_found("Quiz attempt", attempt_id))
    }

    async fn save_attempt(&self, attempt: QuizAttempt) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        if tables.attempts.iter().any(|a| a.id == attempt.id) {
            return Err(PortError::InvalidInput(format!(
                "Quiz attempt {} was already recorded",
                attempt.id
            )));
        }
        let index = tables
            .attempts
            .iter()
            .position(|a| a.attempted_at <= attempt.attempted_at)
            .unwrap_or(tables.attempts.len());
        tables.attempts.insert(index, attempt);
        Ok(())
    }

    async fn list_events(&self) -> PortResult<Vec<TimetableEvent>> {
        Ok(self.tables.read().await.events.clone())
    }

    async fn get_event(&self, event_id: Uuid) -> PortResult<TimetableEvent> {
        let tables = self.tables.read().await;
        tables
            .events
            .iter()
            .find(|e| e.id == event_id)
            .cloned()
            .ok_or_else(|| not_found("Timetable event", event_id))
    }

    async fn create_event(&self, draft: TimetableEventDraft) -> PortResult<TimetableEvent> {
        draft.validate()?;
        let event = event_from(Uuid::new_v4(), draft);
        self.tables.write().await.events.push(event.clone());
        Ok(event)
    }

    async fn update_event(
        &self,
        event_id: Uuid,
        draft: TimetableEventDraft,
    ) -> PortResult<TimetableEvent> {
        draft.validate()?;
        let mut tables = self.tables.write().await;
        let index = position(&tables.events, event_id, |e| e.id, "Timetable event")?;
        let course_id = draft.course_id.unwrap_or(tables.events[index].course_id);
        let event = event_from(
            event_id,
            TimetableEventDraft {
                course_id: Some(course_id),
                ..draft
            },
        );
        tables.events[index] = event.clone();
        Ok(event)
    }

    async fn delete_event(&self, event_id: Uuid) -> PortResult<TimetableEvent> {
        let mut tables = self.tables.write().await;
        let index = position(&tables.events, event_id, |e| e.id, "Timetable event")?;
        Ok(tables.events.remove(index))
    }
}
