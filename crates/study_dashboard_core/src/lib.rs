pub mod domain;
pub mod flow;
pub mod ports;
pub mod quiz;
pub mod study_tools;
pub mod timetable;

pub use domain::{
    AnsweredQuestion, ClockTime, Course, DayOfWeek, Document, Flashcard, GenerateFlashcardsInput,
    GenerateQuizInput, GeneratedFlashcards, GeneratedQuiz, ItemCount, NewDocument, NewNote, Note,
    NoteUpdate, NotesSummary, Quiz, QuizAttempt, QuizOption, QuizQuestion, SummarizeNotesInput,
    TimetableEvent, TimetableEventDraft, UserProfile, ValidationError,
};
pub use flow::{FlowError, SummarizeFlow};
pub use ports::{PortError, PortResult, StudyAssistantService, StudyRepository};
pub use study_tools::{
    AnswerDefaulted, AnswerMismatchPolicy, CheckedQuiz, StudyToolError, StudyTools,
};
