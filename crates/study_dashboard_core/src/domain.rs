//! crates/study_dashboard_core/src/domain.rs
//!
//! Defines the core data structures for the study dashboard.
//! The structs derive serde so the service layer can put them on the wire as-is,
//! using the camelCase field names the dashboard client expects.

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

//=========================================================================================
// Validation
//=========================================================================================

/// A rejected draft: a required field was blank or a value was out of range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

fn require_text(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError(format!("{} must not be empty", field)));
    }
    Ok(())
}

//=========================================================================================
// Courses
//=========================================================================================

/// A course the student is enrolled in. Courses are only ever seeded, never created
/// through the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub instructor: String,
    pub credits: u32,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    /// Completion percentage, 0 to 100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_class_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_soon_task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discussion_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<String>,
}

/// The student the dashboard belongs to. Read-only; seeded with the demo data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub degree_major: String,
    pub department: String,
    pub current_year: u8,
    pub current_semester: String,
    pub courses_taken: u32,
    pub units_taken: u32,
    pub avatar_url: String,
    pub university: String,
    #[serde(default)]
    pub is_admin: bool,
}

//=========================================================================================
// Notes
//=========================================================================================

/// A user-authored quick note. Flashcards are stored as notes too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The fields a caller supplies when creating a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    pub course_id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl NewNote {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("content", &self.content)
    }
}

/// An edit to an existing note. The summary is left alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteUpdate {
    pub title: String,
    pub content: String,
}

impl NoteUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("content", &self.content)
    }
}

//=========================================================================================
// Documents
//=========================================================================================

/// An uploaded course document. Lecture notes with content can be summarized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub course_id: Uuid,
    pub name: String,
    pub url: String,
    pub file_type: String,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub is_lecture_note: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Document {
    /// Only lecture notes that actually carry text can be fed to the study tools.
    pub fn is_summarizable(&self) -> bool {
        self.is_lecture_note
            && self
                .content
                .as_deref()
                .is_some_and(|content| !content.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    pub course_id: Uuid,
    pub name: String,
    pub url: String,
    pub file_type: String,
    #[serde(default)]
    pub is_lecture_note: bool,
    #[serde(default)]
    pub content: Option<String>,
}

impl NewDocument {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)
    }
}

//=========================================================================================
// Quizzes
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    pub id: Uuid,
    pub text: String,
}

/// Number of answer options every quiz question carries.
pub const OPTIONS_PER_QUESTION: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: Uuid,
    pub text: String,
    pub options: Vec<QuizOption>,
    pub correct_option_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuizQuestion {
    /// Checks the question invariants: exactly four options with distinct ids and texts,
    /// and a correct option id that points at one of them.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("question text", &self.text)?;
        if self.options.len() != OPTIONS_PER_QUESTION {
            return Err(ValidationError(format!(
                "question \"{}\" has {} options, expected {}",
                self.text,
                self.options.len(),
                OPTIONS_PER_QUESTION
            )));
        }
        for (i, option) in self.options.iter().enumerate() {
            require_text("option text", &option.text)?;
            let duplicate = self.options[..i]
                .iter()
                .any(|other| other.id == option.id || other.text == option.text);
            if duplicate {
                return Err(ValidationError(format!(
                    "question \"{}\" has duplicate options",
                    self.text
                )));
            }
        }
        if self.option(self.correct_option_id).is_none() {
            return Err(ValidationError(format!(
                "question \"{}\" marks an option as correct that it does not contain",
                self.text
            )));
        }
        Ok(())
    }

    pub fn option(&self, option_id: Uuid) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<QuizQuestion>,
}

impl Quiz {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("quiz title", &self.title)?;
        if self.questions.is_empty() {
            return Err(ValidationError(format!(
                "quiz \"{}\" has no questions",
                self.title
            )));
        }
        self.questions.iter().try_for_each(QuizQuestion::validate)
    }
}

/// A question as it was presented in an attempt, with the user's selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnsweredQuestion {
    #[serde(flatten)]
    pub question: QuizQuestion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_option_id: Option<Uuid>,
    pub is_correct: bool,
}

/// The immutable record of one completed quiz session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub course_id: Uuid,
    pub quiz_title: String,
    pub attempted_at: DateTime<Utc>,
    pub score: u32,
    pub total_questions: u32,
    pub questions: Vec<AnsweredQuestion>,
}

//=========================================================================================
// Timetable
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn weekday(self) -> Weekday {
        match self {
            DayOfWeek::Monday => Weekday::Mon,
            DayOfWeek::Tuesday => Weekday::Tue,
            DayOfWeek::Wednesday => Weekday::Wed,
            DayOfWeek::Thursday => Weekday::Thu,
            DayOfWeek::Friday => Weekday::Fri,
            DayOfWeek::Saturday => Weekday::Sat,
            DayOfWeek::Sunday => Weekday::Sun,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid HH:MM time")]
pub struct ClockTimeError(pub String);

/// A wall-clock time of day written as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, ClockTimeError> {
        if hour > 23 || minute > 59 {
            return Err(ClockTimeError(format!("{:02}:{:02}", hour, minute)));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    pub fn minutes_since_midnight(self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = ClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ClockTimeError(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let well_formed = (1..=2).contains(&hour.len())
            && minute.len() == 2
            && hour.chars().chain(minute.chars()).all(|c| c.is_ascii_digit());
        if !well_formed {
            return Err(invalid());
        }
        let hour = hour.parse::<u8>().map_err(|_| invalid())?;
        let minute = minute.parse::<u8>().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ClockTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// A recurring weekly class slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEvent {
    pub id: Uuid,
    pub course_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_color: Option<String>,
    pub day: DayOfWeek,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub description: String,
}

/// The editable fields of a timetable event, used for both create and update.
/// Events without a course get a fresh course id of their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEventDraft {
    #[serde(default)]
    pub course_id: Option<Uuid>,
    pub course_name: String,
    pub course_color: String,
    pub day: DayOfWeek,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub description: String,
}

impl TimetableEventDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("course name", &self.course_name)?;
        require_text("course color", &self.course_color)?;
        require_text("description", &self.description)?;
        if self.end_time <= self.start_time {
            return Err(ValidationError(format!(
                "end time {} must be after start time {}",
                self.end_time, self.start_time
            )));
        }
        Ok(())
    }
}

//=========================================================================================
// Study tool payloads
//=========================================================================================

/// How many items a study tool should produce. Always within `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct ItemCount(u8);

impl ItemCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;
    pub const DEFAULT: u8 = 5;

    /// Clamps a caller-supplied count into range, falling back to the default when absent.
    pub fn clamped(requested: Option<i64>) -> Self {
        match requested {
            Some(n) => Self(n.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u8),
            None => Self::default(),
        }
    }

    pub fn get(self) -> usize {
        usize::from(self.0)
    }
}

impl Default for ItemCount {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<i64> for ItemCount {
    fn from(value: i64) -> Self {
        Self::clamped(Some(value))
    }
}

impl From<ItemCount> for u8 {
    fn from(value: ItemCount) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeNotesInput {
    pub course_name: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesSummary {
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizInput {
    pub course_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_description: Option<String>,
    #[serde(default)]
    pub num_questions: ItemCount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedOption {
    pub text: String,
}

/// A quiz question as the model produced it: options carry no ids yet and the correct
/// answer is referenced by its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub text: String,
    pub options: Vec<GeneratedOption>,
    pub correct_option_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuiz {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<GeneratedQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateFlashcardsInput {
    pub course_name: String,
    pub notes: String,
    #[serde(default)]
    pub num_flashcards: ItemCount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFlashcards {
    pub flashcards: Vec<Flashcard>,
}

impl Flashcard {
    /// Turns the card into a note for `course_id`, remembering which document it came from.
    pub fn into_note(self, course_id: Uuid, source_title: &str) -> NewNote {
        NewNote {
            course_id,
            title: self.question,
            content: self.answer,
            summary: Some(format!("Flashcard generated from \"{}\"", source_title)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(text: &str) -> QuizOption {
        QuizOption {
            id: Uuid::new_v4(),
            text: text.to_string(),
        }
    }

    fn question(options: Vec<QuizOption>, correct: Uuid) -> QuizQuestion {
        QuizQuestion {
            id: Uuid::new_v4(),
            text: "Which HTTP method is typically used for retrieving data?".to_string(),
            options,
            correct_option_id: correct,
            explanation: None,
        }
    }

    #[test]
    fn clock_time_parses_and_formats() {
        let t: ClockTime = "09:30".parse().unwrap();
        assert_eq!((t.hour(), t.minute()), (9, 30));
        assert_eq!(t.to_string(), "09:30");
        assert_eq!("7:05".parse::<ClockTime>().unwrap().to_string(), "07:05");
    }

    #[test]
    fn clock_time_rejects_garbage() {
        for bad in ["", "9", "24:00", "12:60", "12:5", "ab:cd", "-1:00", "123:00"] {
            assert!(bad.parse::<ClockTime>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn clock_time_serializes_as_string() {
        let t = ClockTime::new(14, 0).unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"14:00\"");
        let back: ClockTime = serde_json::from_str("\"14:00\"").unwrap();
        assert_eq!(back, t);
        assert!(serde_json::from_str::<ClockTime>("\"25:00\"").is_err());
    }

    #[test]
    fn item_count_clamps_and_defaults() {
        assert_eq!(ItemCount::clamped(None).get(), 5);
        assert_eq!(ItemCount::clamped(Some(0)).get(), 1);
        assert_eq!(ItemCount::clamped(Some(-3)).get(), 1);
        assert_eq!(ItemCount::clamped(Some(42)).get(), 10);
        assert_eq!(ItemCount::clamped(Some(7)).get(), 7);

        let input: GenerateQuizInput =
            serde_json::from_str(r#"{"courseName":"HCI","numQuestions":99}"#).unwrap();
        assert_eq!(input.num_questions.get(), 10);
        let input: GenerateFlashcardsInput =
            serde_json::from_str(r#"{"courseName":"HCI","notes":"x"}"#).unwrap();
        assert_eq!(input.num_flashcards.get(), 5);
    }

    #[test]
    fn question_with_four_distinct_options_is_valid() {
        let options = vec![option("POST"), option("GET"), option("PUT"), option("DELETE")];
        let correct = options[1].id;
        assert!(question(options, correct).validate().is_ok());
    }

    #[test]
    fn question_invariants_are_enforced() {
        let three = vec![option("POST"), option("GET"), option("PUT")];
        let correct = three[0].id;
        assert!(question(three, correct).validate().is_err());

        let dup = vec![option("GET"), option("GET"), option("PUT"), option("DELETE")];
        let correct = dup[0].id;
        assert!(question(dup, correct).validate().is_err());

        let four = vec![option("POST"), option("GET"), option("PUT"), option("DELETE")];
        assert!(question(four, Uuid::new_v4()).validate().is_err());
    }

    #[test]
    fn only_lecture_notes_with_content_are_summarizable() {
        let mut doc = Document {
            id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            name: "Syllabus.pdf".to_string(),
            url: "#".to_string(),
            file_type: "PDF".to_string(),
            uploaded_at: Utc::now(),
            is_lecture_note: true,
            content: Some("Week 1: HTTP".to_string()),
        };
        assert!(doc.is_summarizable());
        doc.content = Some("   ".to_string());
        assert!(!doc.is_summarizable());
        doc.content = Some("Week 1".to_string());
        doc.is_lecture_note = false;
        assert!(!doc.is_summarizable());
    }

    #[test]
    fn timetable_draft_requires_fields_and_ordered_times() {
        let mut draft = TimetableEventDraft {
            course_id: None,
            course_name: "HCI".to_string(),
            course_color: "bg-accent".to_string(),
            day: DayOfWeek::Monday,
            start_time: "11:00".parse().unwrap(),
            end_time: "12:30".parse().unwrap(),
            description: "Design Studio B".to_string(),
        };
        assert!(draft.validate().is_ok());
        draft.end_time = "10:00".parse().unwrap();
        assert!(draft.validate().is_err());
        draft.end_time = "12:30".parse().unwrap();
        draft.description = " ".to_string();
        assert!(draft.validate().is_err());
    }

    #[test]
    fn flashcard_becomes_note() {
        let course_id = Uuid::new_v4();
        let note = Flashcard {
            question: "What is a CPU?".to_string(),
            answer: "The unit that executes instructions.".to_string(),
        }
        .into_note(course_id, "Syllabus.pdf");
        assert_eq!(note.course_id, course_id);
        assert_eq!(note.title, "What is a CPU?");
        assert_eq!(
            note.summary.as_deref(),
            Some("Flashcard generated from \"Syllabus.pdf\"")
        );
    }
}
