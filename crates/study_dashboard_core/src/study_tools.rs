//! crates/study_dashboard_core/src/study_tools.rs
//!
//! The three study-tool calls: summarize notes, generate a quiz, generate flashcards.
//! Each call guards its input, makes exactly one model request, and validates the
//! structured output before handing it back. Nothing is retried and no state is kept.

use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::{
    GenerateFlashcardsInput, GenerateQuizInput, GeneratedFlashcards, GeneratedQuestion,
    GeneratedQuiz, NotesSummary, SummarizeNotesInput, OPTIONS_PER_QUESTION,
};
use crate::ports::{PortError, StudyAssistantService};
use crate::quiz::MISSING_EXPLANATION;

#[derive(Debug, thiserror::Error)]
pub enum StudyToolError {
    /// Rejected before the model was contacted.
    #[error("{0} must not be empty")]
    EmptyInput(&'static str),

    #[error("The model returned no usable content: {0}")]
    EmptyOutput(String),

    #[error("The model returned malformed content: {0}")]
    MalformedOutput(String),

    /// The correct answer text of a generated question matches none of its options.
    #[error("Correct option text \"{correct_option_text}\" does not match any option for question {question_number}: \"{question_text}\"")]
    AnswerMismatch {
        question_number: usize,
        question_text: String,
        correct_option_text: String,
    },

    #[error("Study assistant backend failed: {0}")]
    Backend(String),
}

impl StudyToolError {
    /// Mismatched answers are reported as warnings rather than hard failures.
    pub fn is_warning(&self) -> bool {
        matches!(self, StudyToolError::AnswerMismatch { .. })
    }
}

impl From<PortError> for StudyToolError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::InvalidResponse(msg) => StudyToolError::MalformedOutput(msg),
            other => StudyToolError::Backend(other.to_string()),
        }
    }
}

pub type StudyToolResult<T> = Result<T, StudyToolError>;

/// What to do when a generated question's correct answer matches none of its options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnswerMismatchPolicy {
    /// Fail the whole call.
    #[default]
    Reject,
    /// Mark the first option as correct and report the question as a warning.
    FallbackToFirstOption,
}

impl FromStr for AnswerMismatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "first-option" | "fallback" => Ok(Self::FallbackToFirstOption),
            other => Err(format!("'{}' is not one of: reject, first-option", other)),
        }
    }
}

/// A question whose correct answer was replaced by its first option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDefaulted {
    /// 1-based position in the generated quiz.
    pub question_number: usize,
    pub question_text: String,
    /// The answer text the model gave, which matched none of the options.
    pub generated_answer: String,
}

/// A generated quiz that passed validation, plus the questions the fallback policy
/// had to repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckedQuiz {
    #[serde(flatten)]
    pub quiz: GeneratedQuiz,
    pub warnings: Vec<AnswerDefaulted>,
}

impl From<GeneratedQuiz> for CheckedQuiz {
    fn from(quiz: GeneratedQuiz) -> Self {
        Self {
            quiz,
            warnings: Vec::new(),
        }
    }
}

//=========================================================================================
// The Study Tools Service
//=========================================================================================

#[derive(Clone)]
pub struct StudyTools {
    assistant: Arc<dyn StudyAssistantService>,
    mismatch_policy: AnswerMismatchPolicy,
}

impl StudyTools {
    pub fn new(assistant: Arc<dyn StudyAssistantService>) -> Self {
        Self {
            assistant,
            mismatch_policy: AnswerMismatchPolicy::default(),
        }
    }

    pub fn with_mismatch_policy(mut self, policy: AnswerMismatchPolicy) -> Self {
        self.mismatch_policy = policy;
        self
    }

    pub fn mismatch_policy(&self) -> AnswerMismatchPolicy {
        self.mismatch_policy
    }

    /// Summarizes free-text notes for a course. The summary comes back trimmed.
    pub async fn summarize_notes(
        &self,
        input: SummarizeNotesInput,
    ) -> StudyToolResult<NotesSummary> {
        require_input("course name", &input.course_name)?;
        require_input("notes", &input.notes)?;

        let output = self.assistant.summarize_notes(&input).await?;
        let summary = output.summary.trim();
        if summary.is_empty() {
            return Err(StudyToolError::EmptyOutput(
                "the summary was empty".to_string(),
            ));
        }
        Ok(NotesSummary {
            summary: summary.to_string(),
        })
    }

    /// Generates a multiple-choice quiz for a course.
    ///
    /// Every returned question has a correct answer among its options. Under
    /// [`AnswerMismatchPolicy::FallbackToFirstOption`] a mismatching answer is replaced by
    /// the first option and listed in `warnings`.
    pub async fn generate_quiz(&self, input: GenerateQuizInput) -> StudyToolResult<CheckedQuiz> {
        require_input("course name", &input.course_name)?;

        let mut quiz = self.assistant.generate_quiz(&input).await?;
        if quiz.questions.is_empty() {
            return Err(StudyToolError::EmptyOutput(
                "the quiz has no questions".to_string(),
            ));
        }
        let requested = input.num_questions.get();
        if quiz.questions.len() != requested {
            return Err(StudyToolError::MalformedOutput(format!(
                "expected {} questions, got {}",
                requested,
                quiz.questions.len()
            )));
        }
        let mut warnings = Vec::new();
        for (i, question) in quiz.questions.iter_mut().enumerate() {
            if let Some(warning) = self.check_question(i + 1, question)? {
                warnings.push(warning);
            }
        }
        Ok(CheckedQuiz { quiz, warnings })
    }

    /// Generates question/answer flashcards from free-text notes.
    pub async fn generate_flashcards(
        &self,
        input: GenerateFlashcardsInput,
    ) -> StudyToolResult<GeneratedFlashcards> {
        require_input("course name", &input.course_name)?;
        require_input("notes", &input.notes)?;

        let output = self.assistant.generate_flashcards(&input).await?;
        if output.flashcards.is_empty() {
            return Err(StudyToolError::EmptyOutput(
                "no flashcards were generated".to_string(),
            ));
        }
        let requested = input.num_flashcards.get();
        if output.flashcards.len() != requested {
            return Err(StudyToolError::MalformedOutput(format!(
                "expected {} flashcards, got {}",
                requested,
                output.flashcards.len()
            )));
        }
        for (i, card) in output.flashcards.iter().enumerate() {
            if card.question.trim().is_empty() || card.answer.trim().is_empty() {
                return Err(StudyToolError::EmptyOutput(format!(
                    "flashcard {} has an empty question or answer",
                    i + 1
                )));
            }
        }
        Ok(output)
    }

    fn check_question(
        &self,
        number: usize,
        question: &mut GeneratedQuestion,
    ) -> StudyToolResult<Option<AnswerDefaulted>> {
        if question.text.trim().is_empty() {
            return Err(StudyToolError::EmptyOutput(format!(
                "question {} has no text",
                number
            )));
        }
        if question.options.len() != OPTIONS_PER_QUESTION {
            return Err(StudyToolError::MalformedOutput(format!(
                "question {} has {} options, expected {}",
                number,
                question.options.len(),
                OPTIONS_PER_QUESTION
            )));
        }
        for (i, option) in question.options.iter().enumerate() {
            if option.text.trim().is_empty() {
                return Err(StudyToolError::EmptyOutput(format!(
                    "question {} has an empty option",
                    number
                )));
            }
            if question.options[..i].iter().any(|o| o.text == option.text) {
                return Err(StudyToolError::MalformedOutput(format!(
                    "question {} repeats the option \"{}\"",
                    number, option.text
                )));
            }
        }
        let matched = question
            .options
            .iter()
            .any(|o| o.text == question.correct_option_text);
        if matched {
            return Ok(None);
        }
        match self.mismatch_policy {
            AnswerMismatchPolicy::Reject => Err(StudyToolError::AnswerMismatch {
                question_number: number,
                question_text: question.text.clone(),
                correct_option_text: question.correct_option_text.clone(),
            }),
            AnswerMismatchPolicy::FallbackToFirstOption => {
                let first = question.options[0].text.clone();
                let generated_answer = std::mem::replace(&mut question.correct_option_text, first);
                if question
                    .explanation
                    .as_deref()
                    .is_none_or(|e| e.trim().is_empty())
                {
                    question.explanation = Some(MISSING_EXPLANATION.to_string());
                }
                Ok(Some(AnswerDefaulted {
                    question_number: number,
                    question_text: question.text.clone(),
                    generated_answer,
                }))
            }
        }
    }
}

fn require_input(field: &'static str, value: &str) -> StudyToolResult<()> {
    if value.trim().is_empty() {
        return Err(StudyToolError::EmptyInput(field));
    }
    Ok(())
}
