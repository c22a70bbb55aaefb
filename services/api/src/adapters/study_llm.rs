//! services/api/src/adapters/study_llm.rs
//!
//! This module contains the adapter for the study-tool LLM.
//! It implements the `StudyAssistantService` port from the `core` crate with one chat
//! completion per call, asking the model for a JSON object and parsing it into the
//! core's generated-content types. Validation of that content is left to the core.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use regex::Regex;
use serde::de::DeserializeOwned;
use study_dashboard_core::{
    domain::{
        GenerateFlashcardsInput, GenerateQuizInput, GeneratedFlashcards, GeneratedQuiz,
        NotesSummary, SummarizeNotesInput,
    },
    ports::{PortError, PortResult, StudyAssistantService},
};
use tracing::{debug, info};

const SUMMARY_SYSTEM_PROMPT: &str = "You are an AI assistant helping students summarize their notes. \
Respond with a single JSON object of the form {\"summary\": \"...\"} and nothing else.";

const QUIZ_SYSTEM_PROMPT: &str = "You are an AI assistant specialized in creating educational quizzes. \
Respond with a single JSON object and nothing else, shaped like: \
{\"title\": \"...\", \"description\": \"...\", \"questions\": [{\"text\": \"What is the primary function of a CPU?\", \
\"options\": [{\"text\": \"Store data long-term\"}, {\"text\": \"Execute program instructions\"}, \
{\"text\": \"Display graphics on the screen\"}, {\"text\": \"Connect to the internet\"}], \
\"correctOptionText\": \"Execute program instructions\", \
\"explanation\": \"The CPU is responsible for executing the instructions of a computer program.\"}]}";

const FLASHCARDS_SYSTEM_PROMPT: &str = "You are an AI assistant specialized in creating educational flashcards. \
Respond with a single JSON object and nothing else, shaped like: \
{\"flashcards\": [{\"question\": \"What is the primary function of a CPU?\", \
\"answer\": \"The CPU is responsible for executing instructions of a computer program.\"}]}";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `StudyAssistantService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiStudyAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiStudyAdapter {
    /// Creates a new `OpenAiStudyAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    /// Sends one system/user exchange and parses the reply as `T`.
    async fn complete_json<T: DeserializeOwned>(
        &self,
        system_prompt: &str,
        user_prompt: String,
    ) -> PortResult<T> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::InvalidResponse(
                    "Study LLM response contained no text content.".to_string(),
                )
            })?;
        debug!("Study LLM replied with {} characters", content.len());

        parse_json_payload(&content)
    }
}

//=========================================================================================
// Prompt Rendering & Response Parsing
//=========================================================================================

fn summary_prompt(input: &SummarizeNotesInput) -> String {
    format!(
        "Summarize the following notes for the course '{}'.\n\nNotes:\n{}",
        input.course_name, input.notes
    )
}

fn quiz_prompt(input: &GenerateQuizInput) -> String {
    let mut prompt = format!(
        "Generate a quiz for the course titled \"{}\".\n",
        input.course_name
    );
    if let Some(description) = input
        .course_description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
    {
        prompt.push_str(&format!("Course Description: {}\n", description));
    }
    prompt.push_str(&format!(
        "The quiz should have exactly {n} multiple-choice questions. Each question must have 4 unique answer options.\n\
         For each question provide the question text, the 4 options, the text of the correct option \
         (which MUST exactly match one of the option texts), and an optional brief explanation.\n\
         The quiz title should be descriptive, like \"Quiz: Fundamentals of {course}\".",
        n = input.num_questions.get(),
        course = input.course_name
    ));
    prompt
}

fn flashcards_prompt(input: &GenerateFlashcardsInput) -> String {
    format!(
        "Generate exactly {} flashcards from the following notes for the course titled \"{}\".\n\
         Each flashcard should consist of a clear question and a concise answer. \
         Focus on key concepts, definitions, and important facts from the notes.\n\nNotes:\n{}",
        input.num_flashcards.get(),
        input.course_name,
        input.notes
    )
}

/// Parses a model reply as JSON, tolerating a surrounding Markdown code fence.
pub fn parse_json_payload<T: DeserializeOwned>(raw: &str) -> PortResult<T> {
    let fence = Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*\n?(.*?)\s*```\s*$")
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
    let body = match fence.captures(raw).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str(),
        None => raw.trim(),
    };
    if body.is_empty() {
        return Err(PortError::InvalidResponse(
            "Study LLM returned an empty reply.".to_string(),
        ));
    }
    serde_json::from_str(body).map_err(|e| PortError::InvalidResponse(e.to_string()))
}

//=========================================================================================
// `StudyAssistantService` Trait Implementation
//=========================================================================================

#[async_trait]
impl StudyAssistantService for OpenAiStudyAdapter {
    async fn summarize_notes(&self, input: &SummarizeNotesInput) -> PortResult<NotesSummary> {
        info!("Summarizing notes for course '{}'", input.course_name);
        self.complete_json(SUMMARY_SYSTEM_PROMPT, summary_prompt(input))
            .await
    }

    async fn generate_quiz(&self, input: &GenerateQuizInput) -> PortResult<GeneratedQuiz> {
        info!(
            "Generating a {}-question quiz for course '{}'",
            input.num_questions.get(),
            input.course_name
        );
        self.complete_json(QUIZ_SYSTEM_PROMPT, quiz_prompt(input))
            .await
    }

    async fn generate_flashcards(
        &self,
        input: &GenerateFlashcardsInput,
    ) -> PortResult<GeneratedFlashcards> {
        info!(
            "Generating {} flashcards for course '{}'",
            input.num_flashcards.get(),
            input.course_name
        );
        self.complete_json(FLASHCARDS_SYSTEM_PROMPT, flashcards_prompt(input))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_dashboard_core::domain::ItemCount;

    #[test]
    fn parses_plain_and_fenced_json() {
        let plain: NotesSummary =
            parse_json_payload(r#"{"summary":"HTTP is stateless."}"#).unwrap();
        assert_eq!(plain.summary, "HTTP is stateless.");

        let fenced: GeneratedFlashcards = parse_json_payload(
            "```json\n{\"flashcards\":[{\"question\":\"What is DES?\",\"answer\":\"Discrete event simulation.\"}]}\n```",
        )
        .unwrap();
        assert_eq!(fenced.flashcards.len(), 1);
        assert_eq!(fenced.flashcards[0].question, "What is DES?");
    }

    #[test]
    fn quiz_payload_uses_camel_case_fields() {
        let quiz: GeneratedQuiz = parse_json_payload(
            r#"{"title":"Quiz: Fundamentals of HCI","questions":[{"text":"What is usability?",
            "options":[{"text":"a"},{"text":"b"},{"text":"c"},{"text":"d"}],
            "correctOptionText":"b"}]}"#,
        )
        .unwrap();
        assert_eq!(quiz.questions[0].correct_option_text, "b");
        assert!(quiz.description.is_none());
        assert!(quiz.questions[0].explanation.is_none());
    }

    #[test]
    fn garbage_and_empty_replies_are_invalid_responses() {
        for raw in ["", "   ", "Sure! Here is your summary.", "```\n```"] {
            let err = parse_json_payload::<NotesSummary>(raw).unwrap_err();
            assert!(matches!(err, PortError::InvalidResponse(_)), "accepted {raw:?}");
        }
    }

    #[test]
    fn prompts_carry_the_requested_counts() {
        let quiz = quiz_prompt(&GenerateQuizInput {
            course_name: "Simulation & Modelling".to_string(),
            course_description: Some("Discrete-event simulation.".to_string()),
            num_questions: ItemCount::clamped(Some(3)),
        });
        assert!(quiz.contains("exactly 3 multiple-choice questions"));
        assert!(quiz.contains("Course Description: Discrete-event simulation."));

        let cards = flashcards_prompt(&GenerateFlashcardsInput {
            course_name: "HCI".to_string(),
            notes: "Nielsen's heuristics".to_string(),
            num_flashcards: ItemCount::default(),
        });
        assert!(cards.starts_with("Generate exactly 5 flashcards"));
        assert!(cards.ends_with("Nielsen's heuristics"));
    }
}
