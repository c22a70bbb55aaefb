//! crates/study_dashboard_core/src/quiz.rs
//!
//! Turning generated quizzes into playable ones, shuffling, and grading attempts.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{AnsweredQuestion, Quiz, QuizAttempt, QuizOption, QuizQuestion};
use crate::study_tools::CheckedQuiz;

pub(crate) const MISSING_EXPLANATION: &str = "Explanation not available due to matching issue.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    #[error("Question {0} is not part of this quiz")]
    UnknownQuestion(Uuid),
    #[error("Option {option_id} does not belong to question {question_id}")]
    UnknownOption { question_id: Uuid, option_id: Uuid },
}

/// Something that went wrong in a recoverable way while building a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum QuizWarning {
    /// The generated correct answer matched no option; the first option was used instead.
    #[serde(rename_all = "camelCase")]
    CorrectAnswerDefaulted {
        question_id: Uuid,
        question_text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterializedQuiz {
    pub quiz: Quiz,
    pub warnings: Vec<QuizWarning>,
}

/// Gives a generated quiz real ids and resolves each correct answer text to its option.
///
/// Expects a quiz that already passed the study-tool validation, so every question has
/// four options. Questions the study tools already repaired keep their warning, now
/// keyed by the new question id. An answer text that still matches no option is
/// treated the same way: the first option becomes correct and a warning is recorded.
pub fn materialize_quiz(
    checked: CheckedQuiz,
    course_id: Uuid,
    course_name: &str,
) -> MaterializedQuiz {
    let CheckedQuiz {
        quiz: generated,
        warnings: repaired,
    } = checked;
    let mut warnings = Vec::new();

    let questions = generated
        .questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| {
            let options: Vec<QuizOption> = q
                .options
                .into_iter()
                .map(|o| QuizOption {
                    id: Uuid::new_v4(),
                    text: o.text,
                })
                .collect();
            let question_id = Uuid::new_v4();
            let matched = options
                .iter()
                .find(|o| o.text == q.correct_option_text)
                .map(|o| o.id);

            let (correct_option_id, explanation) = match matched {
                Some(id) => {
                    if repaired.iter().any(|r| r.question_number == i + 1) {
                        warnings.push(QuizWarning::CorrectAnswerDefaulted {
                            question_id,
                            question_text: q.text.clone(),
                        });
                    }
                    (id, q.explanation)
                }
                None => {
                    warnings.push(QuizWarning::CorrectAnswerDefaulted {
                        question_id,
                        question_text: q.text.clone(),
                    });
                    let fallback = options.first().map(|o| o.id).unwrap_or_else(Uuid::new_v4);
                    let explanation = q
                        .explanation
                        .filter(|e| !e.trim().is_empty())
                        .unwrap_or_else(|| MISSING_EXPLANATION.to_string());
                    (fallback, Some(explanation))
                }
            };

            QuizQuestion {
                id: question_id,
                text: q.text,
                options,
                correct_option_id,
                explanation,
            }
        })
        .collect();

    let title = if generated.title.trim().is_empty() {
        format!("Practice Quiz for {}", course_name)
    } else {
        generated.title
    };
    let description = generated
        .description
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| {
            format!(
                "A dynamically generated quiz to test your knowledge on {}.",
                course_name
            )
        });

    MaterializedQuiz {
        quiz: Quiz {
            id: Uuid::new_v4(),
            course_id,
            title,
            description: Some(description),
            questions,
        },
        warnings,
    }
}

/// Returns a copy of the quiz with its questions in random order.
pub fn shuffle_questions<R: Rng + ?Sized>(quiz: &Quiz, rng: &mut R) -> Quiz {
    let mut shuffled = quiz.clone();
    shuffled.questions.shuffle(rng);
    shuffled
}

/// Scores one pass through `quiz`. `answers` maps question ids to the selected option;
/// questions without an entry count as unanswered and incorrect.
pub fn grade_attempt(
    quiz: &Quiz,
    answers: &HashMap<Uuid, Uuid>,
    attempted_at: DateTime<Utc>,
) -> Result<QuizAttempt, QuizError> {
    for (question_id, option_id) in answers {
        let question = quiz
            .questions
            .iter()
            .find(|q| q.id == *question_id)
            .ok_or(QuizError::UnknownQuestion(*question_id))?;
        if question.option(*option_id).is_none() {
            return Err(QuizError::UnknownOption {
                question_id: *question_id,
                option_id: *option_id,
            });
        }
    }

    let questions: Vec<AnsweredQuestion> = quiz
        .questions
        .iter()
        .map(|q| {
            let selected_option_id = answers.get(&q.id).copied();
            AnsweredQuestion {
                question: q.clone(),
                selected_option_id,
                is_correct: selected_option_id == Some(q.correct_option_id),
            }
        })
        .collect();
    let score = questions.iter().filter(|q| q.is_correct).count() as u32;

    Ok(QuizAttempt {
        id: Uuid::new_v4(),
        quiz_id: quiz.id,
        course_id: quiz.course_id,
        quiz_title: quiz.title.clone(),
        attempted_at,
        score,
        total_questions: questions.len() as u32,
        questions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GeneratedQuiz;
    use crate::study_tools::tests::generated_question;
    use crate::study_tools::AnswerDefaulted;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn generated(correct_second: &str) -> GeneratedQuiz {
        GeneratedQuiz {
            title: "Quiz: Fundamentals of Web".to_string(),
            description: None,
            questions: vec![
                generated_question(
                    "Which HTTP method is typically used for retrieving data?",
                    ["POST", "GET", "PUT", "DELETE"],
                    "GET",
                ),
                generated_question(
                    "What does HTML stand for?",
                    [
                        "HyperText Markup Language",
                        "HighTech Modern Language",
                        "Hyperlink and Text Markup Language",
                        "Home Tool Markup Language",
                    ],
                    correct_second,
                ),
            ],
        }
    }

    fn materialized(correct_second: &str) -> MaterializedQuiz {
        materialize_quiz(generated(correct_second).into(), Uuid::new_v4(), "Web")
    }

    #[test]
    fn materialize_resolves_correct_answers_to_option_ids() {
        let course_id = Uuid::new_v4();
        let html = generated("HyperText Markup Language");
        let out = materialize_quiz(html.into(), course_id, "Web");
        assert!(out.warnings.is_empty());
        assert_eq!(out.quiz.course_id, course_id);
        assert!(out.quiz.validate().is_ok());

        let first = &out.quiz.questions[0];
        assert_eq!(first.option(first.correct_option_id).unwrap().text, "GET");
        let second = &out.quiz.questions[1];
        assert_eq!(
            second.option(second.correct_option_id).unwrap().text,
            "HyperText Markup Language"
        );
    }

    #[test]
    fn materialize_defaults_to_first_option_with_warning() {
        let out = materialized("Hypertext Markup");
        assert_eq!(out.warnings.len(), 1);
        let second = &out.quiz.questions[1];
        assert_eq!(second.correct_option_id, second.options[0].id);
        assert_eq!(second.explanation.as_deref(), Some(MISSING_EXPLANATION));
        match &out.warnings[0] {
            QuizWarning::CorrectAnswerDefaulted { question_id, .. } => {
                assert_eq!(*question_id, second.id)
            }
        }
    }

    #[test]
    fn materialize_keeps_warnings_for_repaired_answers() {
        let checked = CheckedQuiz {
            quiz: generated("HyperText Markup Language"),
            warnings: vec![AnswerDefaulted {
                question_number: 2,
                question_text: "What does HTML stand for?".to_string(),
                generated_answer: "Hypertext Markup".to_string(),
            }],
        };
        let out = materialize_quiz(checked, Uuid::new_v4(), "Web");
        let second = &out.quiz.questions[1];
        assert_eq!(
            out.warnings,
            vec![QuizWarning::CorrectAnswerDefaulted {
                question_id: second.id,
                question_text: second.text.clone(),
            }]
        );
    }

    #[test]
    fn materialize_fills_blank_title_and_description() {
        let mut quiz = generated("HyperText Markup Language");
        quiz.title = "  ".to_string();
        let out = materialize_quiz(quiz.into(), Uuid::new_v4(), "Human Computer Interface");
        assert_eq!(out.quiz.title, "Practice Quiz for Human Computer Interface");
        assert_eq!(
            out.quiz.description.as_deref(),
            Some("A dynamically generated quiz to test your knowledge on Human Computer Interface.")
        );
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut base = generated("HyperText Markup Language");
        for i in 0..6 {
            base.questions.push(generated_question(
                &format!("Filler {i}?"),
                ["a", "b", "c", "d"],
                "a",
            ));
        }
        let quiz = materialize_quiz(base.into(), Uuid::new_v4(), "Web").quiz;
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let shuffled = shuffle_questions(&quiz, &mut rng);
            let mut before: Vec<Uuid> = quiz.questions.iter().map(|q| q.id).collect();
            let mut after: Vec<Uuid> = shuffled.questions.iter().map(|q| q.id).collect();
            before.sort();
            after.sort();
            assert_eq!(before, after);
            assert_eq!(shuffled.id, quiz.id);
        }
    }

    #[test]
    fn grading_counts_correct_and_unanswered() {
        let quiz = materialized("HyperText Markup Language").quiz;
        let first = &quiz.questions[0];
        let wrong = first
            .options
            .iter()
            .find(|o| o.id != first.correct_option_id)
            .unwrap()
            .id;

        let mut answers = HashMap::new();
        answers.insert(first.id, wrong);
        let attempt = grade_attempt(&quiz, &answers, Utc::now()).unwrap();
        assert_eq!(attempt.score, 0);
        assert_eq!(attempt.total_questions, 2);
        assert_eq!(attempt.questions[0].selected_option_id, Some(wrong));
        assert_eq!(attempt.questions[1].selected_option_id, None);
        assert!(!attempt.questions[1].is_correct);

        answers.insert(first.id, first.correct_option_id);
        let second = &quiz.questions[1];
        answers.insert(second.id, second.correct_option_id);
        let attempt = grade_attempt(&quiz, &answers, Utc::now()).unwrap();
        assert_eq!(attempt.score, 2);
        assert_eq!(attempt.quiz_title, quiz.title);
    }

    #[test]
    fn grading_rejects_foreign_answers() {
        let quiz = materialized("HyperText Markup Language").quiz;
        let mut answers = HashMap::new();
        answers.insert(Uuid::new_v4(), Uuid::new_v4());
        assert!(matches!(
            grade_attempt(&quiz, &answers, Utc::now()),
            Err(QuizError::UnknownQuestion(_))
        ));

        let mut answers = HashMap::new();
        answers.insert(quiz.questions[0].id, quiz.questions[1].options[0].id);
        assert!(matches!(
            grade_attempt(&quiz, &answers, Utc::now()),
            Err(QuizError::UnknownOption { .. })
        ));
    }
}
