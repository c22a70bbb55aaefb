//! crates/study_dashboard_core/src/flow.rs
//!
//! The lecture-note summarize flow as an explicit state machine:
//! `Idle -> CourseSelected -> DocumentSelected -> Summarizing -> SummaryShown`.

use uuid::Uuid;

use crate::domain::{Course, Document, SummarizeNotesInput};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("No lecture notes with content found for {0}")]
    NoSummarizableDocuments(String),
    #[error("Document {0} is not a summarizable lecture note of the selected course")]
    DocumentNotAvailable(Uuid),
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
}

/// The lecture notes of `course_id` that carry content, in the order given.
pub fn summarizable_documents(documents: &[Document], course_id: Uuid) -> Vec<Document> {
    documents
        .iter()
        .filter(|d| d.course_id == course_id && d.is_summarizable())
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SummarizeFlow {
    #[default]
    Idle,
    CourseSelected {
        course: Course,
        candidates: Vec<Document>,
    },
    DocumentSelected {
        course: Course,
        document: Document,
    },
    Summarizing {
        course: Course,
        document: Document,
    },
    SummaryShown {
        course: Course,
        document: Document,
        summary: String,
    },
}

impl SummarizeFlow {
    pub fn state_name(&self) -> &'static str {
        match self {
            SummarizeFlow::Idle => "idle",
            SummarizeFlow::CourseSelected { .. } => "course selected",
            SummarizeFlow::DocumentSelected { .. } => "document selected",
            SummarizeFlow::Summarizing { .. } => "summarizing",
            SummarizeFlow::SummaryShown { .. } => "summary shown",
        }
    }

    fn invalid(&self, action: &'static str) -> FlowError {
        FlowError::InvalidTransition {
            action,
            state: self.state_name(),
        }
    }

    /// Picks a course out of `documents`' summarizable lecture notes. Allowed from
    /// `Idle` and after a summary was shown.
    pub fn select_course(self, course: Course, documents: &[Document]) -> Result<Self, FlowError> {
        match self {
            SummarizeFlow::Idle | SummarizeFlow::SummaryShown { .. } => {
                let candidates = summarizable_documents(documents, course.id);
                if candidates.is_empty() {
                    return Err(FlowError::NoSummarizableDocuments(course.name));
                }
                Ok(SummarizeFlow::CourseSelected { course, candidates })
            }
            other => Err(other.invalid("select a course")),
        }
    }

    pub fn select_document(self, document_id: Uuid) -> Result<Self, FlowError> {
        match self {
            SummarizeFlow::CourseSelected { course, candidates } => {
                let document = candidates
                    .into_iter()
                    .find(|d| d.id == document_id)
                    .ok_or(FlowError::DocumentNotAvailable(document_id))?;
                Ok(SummarizeFlow::DocumentSelected { course, document })
            }
            other => Err(other.invalid("select a document")),
        }
    }

    /// Moves to `Summarizing` and hands back the request for the study tools.
    pub fn begin_summarizing(self) -> Result<(Self, SummarizeNotesInput), FlowError> {
        match self {
            SummarizeFlow::DocumentSelected { course, document } => {
                let input = SummarizeNotesInput {
                    course_name: course.name.clone(),
                    notes: document.content.clone().unwrap_or_default(),
                };
                Ok((SummarizeFlow::Summarizing { course, document }, input))
            }
            other => Err(other.invalid("start summarizing")),
        }
    }

    pub fn finish(self, summary: String) -> Result<Self, FlowError> {
        match self {
            SummarizeFlow::Summarizing { course, document } => Ok(SummarizeFlow::SummaryShown {
                course,
                document,
                summary,
            }),
            other => Err(other.invalid("show a summary")),
        }
    }

    /// A failed summary goes back to the selected document so it can be retried.
    pub fn fail(self) -> Result<Self, FlowError> {
        match self {
            SummarizeFlow::Summarizing { course, document } => {
                Ok(SummarizeFlow::DocumentSelected { course, document })
            }
            other => Err(other.invalid("fail summarizing")),
        }
    }

    pub fn reset(self) -> Self {
        SummarizeFlow::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn course() -> Course {
        Course {
            id: Uuid::new_v4(),
            name: "Net-Centric & Internet Programming".to_string(),
            code: "CSC 402".to_string(),
            instructor: "Dr. Tim Berners-Lee".to_string(),
            credits: 3,
            description: "Network programming and web technologies.".to_string(),
            icon: None,
            color: None,
            icon_bg_color: None,
            top_border_color: None,
            difficulty: None,
            rating: None,
            progress: None,
            next_class_time: None,
            due_soon_task: None,
            student_count: None,
            discussion_count: None,
            notification: None,
        }
    }

    fn document(course_id: Uuid, lecture: bool, content: Option<&str>) -> Document {
        Document {
            id: Uuid::new_v4(),
            course_id,
            name: "Syllabus_CSC402.pdf".to_string(),
            url: "#".to_string(),
            file_type: "PDF".to_string(),
            uploaded_at: Utc::now(),
            is_lecture_note: lecture,
            content: content.map(str::to_string),
        }
    }

    #[test]
    fn happy_path_walks_every_state() {
        let course = course();
        let lecture = document(course.id, true, Some("Week 1: HTTP and the client-server model"));
        let docs = vec![
            document(course.id, false, Some("Assignment brief")),
            lecture.clone(),
            document(Uuid::new_v4(), true, Some("Other course")),
        ];

        let flow = SummarizeFlow::Idle.select_course(course.clone(), &docs).unwrap();
        match &flow {
            SummarizeFlow::CourseSelected { candidates, .. } => {
                assert_eq!(candidates.len(), 1);
                assert_eq!(candidates[0].id, lecture.id);
            }
            other => panic!("unexpected state {other:?}"),
        }

        let flow = flow.select_document(lecture.id).unwrap();
        let (flow, input) = flow.begin_summarizing().unwrap();
        assert_eq!(input.course_name, course.name);
        assert_eq!(input.notes, "Week 1: HTTP and the client-server model");
        assert_eq!(flow.state_name(), "summarizing");

        let flow = flow.finish("HTTP basics.".to_string()).unwrap();
        assert_eq!(flow.state_name(), "summary shown");
        assert_eq!(flow.reset(), SummarizeFlow::Idle);
    }

    #[test]
    fn course_without_lecture_content_is_refused() {
        let course = course();
        let docs = vec![
            document(course.id, true, None),
            document(course.id, true, Some("  ")),
        ];
        let err = SummarizeFlow::Idle.select_course(course, &docs).unwrap_err();
        assert!(matches!(err, FlowError::NoSummarizableDocuments(_)));
    }

    #[test]
    fn failure_returns_to_document_selection() {
        let course = course();
        let lecture = document(course.id, true, Some("DES components"));
        let flow = SummarizeFlow::Idle
            .select_course(course, std::slice::from_ref(&lecture))
            .unwrap()
            .select_document(lecture.id)
            .unwrap();
        let (flow, _) = flow.begin_summarizing().unwrap();
        let flow = flow.fail().unwrap();
        assert_eq!(flow.state_name(), "document selected");
        assert!(flow.begin_summarizing().is_ok());
    }

    #[test]
    fn out_of_order_transitions_are_rejected() {
        assert!(matches!(
            SummarizeFlow::Idle.begin_summarizing(),
            Err(FlowError::InvalidTransition { .. })
        ));
        assert!(SummarizeFlow::Idle.finish("x".to_string()).is_err());

        let course = course();
        let lecture = document(course.id, true, Some("content"));
        let flow = SummarizeFlow::Idle
            .select_course(course, std::slice::from_ref(&lecture))
            .unwrap();
        assert!(matches!(
            flow.clone().select_document(Uuid::new_v4()),
            Err(FlowError::DocumentNotAvailable(_))
        ));
        assert!(flow.select_course(self::course(), &[]).is_err());
    }
}
