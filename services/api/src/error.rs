//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service, and how each
//! variant is turned into an HTTP response.

use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use study_dashboard_core::{
    flow::FlowError, ports::PortError, quiz::QuizError, StudyToolError, ValidationError,
};
use tracing::{error, warn};
use utoipa::ToSchema;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    #[error("{0}")]
    StudyTool(#[from] StudyToolError),

    #[error("{0}")]
    Quiz(#[from] QuizError),

    #[error("{0}")]
    Flow(#[from] FlowError),

    /// A request that was rejected before anything was touched.
    #[error("{0}")]
    BadRequest(String),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// The JSON body of every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub severity: Severity,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Port(PortError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Port(PortError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Port(PortError::InvalidResponse(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Port(PortError::Unexpected(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::StudyTool(err) => match err {
                StudyToolError::EmptyInput(_) => StatusCode::BAD_REQUEST,
                StudyToolError::AnswerMismatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                StudyToolError::EmptyOutput(_)
                | StudyToolError::MalformedOutput(_)
                | StudyToolError::Backend(_) => StatusCode::BAD_GATEWAY,
            },
            ApiError::Quiz(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Flow(FlowError::InvalidTransition { .. }) => StatusCode::CONFLICT,
            ApiError::Flow(_) => StatusCode::BAD_REQUEST,
            ApiError::Config(_) | ApiError::Io(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            ApiError::StudyTool(err) if err.is_warning() => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let severity = self.severity();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected ({}): {}", status, self);
        }
        let body = ErrorBody {
            error: self.to_string(),
            severity,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn study_tool_errors_map_to_gateway_or_warning() {
        let err = ApiError::from(StudyToolError::MalformedOutput("bad json".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.severity(), Severity::Error);

        let err = ApiError::from(StudyToolError::AnswerMismatch {
            question_number: 2,
            question_text: "What does HTML stand for?".to_string(),
            correct_option_text: "Hypertext".to_string(),
        });
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.severity(), Severity::Warning);

        let err = ApiError::from(StudyToolError::EmptyInput("notes"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn port_errors_map_by_kind() {
        assert_eq!(
            ApiError::from(PortError::NotFound("Note".to_string())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(PortError::InvalidInput("title".to_string())).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn response_body_carries_message_and_severity() {
        let response = ApiError::BadRequest("title must not be empty".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "title must not be empty");
        assert_eq!(body["severity"], "error");
    }
}
