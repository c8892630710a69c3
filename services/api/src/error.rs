//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and how it is
//! rendered as a JSON `{ "error": ... }` envelope at the handler boundary.

use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use persona_voice_core::{PipelineError, PortError, ValidationError};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

pub const GENERATION_FAILED: &str = "Failed to generate response.";
pub const SYNTHESIS_FAILED: &str = "Failed to generate audio.";
pub const STORAGE_FAILED: &str = "Failed to save generated audio.";
pub const CONFIGURATION_FAILED: &str = "Server configuration error.";
pub const INTERNAL_FAILED: &str = "An internal server error occurred.";

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The request body was missing a mandatory field.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The request body was not a JSON object we could read.
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// One of the upstream stages failed.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Represents an error that propagated up from a port outside the pipeline (storage).
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// The body of every non-2xx response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    /// The status code and caller-facing message. Upstream details never leave the server.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::MalformedBody(_) => (
                StatusCode::BAD_REQUEST,
                "Request body must be valid JSON.".to_string(),
            ),
            ApiError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                CONFIGURATION_FAILED.to_string(),
            ),
            ApiError::Pipeline(PipelineError::Generation(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERATION_FAILED.to_string(),
            ),
            ApiError::Pipeline(PipelineError::Synthesis(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                SYNTHESIS_FAILED.to_string(),
            ),
            ApiError::Port(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                STORAGE_FAILED.to_string(),
            ),
            ApiError::Io(_) | ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_FAILED.to_string(),
            ),
        }
    }

    /// Server errors are logged once at the handler boundary, except pipeline
    /// failures, which the orchestrator already logs with their stage.
    pub fn logs_at_boundary(&self) -> bool {
        !matches!(self, ApiError::Pipeline(_)) && self.status_and_message().0.is_server_error()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if self.logs_at_boundary() {
            error!("Error in /api/generate: {:?}", self);
        }
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request_with_fixed_message() {
        let (status, message) = ApiError::from(ValidationError::MissingFields).status_and_message();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            message,
            "Request body must contain both a \"persona\" and a \"prompt\" field."
        );
    }

    #[test]
    fn upstream_details_are_not_echoed() {
        let err = ApiError::from(PipelineError::Synthesis(PortError::Upstream(
            "quota exceeded for key abc123".to_string(),
        )));
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, SYNTHESIS_FAILED);
        assert!(!message.contains("abc123"));
    }

    #[test]
    fn pipeline_failures_are_not_logged_twice() {
        let pipeline = ApiError::from(PipelineError::Generation(PortError::Upstream(
            "model unavailable".to_string(),
        )));
        assert!(!pipeline.logs_at_boundary());
        assert!(ApiError::from(PortError::Unexpected("disk full".to_string())).logs_at_boundary());
        assert!(!ApiError::from(ValidationError::MissingFields).logs_at_boundary());
    }

    #[test]
    fn config_errors_are_server_errors() {
        let err = ApiError::from(ConfigError::MissingVar("GEMINI_API_KEY".to_string()));
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, CONFIGURATION_FAILED);
    }
}
