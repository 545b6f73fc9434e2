//! Custom error types for the analysis service
//!
//! Provides structured, typed errors instead of generic Box<dyn Error>

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::constants::messages;

/// Errors raised while talking to the LLM provider
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("OpenAI error: {0}")]
    OpenAI(#[from] async_openai::error::OpenAIError),

    #[error("Stream interrupted: {0}")]
    Stream(String),

    #[error("LLM response timed out after {secs}s")]
    Timeout { secs: u64 },
}

/// Errors raised while producing an analysis
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("{}", messages::EMPTY_ANALYSIS)]
    EmptyResponse,

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors surfaced to HTTP callers as `{"detail": ...}`
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    Validation { status: StatusCode, message: String },

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { status, .. } => *status,
            ApiError::Analysis(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
