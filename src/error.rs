//! Error types
//!
//! `ShiftError` covers the mood core, `StoreError` the sled catalog and
//! `ApiError` is what handlers return; it renders the structured JSON error
//! body `{ "error": { "code", "message" } }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShiftError {
    /// Selection was asked to choose from nothing.
    #[error("no candidates to choose from for `{attribute}`")]
    EmptyCandidates { attribute: &'static str },

    /// The mood table holds an empty list where content is required.
    #[error("mood table has no `{attribute}` values for `{mood}`")]
    DataIntegrity { mood: String, attribute: &'static str },

    #[error("weight for `{value}` must be finite and positive, got {weight}")]
    InvalidWeight { value: String, weight: f64 },

    #[error("fallback mood `{mood}` is not in the mood table")]
    UnknownFallback { mood: String },

    #[error("music link template `{template}` has no `{{id}}` placeholder")]
    MusicTemplate { template: String },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Sled(#[from] sled::Error),

    #[error("record codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("malformed request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Shift(#[from] ShiftError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Shift(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Shift(ShiftError::EmptyCandidates { .. }) => "empty_candidates",
            ApiError::Shift(ShiftError::DataIntegrity { .. }) => "data_integrity",
            ApiError::Shift(_) => "shift_failed",
            ApiError::Store(_) => "storage",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = self.code(), err = %self, "request failed");
        }
        let body = serde_json::json!({
            "error": { "code": self.code(), "message": self.to_string() }
        });
        (status, Json(body)).into_response()
    }
}
