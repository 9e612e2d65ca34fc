//! Error types for podcast-server
//!
//! Client mistakes answer with plain text, routing misses with the
//! not-found page, and server failures with a generic JSON body. Details of
//! server failures go to the log, never to the client.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::views;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or incomplete form data (400)
    #[error("{0}")]
    BadRequest(String),

    /// Credential check failed (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Unknown resource (404)
    #[error("Not found")]
    NotFound,

    /// Request body rejected while extracting it
    #[error("{1}")]
    Rejected(StatusCode, String),

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            ApiError::NotFound => {
                (StatusCode::NOT_FOUND, Html(views::not_found_page())).into_response()
            }
            ApiError::Rejected(status, msg) => (status, msg).into_response(),
            ApiError::Internal(msg) => {
                let body = Json(json!({
                    "error": msg,
                }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
