//! HTTP API handlers for podcast-server

pub mod episodes;
pub mod health;
pub mod private;

pub use episodes::{create_episode, get_document, list_episodes};
pub use health::health_routes;
pub use private::{login, private_form, submit_private};

use axum::{http::StatusCode, response::Html};

use crate::error::ApiError;
use crate::views;

/// Body is neither a complete credential pair nor a complete episode
pub(crate) fn insufficient_data() -> ApiError {
    ApiError::BadRequest("Insufficient data".to_string())
}

/// Any route or method without a handler
pub async fn not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(views::not_found_page()))
}
