//! Administration routes
//!
//! `POST /private` is the combined endpoint: the same body shape serves a
//! login attempt or an episode submission, decided by which fields are
//! present. `POST /login` and `POST /episodes` each accept one intent.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};
use tracing::{info, warn};

use super::episodes::store_episode;
use super::insufficient_data;
use crate::error::{ApiError, ApiResult};
use crate::forms::{LoginRequest, PrivateSubmission, SubmittedForm};
use crate::views;
use crate::AppState;

/// GET /private
pub async fn private_form() -> Html<String> {
    Html(views::private_page())
}

/// POST /private
pub async fn submit_private(
    State(state): State<AppState>,
    form: SubmittedForm,
) -> ApiResult<Response> {
    match form.classify(state.media.variant()) {
        PrivateSubmission::Login(request) => check_login(&state, &request),
        PrivateSubmission::Episode(submission) => store_episode(&state, submission).await,
        PrivateSubmission::Insufficient => Err(insufficient_data()),
    }
}

/// POST /login
pub async fn login(State(state): State<AppState>, form: SubmittedForm) -> ApiResult<Response> {
    let request = form.login().ok_or_else(insufficient_data)?;
    check_login(&state, &request)
}

fn check_login(state: &AppState, request: &LoginRequest) -> ApiResult<Response> {
    if state.verifier.verify(&request.user, &request.password) {
        info!("Administrator '{}' signed in", request.user);
        Ok(Html(views::special_page(state.media.variant())).into_response())
    } else {
        warn!("Rejected sign-in attempt for '{}'", request.user);
        Err(ApiError::Unauthorized("Incorrect password".to_string()))
    }
}
