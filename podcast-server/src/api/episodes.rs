//! Episode listing and creation
//!
//! Creation runs media ingestion first and inserts the row afterwards. The
//! two steps are not transactional: files written before a failed insert
//! stay on disk, and so does an inline staging file.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use podcast_common::NewEpisode;
use tracing::{error, info};

use super::insufficient_data;
use crate::error::{ApiError, ApiResult};
use crate::forms::{EpisodeSubmission, SubmittedForm};
use crate::ingest::IngestedMedia;
use crate::views;
use crate::AppState;

/// GET /
///
/// Renders every stored episode.
pub async fn list_episodes(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let episodes = state.episodes.list_all().await.map_err(|e| {
        error!("Failed to load episodes: {}", e);
        ApiError::Internal("Failed to load episodes".to_string())
    })?;

    Ok(Html(views::index_page(&episodes)))
}

/// POST /episodes
///
/// Multipart episode submission; 302 to `/` once stored.
pub async fn create_episode(
    State(state): State<AppState>,
    form: SubmittedForm,
) -> ApiResult<Response> {
    let submission = form
        .into_episode(state.media.variant())
        .ok_or_else(insufficient_data)?;

    store_episode(&state, submission).await
}

/// GET /episodes/:id/document
///
/// Serves an inline-stored document.
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id: i64 = id.parse().map_err(|_| ApiError::NotFound)?;

    let document = state
        .episodes
        .find_document(id)
        .await
        .map_err(|e| {
            error!("Failed to load document for episode {}: {}", id, e);
            ApiError::Internal("Failed to load document".to_string())
        })?
        .ok_or(ApiError::NotFound)?;

    Ok(([(header::CONTENT_TYPE, "application/pdf")], document).into_response())
}

pub(crate) async fn store_episode(
    state: &AppState,
    submission: EpisodeSubmission,
) -> ApiResult<Response> {
    let EpisodeSubmission {
        name,
        topic,
        description,
        files,
    } = submission;

    let IngestedMedia { media, staged } = state.media.ingest(files).await.map_err(|e| {
        error!("Failed to store uploaded media: {}", e);
        ApiError::Internal("Failed to store uploaded media".to_string())
    })?;

    let episode = NewEpisode {
        name,
        topic,
        description,
        media,
    };

    let id = match state.episodes.insert(&episode).await {
        Ok(id) => id,
        Err(e) => {
            error!("Failed to insert new episode: {}", e);
            if let Some(staged) = staged {
                staged.keep();
            }
            return Err(ApiError::Internal(
                "Failed to insert new episode".to_string(),
            ));
        }
    };

    info!("New episode inserted: id={} name='{}'", id, episode.name);

    if let Some(staged) = staged {
        staged.remove();
    }

    Ok(redirect_to_listing())
}

/// 302 Found to the listing page
fn redirect_to_listing() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}
