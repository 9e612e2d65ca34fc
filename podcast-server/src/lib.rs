//! podcast-server library
//!
//! Podcast listing backend: visitors list episodes, the administrator signs
//! in with a shared credential and publishes episodes with their media.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use podcast_common::EpisodeRepository;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod forms;
pub mod ingest;
pub mod views;

pub use crate::auth::{AdminVerifier, StaticCredentials};
pub use crate::error::{ApiError, ApiResult};

use crate::ingest::{MediaStore, UPLOADS_URL_PREFIX};

/// Directory served for unmatched GET paths
pub const DEFAULT_PUBLIC_DIR: &str = "public";

/// Request body limit (512 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Episode storage
    pub episodes: EpisodeRepository,
    /// Ingestion strategy for uploaded media
    pub media: MediaStore,
    /// Administrator credential check
    pub verifier: Arc<dyn AdminVerifier>,
    /// Static files served for unmatched GET paths
    pub public_dir: PathBuf,
    /// Maximum accepted request body size
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Create new application state
    pub fn new(
        episodes: EpisodeRepository,
        media: MediaStore,
        verifier: Arc<dyn AdminVerifier>,
    ) -> Self {
        Self {
            episodes,
            media,
            verifier,
            public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_public_dir(mut self, public_dir: impl Into<PathBuf>) -> Self {
        self.public_dir = public_dir.into();
        self
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

/// Build application router
///
/// Unknown paths, and known paths hit with another method, render the
/// not-found page with 404.
pub fn build_router(state: AppState) -> Router {
    use axum::handler::HandlerWithoutStateExt;
    use axum::routing::{get, post};

    let mut router = Router::new()
        .route("/", get(api::list_episodes).fallback(api::not_found))
        .route(
            "/private",
            get(api::private_form)
                .post(api::submit_private)
                .fallback(api::not_found),
        )
        .route("/login", post(api::login).fallback(api::not_found))
        .route(
            "/episodes",
            post(api::create_episode).fallback(api::not_found),
        )
        .route(
            "/episodes/:id/document",
            get(api::get_document).fallback(api::not_found),
        )
        .merge(api::health_routes());

    if let MediaStore::Disk(store) = &state.media {
        let uploads = ServeDir::new(store.upload_dir())
            .call_fallback_on_method_not_allowed(true)
            .fallback(api::not_found.into_service());
        router = router.nest_service(UPLOADS_URL_PREFIX, uploads);
    }

    let public = ServeDir::new(&state.public_dir)
        .call_fallback_on_method_not_allowed(true)
        .fallback(api::not_found.into_service());

    let body_limit = state.max_upload_bytes;

    router
        .fallback_service(public)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
