//! podcast-server - Podcast listing backend
//!
//! Serves the episode listing, the administrator login and the episode
//! upload flow. Startup keeps going when the database is unreachable; only a
//! listener bind failure stops the process.

use anyhow::{Context, Result};
use clap::Parser;
use podcast_common::db::init_database;
use podcast_common::{EpisodeRepository, StorageVariant};
use podcast_server::config::{Args, ServerConfig};
use podcast_server::ingest::{DiskStore, InlineStore, MediaStore};
use podcast_server::{build_router, AppState, StaticCredentials};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // .env values become environment variables before argument parsing
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    info!(
        "Starting podcast-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        if cfg!(debug_assertions) { "debug" } else { "release" }
    );

    let config = ServerConfig::load(Args::parse()).context("Failed to load configuration")?;

    info!("Database: {}", config.database.database_path().display());
    if config.database.has_remote_settings() {
        warn!(
            "DB_HOST/DB_USER/DB_PASSWORD are set but unused: the store is the SQLite file {}",
            config.database.database
        );
    }

    let pool = init_database(&config.database, config.media_storage).await;
    let episodes = EpisodeRepository::new(pool, config.media_storage);

    let media = match config.media_storage {
        StorageVariant::Disk => {
            info!("Media storage: disk ({})", config.upload_dir.display());
            MediaStore::Disk(DiskStore::new(&config.upload_dir))
        }
        StorageVariant::Inline => {
            info!(
                "Media storage: inline (staging in {})",
                config.staging_dir.display()
            );
            MediaStore::Inline(InlineStore::new(&config.staging_dir))
        }
    };

    let credentials = StaticCredentials::new(config.admin_user.clone(), config.admin_pass.clone());
    if !credentials.is_configured() {
        warn!("ADMIN_USER/ADMIN_PASS not set: every sign-in attempt will be rejected");
    }

    let state = AppState::new(episodes, media, Arc::new(credentials))
        .with_public_dir(&config.public_dir)
        .with_max_upload_bytes(config.max_upload_bytes);
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("podcast-server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
