//! # Podcast Common Library
//!
//! Shared code for the podcast listing backend:
//! - Error type
//! - Configuration file loading
//! - Database connection, schema management and the episode repository

pub mod config;
pub mod db;
pub mod error;

pub use db::{Episode, EpisodeMedia, EpisodeRepository, MediaPaths, NewEpisode, StorageVariant};
pub use error::{Error, Result};
