//! Common error types for the podcast backend

use thiserror::Error;

/// Common result type for podcast operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared by the storage layer and the server
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input, e.g. media that does not match the storage variant
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
