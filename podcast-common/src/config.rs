//! Configuration file loading
//!
//! Settings resolve in priority order:
//! 1. Command-line argument or environment variable (handled by the binary)
//! 2. TOML config file
//! 3. Compiled default
//!
//! A missing config file is not an error: every field falls through to the
//! compiled default.

use crate::db::StorageVariant;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file consulted when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "podcast.toml";

/// Default SQLite database file
pub const DEFAULT_DATABASE: &str = "podcast.db";

/// Optional settings read from the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub media_storage: Option<StorageVariant>,
    pub public_dir: Option<PathBuf>,
    pub upload_dir: Option<PathBuf>,
    pub staging_dir: Option<PathBuf>,
    pub max_upload_bytes: Option<usize>,
    pub admin_user: Option<String>,
    pub admin_pass: Option<String>,
    pub database: DatabaseSection,
}

/// `[database]` table of the config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub host: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

impl TomlConfig {
    /// Parse config file contents
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }

    /// Load the config file at `path`
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map(Some)
    }
}

/// Resolved relational store settings
///
/// The store is an embedded SQLite file named by `database`. `host`, `user`
/// and `password` are carried for deployments that set them but are not
/// used to open the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            user: "root".to_string(),
            password: String::new(),
            database: DEFAULT_DATABASE.to_string(),
        }
    }
}

impl DatabaseConfig {
    /// Path of the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.database)
    }

    /// True when network-style credentials differ from the defaults
    pub fn has_remote_settings(&self) -> bool {
        let defaults = Self::default();
        self.host != defaults.host || self.user != defaults.user || !self.password.is_empty()
    }
}
