//! Server configuration
//!
//! Each setting resolves in priority order:
//! 1. Command-line argument or environment variable (`.env` is loaded first)
//! 2. TOML config file (`PODCAST_CONFIG`, else `podcast.toml` if present)
//! 3. Compiled default

use clap::Parser;
use podcast_common::config::{DatabaseConfig, TomlConfig, DEFAULT_CONFIG_FILE};
use podcast_common::{Error, Result, StorageVariant};
use std::path::PathBuf;

use crate::{DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PUBLIC_DIR};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Command-line arguments for podcast-server
#[derive(Parser, Debug, Default)]
#[command(name = "podcast-server")]
#[command(about = "Podcast listing backend")]
#[command(version)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    #[arg(long, env = "DB_HOST")]
    pub db_host: Option<String>,

    #[arg(long, env = "DB_USER")]
    pub db_user: Option<String>,

    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// SQLite database file
    #[arg(long, env = "DB_DATABASE")]
    pub db_database: Option<String>,

    /// Administrator user name
    #[arg(long, env = "ADMIN_USER")]
    pub admin_user: Option<String>,

    /// Administrator password
    #[arg(long, env = "ADMIN_PASS", hide_env_values = true)]
    pub admin_pass: Option<String>,

    /// Where uploaded media is kept: "disk" or "inline"
    #[arg(long, env = "MEDIA_STORAGE")]
    pub media_storage: Option<StorageVariant>,

    /// Static files directory
    #[arg(long, env = "PUBLIC_DIR")]
    pub public_dir: Option<PathBuf>,

    /// Upload directory for disk storage (default: <public-dir>/uploads)
    #[arg(long, env = "UPLOAD_DIR")]
    pub upload_dir: Option<PathBuf>,

    /// Staging directory for inline storage (default: system temp dir)
    #[arg(long, env = "STAGING_DIR")]
    pub staging_dir: Option<PathBuf>,

    /// Maximum request body size in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: Option<usize>,

    /// TOML config file
    #[arg(short, long, env = "PODCAST_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Fully resolved server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub admin_user: Option<String>,
    pub admin_pass: Option<String>,
    pub media_storage: StorageVariant,
    pub public_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub staging_dir: PathBuf,
    pub max_upload_bytes: usize,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl ServerConfig {
    /// Read the config file named by the arguments, then resolve
    ///
    /// An explicitly named file must exist; the default file is optional.
    pub fn load(args: Args) -> Result<Self> {
        let toml = match &args.config {
            Some(path) => TomlConfig::load(path)?.ok_or_else(|| {
                Error::Config(format!("Config file not found: {}", path.display()))
            })?,
            None => TomlConfig::load(&PathBuf::from(DEFAULT_CONFIG_FILE))?.unwrap_or_default(),
        };

        Ok(Self::resolve(args, toml))
    }

    /// Merge arguments over file values over defaults
    pub fn resolve(args: Args, toml: TomlConfig) -> Self {
        let db_defaults = DatabaseConfig::default();
        let database = DatabaseConfig {
            host: non_empty(args.db_host)
                .or(toml.database.host)
                .unwrap_or(db_defaults.host),
            user: non_empty(args.db_user)
                .or(toml.database.user)
                .unwrap_or(db_defaults.user),
            password: args
                .db_password
                .or(toml.database.password)
                .unwrap_or(db_defaults.password),
            database: non_empty(args.db_database)
                .or(toml.database.database)
                .unwrap_or(db_defaults.database),
        };

        let public_dir = args
            .public_dir
            .or(toml.public_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR));
        let upload_dir = args
            .upload_dir
            .or(toml.upload_dir)
            .unwrap_or_else(|| public_dir.join("uploads"));

        Self {
            host: non_empty(args.host)
                .or(toml.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: args.port.or(toml.port).unwrap_or(DEFAULT_PORT),
            database,
            admin_user: non_empty(args.admin_user).or(non_empty(toml.admin_user)),
            admin_pass: non_empty(args.admin_pass).or(non_empty(toml.admin_pass)),
            media_storage: args
                .media_storage
                .or(toml.media_storage)
                .unwrap_or_default(),
            public_dir,
            upload_dir,
            staging_dir: args
                .staging_dir
                .or(toml.staging_dir)
                .unwrap_or_else(std::env::temp_dir),
            max_upload_bytes: args
                .max_upload_bytes
                .or(toml.max_upload_bytes)
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        }
    }

    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
