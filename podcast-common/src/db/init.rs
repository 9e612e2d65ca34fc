//! Database initialization
//!
//! Startup never fails because of the store: a connection error leaves the
//! process running on a lazy pool, and a schema error is logged. Requests
//! that reach the store afterwards fail on their own.

use crate::config::DatabaseConfig;
use crate::db::StorageVariant;
use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::{error, info, warn};

/// Name of the single table managed by this crate
pub const EPISODE_TABLE: &str = "podcast";

const MAX_CONNECTIONS: u32 = 10;

fn connect_options(config: &DatabaseConfig) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(config.database_path())
        .create_if_missing(true)
}

/// Open (creating if needed) the database file
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool> {
    let db_path = config.database_path();
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(connect_options(config))
        .await?;

    Ok(pool)
}

/// Pool that connects on first use
pub fn connect_lazy(config: &DatabaseConfig) -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_lazy_with(connect_options(config))
}

/// Create the `podcast` table if it does not exist
pub async fn ensure_schema(pool: &SqlitePool, variant: StorageVariant) -> Result<()> {
    let sql = match variant {
        StorageVariant::Disk => {
            r#"
            CREATE TABLE IF NOT EXISTS podcast (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                nombre VARCHAR(255) NOT NULL,
                tema VARCHAR(255) NOT NULL,
                descripcion VARCHAR(255) NOT NULL,
                pdf VARCHAR(255),
                imagen VARCHAR(255),
                audio VARCHAR(255)
            )
            "#
        }
        StorageVariant::Inline => {
            r#"
            CREATE TABLE IF NOT EXISTS podcast (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                nombre VARCHAR(255) NOT NULL,
                tema VARCHAR(255) NOT NULL,
                descripcion VARCHAR(255) NOT NULL,
                pdf BLOB NOT NULL
            )
            "#
        }
    };

    sqlx::query(sql).execute(pool).await?;

    Ok(())
}

/// Detect which layout an existing `podcast` table has
///
/// Returns `None` when the table does not exist.
pub async fn detect_variant(pool: &SqlitePool) -> Result<Option<StorageVariant>> {
    let rows = sqlx::query(&format!("PRAGMA table_info({})", EPISODE_TABLE))
        .fetch_all(pool)
        .await?;

    if rows.is_empty() {
        return Ok(None);
    }

    // PRAGMA table_info returns: (cid, name, type, notnull, dflt_value, pk)
    let has_image = rows.iter().any(|row| row.get::<String, _>(1) == "imagen");
    Ok(Some(if has_image {
        StorageVariant::Disk
    } else {
        StorageVariant::Inline
    }))
}

/// Connect and ensure the schema, logging instead of failing
pub async fn init_database(config: &DatabaseConfig, variant: StorageVariant) -> SqlitePool {
    let db_path = config.database_path();

    let pool = match connect(config).await {
        Ok(pool) => {
            info!("✓ Connected to database: {}", db_path.display());
            pool
        }
        Err(e) => {
            error!("Database connection failed ({}): {}", db_path.display(), e);
            return connect_lazy(config);
        }
    };

    match detect_variant(&pool).await {
        Ok(Some(existing)) if existing != variant => {
            warn!(
                "Table '{}' uses {} storage but the server is configured for {} storage",
                EPISODE_TABLE, existing, variant
            );
        }
        Ok(_) => {}
        Err(e) => warn!("Could not inspect table '{}': {}", EPISODE_TABLE, e),
    }

    match ensure_schema(&pool, variant).await {
        Ok(()) => info!("✓ Table '{}' ready ({} storage)", EPISODE_TABLE, variant),
        Err(e) => error!("Failed to create table '{}': {}", EPISODE_TABLE, e),
    }

    pool
}
