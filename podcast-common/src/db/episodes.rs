//! Episode persistence
//!
//! Rows are only ever inserted and listed. Listing uses the store's natural
//! order; no `ORDER BY` is applied.

use crate::db::{Episode, EpisodeMedia, MediaPaths, NewEpisode, StorageVariant};
use crate::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// Insert/list access to the `podcast` table
#[derive(Debug, Clone)]
pub struct EpisodeRepository {
    pool: SqlitePool,
    variant: StorageVariant,
}

impl EpisodeRepository {
    pub fn new(pool: SqlitePool, variant: StorageVariant) -> Self {
        Self { pool, variant }
    }

    pub fn variant(&self) -> StorageVariant {
        self.variant
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Every stored episode
    pub async fn list_all(&self) -> Result<Vec<Episode>> {
        let sql = match self.variant {
            StorageVariant::Disk => {
                "SELECT id, nombre, tema, descripcion, pdf, imagen, audio FROM podcast"
            }
            StorageVariant::Inline => "SELECT id, nombre, tema, descripcion, pdf FROM podcast",
        };

        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;

        rows.iter().map(|row| self.episode_from_row(row)).collect()
    }

    /// Insert one episode, returning its new id
    pub async fn insert(&self, episode: &NewEpisode) -> Result<i64> {
        if episode.media.variant() != self.variant {
            return Err(Error::InvalidInput(format!(
                "{} media cannot be stored in a {} repository",
                episode.media.variant(),
                self.variant
            )));
        }

        let result = match &episode.media {
            EpisodeMedia::Files(paths) => {
                sqlx::query(
                    r#"
                    INSERT INTO podcast (nombre, tema, descripcion, pdf, imagen, audio)
                    VALUES (?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(&episode.name)
                .bind(&episode.topic)
                .bind(&episode.description)
                .bind(&paths.pdf)
                .bind(&paths.image)
                .bind(&paths.audio)
                .execute(&self.pool)
                .await?
            }
            EpisodeMedia::Document(bytes) => {
                sqlx::query(
                    r#"
                    INSERT INTO podcast (nombre, tema, descripcion, pdf)
                    VALUES (?, ?, ?, ?)
                    "#,
                )
                .bind(&episode.name)
                .bind(&episode.topic)
                .bind(&episode.description)
                .bind(bytes.as_slice())
                .execute(&self.pool)
                .await?
            }
        };

        Ok(result.last_insert_rowid())
    }

    /// Stored document of one episode (inline storage only)
    pub async fn find_document(&self, id: i64) -> Result<Option<Vec<u8>>> {
        if self.variant != StorageVariant::Inline {
            return Ok(None);
        }

        let document = sqlx::query_scalar::<_, Vec<u8>>("SELECT pdf FROM podcast WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(document)
    }

    fn episode_from_row(&self, row: &SqliteRow) -> Result<Episode> {
        let media = match self.variant {
            StorageVariant::Disk => EpisodeMedia::Files(MediaPaths {
                pdf: row.try_get("pdf")?,
                image: row.try_get("imagen")?,
                audio: row.try_get("audio")?,
            }),
            StorageVariant::Inline => EpisodeMedia::Document(row.try_get("pdf")?),
        };

        Ok(Episode {
            id: row.try_get("id")?,
            name: row.try_get("nombre")?,
            topic: row.try_get("tema")?,
            description: row.try_get("descripcion")?,
            media,
        })
    }
}
