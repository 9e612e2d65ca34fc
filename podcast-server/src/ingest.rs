//! Media ingestion
//!
//! Persists the file parts of an episode submission and produces the media
//! value stored with the episode row.
//!
//! File parts are streamed into spool files while the request body is read,
//! in the directory where the configured store keeps them:
//!
//! - Disk storage renames each spool file into the upload directory and
//!   returns its `/uploads/<file>` web path.
//! - Inline storage keeps the spooled document as the staging file, reads it
//!   back as the BLOB value, and removes it once the row is in.

use podcast_common::{EpisodeMedia, Error, MediaPaths, Result, StorageVariant};
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempPath};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

/// URL prefix under which the upload directory is served
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

const SPOOL_PREFIX: &str = "podcast-upload-";

/// One file part of a multipart submission, spooled to disk
///
/// The spool file is deleted on drop unless a store takes it over.
#[derive(Debug)]
pub struct UploadedFile {
    /// Multipart field name
    pub field: String,
    /// Filename supplied by the client
    pub file_name: String,
    spool: NamedTempFile,
    size: u64,
}

impl UploadedFile {
    /// Spool an in-memory part into `dir`
    pub async fn from_bytes(dir: &Path, field: &str, file_name: &str, bytes: &[u8]) -> Result<Self> {
        let mut writer = UploadWriter::create(dir, field, file_name)?;
        writer.write(bytes).await?;
        writer.finish().await
    }

    pub fn path(&self) -> &Path {
        self.spool.path()
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

/// Streams one file part into its spool file
pub struct UploadWriter {
    file: tokio::fs::File,
    upload: UploadedFile,
}

impl UploadWriter {
    /// Create the spool file; `dir` must exist
    pub fn create(dir: &Path, field: &str, file_name: &str) -> Result<Self> {
        let spool = tempfile::Builder::new()
            .prefix(SPOOL_PREFIX)
            .tempfile_in(dir)?;
        let file = tokio::fs::File::from_std(spool.as_file().try_clone()?);

        Ok(Self {
            file,
            upload: UploadedFile {
                field: field.to_string(),
                file_name: file_name.to_string(),
                spool,
                size: 0,
            },
        })
    }

    pub async fn write(&mut self, chunk: &[u8]) -> Result<()> {
        self.file.write_all(chunk).await?;
        self.upload.size += chunk.len() as u64;
        Ok(())
    }

    pub async fn finish(mut self) -> Result<UploadedFile> {
        self.file.flush().await?;
        Ok(self.upload)
    }
}

/// File parts of a complete episode submission
#[derive(Debug)]
pub enum EpisodeFiles {
    Disk {
        pdf: UploadedFile,
        image: UploadedFile,
        audio: UploadedFile,
    },
    Inline {
        document: UploadedFile,
    },
}

impl EpisodeFiles {
    pub fn variant(&self) -> StorageVariant {
        match self {
            EpisodeFiles::Disk { .. } => StorageVariant::Disk,
            EpisodeFiles::Inline { .. } => StorageVariant::Inline,
        }
    }
}

/// Storage name for an uploaded file: `<random token>-<original name>`
///
/// Only the final path component of the client filename is kept.
pub fn generated_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or("upload");

    format!("{}-{}", Uuid::new_v4().simple(), base)
}

/// Writes uploads as files under a fixed directory
#[derive(Debug, Clone)]
pub struct DiskStore {
    upload_dir: PathBuf,
}

impl DiskStore {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Move one spooled upload into place, returning its web path
    pub async fn store(&self, file: UploadedFile) -> Result<String> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;

        let stored_name = generated_file_name(&file.file_name);
        let target = self.upload_dir.join(&stored_name);
        let (field, size) = (file.field, file.size);

        if let Err(e) = file.spool.persist(&target) {
            // Spool on another filesystem
            tokio::fs::copy(e.file.path(), &target).await?;
        }

        debug!(
            "Stored upload '{}' ({} bytes) as {}",
            field,
            size,
            target.display()
        );

        Ok(format!("{}/{}", UPLOADS_URL_PREFIX, stored_name))
    }

    /// Write the three episode files
    ///
    /// Files already written stay on disk if a later write fails.
    pub async fn store_all(
        &self,
        pdf: UploadedFile,
        image: UploadedFile,
        audio: UploadedFile,
    ) -> Result<MediaPaths> {
        Ok(MediaPaths {
            pdf: Some(self.store(pdf).await?),
            image: Some(self.store(image).await?),
            audio: Some(self.store(audio).await?),
        })
    }
}

/// Staging file holding an inline document until its row is inserted
///
/// Dropping it deletes the file.
#[derive(Debug)]
pub struct StagedFile {
    path: TempPath,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the staging file; failures are only logged
    pub fn remove(self) {
        let path = self.path.to_path_buf();
        if let Err(e) = self.path.close() {
            warn!("Failed to remove staging file {}: {}", path.display(), e);
        }
    }

    /// Leave the staging file on disk
    pub fn keep(self) {
        match self.path.keep() {
            Ok(path) => warn!("Staging file left in place: {}", path.display()),
            Err(e) => warn!("Failed to keep staging file: {}", e),
        }
    }
}

/// Keeps uploads in the staging directory for BLOB storage
#[derive(Debug, Clone)]
pub struct InlineStore {
    staging_dir: PathBuf,
}

impl InlineStore {
    pub fn new(staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            staging_dir: staging_dir.into(),
        }
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Read the spooled document back as the BLOB value
    ///
    /// When the read fails the staging file is left in place.
    pub async fn stage(&self, file: UploadedFile) -> Result<(Vec<u8>, StagedFile)> {
        let staged = StagedFile {
            path: file.spool.into_temp_path(),
        };

        let read = tokio::fs::read(staged.path()).await;
        match read {
            Ok(contents) => Ok((contents, staged)),
            Err(e) => {
                staged.keep();
                Err(e.into())
            }
        }
    }
}

/// Result of ingesting an episode's files
#[derive(Debug)]
pub struct IngestedMedia {
    pub media: EpisodeMedia,
    pub staged: Option<StagedFile>,
}

/// Configured ingestion strategy
#[derive(Debug, Clone)]
pub enum MediaStore {
    Disk(DiskStore),
    Inline(InlineStore),
}

impl MediaStore {
    pub fn variant(&self) -> StorageVariant {
        match self {
            MediaStore::Disk(_) => StorageVariant::Disk,
            MediaStore::Inline(_) => StorageVariant::Inline,
        }
    }

    /// Directory file parts are spooled into
    pub fn spool_dir(&self) -> &Path {
        match self {
            MediaStore::Disk(store) => store.upload_dir(),
            MediaStore::Inline(store) => store.staging_dir(),
        }
    }

    pub async fn prepare_spool_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(self.spool_dir()).await?;
        Ok(())
    }

    pub async fn ingest(&self, files: EpisodeFiles) -> Result<IngestedMedia> {
        match (self, files) {
            (MediaStore::Disk(store), EpisodeFiles::Disk { pdf, image, audio }) => {
                let paths = store.store_all(pdf, image, audio).await?;
                Ok(IngestedMedia {
                    media: EpisodeMedia::Files(paths),
                    staged: None,
                })
            }
            (MediaStore::Inline(store), EpisodeFiles::Inline { document }) => {
                let (contents, staged) = store.stage(document).await?;
                Ok(IngestedMedia {
                    media: EpisodeMedia::Document(contents),
                    staged: Some(staged),
                })
            }
            (_, files) => Err(Error::InvalidInput(format!(
                "{} files submitted to {} media storage",
                files.variant(),
                self.variant()
            ))),
        }
    }
}
