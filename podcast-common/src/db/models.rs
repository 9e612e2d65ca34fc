//! Database models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How uploaded media is persisted
///
/// Chosen once per process; it decides both the `podcast` table layout and
/// which multipart parts an episode submission must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageVariant {
    /// Files written to the upload directory, rows hold `/uploads/...` paths
    #[default]
    Disk,
    /// A single document stored as a BLOB in the row
    Inline,
}

impl FromStr for StorageVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "disk" => Ok(StorageVariant::Disk),
            "inline" => Ok(StorageVariant::Inline),
            other => Err(format!(
                "unknown media storage '{}' (expected 'disk' or 'inline')",
                other
            )),
        }
    }
}

impl fmt::Display for StorageVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageVariant::Disk => write!(f, "disk"),
            StorageVariant::Inline => write!(f, "inline"),
        }
    }
}

/// Web paths of the files belonging to one episode (disk storage)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPaths {
    pub pdf: Option<String>,
    pub image: Option<String>,
    pub audio: Option<String>,
}

/// Media attached to an episode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpisodeMedia {
    Files(MediaPaths),
    Document(Vec<u8>),
}

impl EpisodeMedia {
    pub fn variant(&self) -> StorageVariant {
        match self {
            EpisodeMedia::Files(_) => StorageVariant::Disk,
            EpisodeMedia::Document(_) => StorageVariant::Inline,
        }
    }
}

/// A stored podcast episode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    pub id: i64,
    pub name: String,
    pub topic: String,
    pub description: String,
    pub media: EpisodeMedia,
}

/// Insert payload for a new episode
#[derive(Debug, Clone)]
pub struct NewEpisode {
    pub name: String,
    pub topic: String,
    pub description: String,
    pub media: EpisodeMedia,
}
