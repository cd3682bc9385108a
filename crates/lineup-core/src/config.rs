//! Gallery configuration, supplied by the surrounding collaborator.
//!
//! ```toml
//! threshold = 0.6          # optional
//! base_path = "known"      # optional
//!
//! [[known]]
//! label = "Ibrahim"
//! path  = "ame.png"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// One `[[known]]` entry: an identity label and its reference image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnownFace {
    pub label: String,
    pub path: PathBuf,
}

/// Enrolled-gallery description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// Maximum Euclidean distance for a positive match.
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    /// Directory that relative reference-image paths resolve against.
    /// Absent: paths are used as given.
    #[serde(default)]
    pub base_path: Option<PathBuf>,
    #[serde(default)]
    pub known: Vec<KnownFace>,
}

fn default_threshold() -> f32 {
    crate::identify::DEFAULT_THRESHOLD
}

impl GalleryConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
