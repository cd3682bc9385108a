//! Descriptor extraction seam.
//!
//! The numerically hard work (face detection, embedding inference) lives
//! behind [`DescriptorExtractor`]; this crate only consumes "image path in,
//! descriptor out (or no-face signal)".

use crate::types::Descriptor;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    /// The input could not be decoded as an image.
    #[error("cannot decode image {path}: {reason}")]
    UnreadableImage { path: PathBuf, reason: String },
    /// The underlying inference backend failed.
    #[error("extractor backend failure: {0}")]
    Backend(String),
}

/// Pluggable face-embedding backend.
///
/// Implementations load their model state once at construction (from a
/// models directory or bundled weights) and are reused for every call;
/// there is no process-global "models loaded" flag. The first call may be
/// slow while the backend warms up, and every call may block on inference.
///
/// `extract` is deterministic for a fixed model and input. `Ok(None)`
/// means the image decoded fine but contained no detectable face — a
/// distinct outcome from [`ExtractError::UnreadableImage`].
pub trait DescriptorExtractor: Send + Sync {
    fn extract(&self, image: &Path) -> Result<Option<Descriptor>, ExtractError>;
}

/// Extractor backed by a fixed path-to-outcome table.
///
/// Stands in for a real inference backend in tests and dry-run wiring.
/// Paths registered with [`with_no_face`](Self::with_no_face) report a
/// decodable image without a detectable face; unregistered paths fail as
/// unreadable.
#[derive(Debug, Default)]
pub struct StaticExtractor {
    outcomes: HashMap<PathBuf, Option<Descriptor>>,
}

impl StaticExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_descriptor(mut self, path: impl Into<PathBuf>, descriptor: Descriptor) -> Self {
        self.outcomes.insert(path.into(), Some(descriptor));
        self
    }

    pub fn with_no_face(mut self, path: impl Into<PathBuf>) -> Self {
        self.outcomes.insert(path.into(), None);
        self
    }
}

impl DescriptorExtractor for StaticExtractor {
    fn extract(&self, image: &Path) -> Result<Option<Descriptor>, ExtractError> {
        match self.outcomes.get(image) {
            Some(outcome) => Ok(outcome.clone()),
            None => Err(ExtractError::UnreadableImage {
                path: image.to_path_buf(),
                reason: "no such image registered".to_string(),
            }),
        }
    }
}
