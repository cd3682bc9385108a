//! Identification pipeline: query descriptor, gallery candidates, best match.

use crate::extractor::{DescriptorExtractor, ExtractError};
use crate::gallery::Gallery;
use crate::types::{EuclideanMatcher, MatchResult, Matcher};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Maximum Euclidean distance for a positive match, the operating point
/// of the observed 128-d embedding model.
pub const DEFAULT_THRESHOLD: f32 = 0.6;

#[derive(Error, Debug)]
pub enum IdentifyError {
    /// The query image decoded fine but contains no detectable face.
    ///
    /// Not folded into an `"unknown"` match: "unknown" means a face was
    /// found that matches nobody, which is a different outcome.
    #[error("no face detected in query image: {0}")]
    NoFaceDetected(PathBuf),
    /// The single reference image of a verification has no detectable face.
    #[error("no face detected in reference image: {0}")]
    ReferenceFaceMissing(PathBuf),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Identify the enrolled person best matching the face in `query_path`.
///
/// Gallery entries whose reference image has no detectable face are
/// skipped; they shrink the candidate set without failing the call.
/// Extractor failures (unreadable images, backend errors) propagate
/// unchanged; extraction is deterministic, so nothing is retried here.
pub fn identify(
    extractor: &dyn DescriptorExtractor,
    query_path: &Path,
    gallery: &Gallery,
    threshold: f32,
) -> Result<MatchResult, IdentifyError> {
    let query = extractor
        .extract(query_path)?
        .ok_or_else(|| IdentifyError::NoFaceDetected(query_path.to_path_buf()))?;

    let candidates = gallery.candidates(extractor)?;
    tracing::debug!(
        candidates = candidates.len(),
        threshold,
        query = %query_path.display(),
        "matching query descriptor"
    );

    Ok(EuclideanMatcher.best_match(&query, &candidates, threshold))
}

/// Binary decision: does the face in `query_path` belong to the person
/// shown in `known_path`?
///
/// The known image must contain a face
/// ([`IdentifyError::ReferenceFaceMissing`] otherwise). A query image
/// without a face is not an error — there is no face to verify, so the
/// answer is `false`.
pub fn is_same_person(
    extractor: &dyn DescriptorExtractor,
    known_path: &Path,
    query_path: &Path,
    threshold: f32,
) -> Result<bool, IdentifyError> {
    let known = extractor
        .extract(known_path)?
        .ok_or_else(|| IdentifyError::ReferenceFaceMissing(known_path.to_path_buf()))?;

    let Some(query) = extractor.extract(query_path)? else {
        return Ok(false);
    };

    Ok(known.euclidean_distance(&query) < threshold)
}
