use serde::{Deserialize, Serialize};

/// Descriptor length produced by the observed face-embedding model family.
pub const DESCRIPTOR_DIM: usize = 128;

/// Label reported when no gallery candidate qualifies.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Fixed-length face descriptor (typically 128-dimensional).
///
/// Immutable once computed. Descriptors are compared only via
/// [`euclidean_distance`](Self::euclidean_distance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    pub values: Vec<f32>,
}

impl Descriptor {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Compute Euclidean distance between two descriptors.
    pub fn euclidean_distance(&self, other: &Descriptor) -> f32 {
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f32>()
            .sqrt()
    }
}

/// Result of matching a query descriptor against a gallery.
///
/// Serializes to the `{name, distance}` object the upload collaborator
/// returns to its clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Label of the matched identity, or `"unknown"`.
    pub name: String,
    /// Euclidean distance of the match; `+inf` when unmatched.
    pub distance: f32,
}

impl MatchResult {
    /// The no-match result: `"unknown"` at infinite distance.
    pub fn unknown() -> Self {
        Self {
            name: UNKNOWN_LABEL.to_string(),
            distance: f32::INFINITY,
        }
    }

    /// True when a gallery candidate qualified.
    pub fn is_match(&self) -> bool {
        self.name != UNKNOWN_LABEL
    }
}

/// Strategy for selecting the best gallery candidate for a query descriptor.
pub trait Matcher {
    fn best_match(
        &self,
        query: &Descriptor,
        candidates: &[(String, Descriptor)],
        threshold: f32,
    ) -> MatchResult;
}

/// Euclidean nearest-neighbor matcher.
///
/// Linear scan with a strict `<` against both the running best and the
/// threshold: an equidistant candidate never displaces an earlier one, and
/// a candidate at exactly the threshold does not qualify. Enrollment order
/// therefore decides ties, which keeps output deterministic.
pub struct EuclideanMatcher;

impl Matcher for EuclideanMatcher {
    fn best_match(
        &self,
        query: &Descriptor,
        candidates: &[(String, Descriptor)],
        threshold: f32,
    ) -> MatchResult {
        let mut best = MatchResult::unknown();

        for (label, descriptor) in candidates {
            let d = query.euclidean_distance(descriptor);
            if d < best.distance && d < threshold {
                best = MatchResult {
                    name: label.clone(),
                    distance: d,
                };
            }
        }

        best
    }
}
