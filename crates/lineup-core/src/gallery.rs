//! Enrolled identities and their lazily computed descriptors.

use crate::config::GalleryConfig;
use crate::extractor::{DescriptorExtractor, ExtractError};
use crate::types::Descriptor;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

/// One enrolled person: a label and the reference image it was enrolled from.
#[derive(Debug, Clone)]
pub struct Identity {
    pub label: String,
    pub image_path: PathBuf,
}

impl Identity {
    pub fn new(label: impl Into<String>, image_path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            image_path: image_path.into(),
        }
    }
}

struct GalleryEntry {
    identity: Identity,
    /// Outer `None`: not yet computed. Inner `None`: the reference image
    /// has no detectable face and the entry is permanently unmatchable.
    cached: RwLock<Option<Option<Descriptor>>>,
}

/// Ordered, read-only collection of enrolled identities.
///
/// Descriptors are computed on first use and memoized for the lifetime of
/// the handle; a reference image replaced on disk afterwards goes
/// undetected. Construction computes nothing; call [`warm`](Self::warm)
/// for fail-fast startup. Enrollment order is preserved throughout: it is
/// what decides matcher ties.
pub struct Gallery {
    entries: Vec<GalleryEntry>,
    base_path: Option<PathBuf>,
}

impl Gallery {
    pub fn new(identities: Vec<Identity>) -> Self {
        Self {
            entries: identities
                .into_iter()
                .map(|identity| GalleryEntry {
                    identity,
                    cached: RwLock::new(None),
                })
                .collect(),
            base_path: None,
        }
    }

    /// Resolve relative reference-image paths against `base`.
    /// Absolute paths always pass through untouched.
    pub fn with_base_path(mut self, base: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base.into());
        self
    }

    pub fn from_config(config: &GalleryConfig) -> Self {
        let gallery = Self::new(
            config
                .known
                .iter()
                .map(|face| Identity::new(face.label.clone(), face.path.clone()))
                .collect(),
        );
        match &config.base_path {
            Some(base) => gallery.with_base_path(base.clone()),
            None => gallery,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Enrolled labels in enrollment order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.identity.label.as_str())
    }

    fn resolved_path(&self, identity: &Identity) -> PathBuf {
        match &self.base_path {
            Some(base) if !identity.image_path.is_absolute() => base.join(&identity.image_path),
            _ => identity.image_path.clone(),
        }
    }

    /// Descriptor for the entry at `index`, memoized per entry.
    ///
    /// Racing callers may both run the extractor; the first write wins and
    /// every caller observes the stored value, so recomputation is wasteful
    /// but never inconsistent. Extractor errors propagate and are not
    /// cached, so a later call retries the extraction.
    pub fn descriptor_for(
        &self,
        index: usize,
        extractor: &dyn DescriptorExtractor,
    ) -> Result<Option<Descriptor>, ExtractError> {
        let entry = &self.entries[index];

        {
            let guard = entry.cached.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = guard.as_ref() {
                return Ok(cached.clone());
            }
        }

        // Extract without holding the lock; inference may block for a while.
        let computed = extractor.extract(&self.resolved_path(&entry.identity))?;

        let mut guard = entry.cached.write().unwrap_or_else(PoisonError::into_inner);
        let stored = guard.get_or_insert(computed);
        Ok(stored.clone())
    }

    /// `(label, descriptor)` pairs for every entry with a usable descriptor,
    /// in enrollment order.
    ///
    /// Entries whose reference image has no detectable face are skipped
    /// with a warning — they shrink the candidate set rather than failing
    /// the operation.
    pub fn candidates(
        &self,
        extractor: &dyn DescriptorExtractor,
    ) -> Result<Vec<(String, Descriptor)>, ExtractError> {
        let mut out = Vec::with_capacity(self.entries.len());

        for (index, entry) in self.entries.iter().enumerate() {
            match self.descriptor_for(index, extractor)? {
                Some(descriptor) => out.push((entry.identity.label.clone(), descriptor)),
                None => {
                    tracing::warn!(
                        label = %entry.identity.label,
                        path = %self.resolved_path(&entry.identity).display(),
                        "no face in reference image; identity is unmatchable"
                    );
                }
            }
        }

        Ok(out)
    }

    /// Compute every entry's descriptor now instead of on first use.
    ///
    /// For callers that prefer fail-fast startup over lazy extraction.
    /// A no-face reference image is not an error here either.
    pub fn warm(&self, extractor: &dyn DescriptorExtractor) -> Result<(), ExtractError> {
        for index in 0..self.entries.len() {
            self.descriptor_for(index, extractor)?;
        }
        Ok(())
    }
}
