//! lineup-core — Face identification against an enrolled gallery.
//!
//! Turns a query image into a fixed-length descriptor through a pluggable
//! [`DescriptorExtractor`], compares it against the gallery's descriptors
//! by Euclidean distance and selects the closest identity under a
//! threshold.

pub mod config;
pub mod extractor;
pub mod gallery;
pub mod identify;
pub mod types;

pub use config::{ConfigError, GalleryConfig, KnownFace};
pub use extractor::{DescriptorExtractor, ExtractError, StaticExtractor};
pub use gallery::{Gallery, Identity};
pub use identify::{identify, is_same_person, IdentifyError, DEFAULT_THRESHOLD};
pub use types::{Descriptor, EuclideanMatcher, MatchResult, Matcher, UNKNOWN_LABEL};
