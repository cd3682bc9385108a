//! lineup-engine — async front-end for the identification core.
//!
//! Model inference blocks, so the extractor and the gallery live on a
//! dedicated OS thread; async callers hold a clonable [`EngineHandle`]
//! and await replies over oneshot channels. When the last handle is
//! dropped the request channel closes, the loop ends and the extractor
//! is released with it.

use lineup_core::{DescriptorExtractor, ExtractError, Gallery, IdentifyError, MatchResult};
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Identify(#[from] IdentifyError),
    #[error("gallery warm-up failed: {0}")]
    Warmup(#[from] ExtractError),
    #[error("engine thread exited")]
    ChannelClosed,
}

/// Messages sent from async callers to the engine thread.
enum EngineRequest {
    Identify {
        query: PathBuf,
        reply: oneshot::Sender<Result<MatchResult, IdentifyError>>,
    },
    IsSamePerson {
        known: PathBuf,
        query: PathBuf,
        reply: oneshot::Sender<Result<bool, IdentifyError>>,
    },
}

/// Clone-safe handle to the engine thread.
#[derive(Clone, Debug)]
pub struct EngineHandle {
    tx: mpsc::Sender<EngineRequest>,
}

impl EngineHandle {
    /// Identify the enrolled person best matching the face in `query`.
    pub async fn identify(&self, query: impl Into<PathBuf>) -> Result<MatchResult, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(EngineRequest::Identify {
                query: query.into(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| EngineError::ChannelClosed)?;
        Ok(reply_rx.await.map_err(|_| EngineError::ChannelClosed)??)
    }

    /// Verify that `query` shows the same person as the reference image `known`.
    pub async fn is_same_person(
        &self,
        known: impl Into<PathBuf>,
        query: impl Into<PathBuf>,
    ) -> Result<bool, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(EngineRequest::IsSamePerson {
                known: known.into(),
                query: query.into(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| EngineError::ChannelClosed)?;
        Ok(reply_rx.await.map_err(|_| EngineError::ChannelClosed)??)
    }
}

/// Spawn the engine on a dedicated OS thread.
///
/// The extractor is acquired here, once, and owned by the thread for its
/// whole life. With `warm` set, every gallery descriptor is computed
/// before the first request is accepted (fail-fast startup); otherwise
/// descriptors fill lazily on first use.
pub fn spawn_engine(
    extractor: Box<dyn DescriptorExtractor>,
    gallery: Gallery,
    threshold: f32,
    warm: bool,
) -> Result<EngineHandle, EngineError> {
    if warm {
        gallery.warm(extractor.as_ref())?;
        tracing::info!(entries = gallery.len(), "gallery descriptors pre-warmed");
    }

    let (tx, mut rx) = mpsc::channel::<EngineRequest>(4);

    std::thread::Builder::new()
        .name("lineup-engine".into())
        .spawn(move || {
            tracing::info!(entries = gallery.len(), threshold, "engine thread started");
            while let Some(req) = rx.blocking_recv() {
                match req {
                    EngineRequest::Identify { query, reply } => {
                        let result =
                            lineup_core::identify(extractor.as_ref(), &query, &gallery, threshold);
                        let _ = reply.send(result);
                    }
                    EngineRequest::IsSamePerson {
                        known,
                        query,
                        reply,
                    } => {
                        let result = lineup_core::is_same_person(
                            extractor.as_ref(),
                            &known,
                            &query,
                            threshold,
                        );
                        let _ = reply.send(result);
                    }
                }
            }
            tracing::info!("engine thread exiting");
        })
        .expect("failed to spawn engine thread");

    Ok(EngineHandle { tx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineup_core::{Descriptor, Identity, StaticExtractor, DEFAULT_THRESHOLD, UNKNOWN_LABEL};

    fn fixture() -> (Box<dyn DescriptorExtractor>, Gallery) {
        let extractor = StaticExtractor::new()
            .with_descriptor("known/ibrahim.png", Descriptor::new(vec![0.3]))
            .with_descriptor("known/mahmoud.png", Descriptor::new(vec![0.8]))
            .with_descriptor("query.png", Descriptor::new(vec![0.0]))
            .with_no_face("crowdless.png");
        let gallery = Gallery::new(vec![
            Identity::new("Ibrahim", "known/ibrahim.png"),
            Identity::new("Mahmoud", "known/mahmoud.png"),
        ]);
        (Box::new(extractor), gallery)
    }

    #[tokio::test]
    async fn test_identify_round_trip() {
        let (extractor, gallery) = fixture();
        let handle = spawn_engine(extractor, gallery, DEFAULT_THRESHOLD, false).unwrap();

        let result = handle.identify("query.png").await.unwrap();
        assert_eq!(result.name, "Ibrahim");
        assert!((result.distance - 0.3).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_identify_no_face_maps_to_identify_error() {
        let (extractor, gallery) = fixture();
        let handle = spawn_engine(extractor, gallery, DEFAULT_THRESHOLD, false).unwrap();

        let err = handle.identify("crowdless.png").await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Identify(IdentifyError::NoFaceDetected(_))
        ));
    }

    #[tokio::test]
    async fn test_is_same_person_round_trip() {
        let (extractor, gallery) = fixture();
        let handle = spawn_engine(extractor, gallery, DEFAULT_THRESHOLD, false).unwrap();

        assert!(handle
            .is_same_person("known/ibrahim.png", "query.png")
            .await
            .unwrap());
        assert!(!handle
            .is_same_person("known/mahmoud.png", "query.png")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_cloned_handles_share_one_engine() {
        let (extractor, gallery) = fixture();
        let handle = spawn_engine(extractor, gallery, DEFAULT_THRESHOLD, true).unwrap();
        let other = handle.clone();

        let a = handle.identify("query.png").await.unwrap();
        let b = other.identify("query.png").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_warm_propagates_unreadable_reference() {
        // Gallery references an image the extractor cannot read at all.
        let extractor: Box<dyn DescriptorExtractor> = Box::new(StaticExtractor::new());
        let gallery = Gallery::new(vec![Identity::new("Ghost", "ghost.png")]);

        let err = spawn_engine(extractor, gallery, DEFAULT_THRESHOLD, true).unwrap_err();
        assert!(matches!(err, EngineError::Warmup(_)));
    }

    #[tokio::test]
    async fn test_strict_threshold_yields_unknown() {
        let (extractor, gallery) = fixture();
        // Threshold of zero can never be satisfied; distances are non-negative.
        let handle = spawn_engine(extractor, gallery, 0.0, false).unwrap();

        let result = handle.identify("query.png").await.unwrap();
        assert_eq!(result.name, UNKNOWN_LABEL);
    }
}
