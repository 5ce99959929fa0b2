use crate::domain::model::{
    FaceReading, FeatureScoreMap, FinalScoreVector, Frame, NarrativeRequest, Recommendation,
    RemedyPreview, Snapshot, ZodiacRecord,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Image in, per-aspect score map out.
#[async_trait]
pub trait FaceAnalyzer: Send + Sync {
    async fn analyze(&self, snapshot: &Snapshot) -> Result<FeatureScoreMap>;
}

/// Free-form reading text for a score vector, zodiac sign and remedy.
#[async_trait]
pub trait RemedyNarrator: Send + Sync {
    async fn narrate(&self, request: &NarrativeRequest) -> Result<String>;
}

/// Source of camera streams. `open` is the permission request and may wait
/// indefinitely for the user.
pub trait Camera: Send {
    type Stream: MediaStream;

    fn open(&mut self) -> impl std::future::Future<Output = Result<Self::Stream>> + Send;
}

pub trait MediaStream: Send {
    /// Resolves once stream metadata is available. There is no timeout.
    fn ready(&mut self) -> impl std::future::Future<Output = ()> + Send;

    fn grab_frame(&mut self) -> Result<Frame>;

    /// Stops every track of the stream.
    fn stop(&mut self);

    fn is_live(&self) -> bool;
}

/// Receives live frames while a scan is in progress.
pub trait FrameObserver: Send {
    fn on_frame(&mut self, frame: &Frame);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl FrameObserver for NoopObserver {
    fn on_frame(&mut self, _frame: &Frame) {}
}

/// Presentation surface for a reading. The engine only ever talks to this.
pub trait ReadingRenderer {
    fn render_face(&mut self, face: &FaceReading);
    fn render_zodiac(&mut self, sign: &str, record: Option<&ZodiacRecord>);
    fn render_scores(&mut self, scores: &FinalScoreVector);
    fn render_recommendation(&mut self, recommendation: &Recommendation);
    fn render_narrative(&mut self, text: &str);
    fn render_preview(&mut self, preview: &RemedyPreview);
}
