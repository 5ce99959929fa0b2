pub mod aggregate;
pub mod capture;
pub mod descriptions;
pub mod engine;
pub mod recommend;
pub mod reference;
pub mod snapshot;
pub mod zodiac;

pub use crate::domain::model::{
    Aspect, FeatureScoreMap, FinalScoreVector, Reading, Recommendation, ReferenceData,
    RemedyRecord, Snapshot, ZodiacRecord,
};
pub use crate::domain::ports::{
    Camera, FaceAnalyzer, FrameObserver, MediaStream, ReadingRenderer, RemedyNarrator, Storage,
};
pub use crate::utils::error::Result;
