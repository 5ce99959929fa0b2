use crate::domain::model::{FeatureScoreMap, FinalScoreVector, ZodiacRecord};

/// Zodiac-only contribution; an unknown sign contributes zero everywhere.
pub fn zodiac_vector(zodiac: Option<&ZodiacRecord>) -> FinalScoreVector {
    FinalScoreVector::from_fn(|aspect| zodiac.map_or(0, |record| record.score(aspect)))
}

/// Face-only contribution; absent aspects contribute zero.
pub fn face_vector(face_scores: &FeatureScoreMap) -> FinalScoreVector {
    FinalScoreVector::from_fn(|aspect| face_scores.score(aspect))
}

/// Per-aspect sum of the zodiac score and the face score. Missing data is a
/// zero contribution, never an error.
pub fn aggregate(zodiac: Option<&ZodiacRecord>, face_scores: &FeatureScoreMap) -> FinalScoreVector {
    let zodiac = zodiac_vector(zodiac);
    let face = face_vector(face_scores);
    FinalScoreVector::from_fn(|aspect| zodiac.get(aspect).saturating_add(face.get(aspect)))
}
