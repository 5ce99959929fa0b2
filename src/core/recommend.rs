//! Weakest-aspect detection and remedy selection.
//!
//! Ties are always resolved in favour of the earliest entry: the earliest
//! aspect in [`Aspect::ALL`] for [`weakest`], the earliest remedy in input
//! order for [`best_remedy`].

use crate::domain::model::{Aspect, FinalScoreVector, Recommendation, RemedyPreview, RemedyRecord};

pub fn weakest(scores: &FinalScoreVector) -> Aspect {
    let mut weakest = Aspect::ALL[0];
    for (aspect, value) in scores.iter() {
        if value < scores.get(weakest) {
            weakest = aspect;
        }
    }
    weakest
}

/// First remedy with the highest boost for `aspect`. `None` only when
/// `remedies` is empty.
pub fn best_remedy(aspect: Aspect, remedies: &[RemedyRecord]) -> Option<&RemedyRecord> {
    let mut best: Option<&RemedyRecord> = None;
    for remedy in remedies {
        match best {
            Some(current) if remedy.boost(aspect) <= current.boost(aspect) => {}
            _ => best = Some(remedy),
        }
    }
    best
}

pub fn apply_boost(scores: &FinalScoreVector, remedy: &RemedyRecord) -> FinalScoreVector {
    FinalScoreVector::from_fn(|aspect| scores.get(aspect).saturating_add(remedy.boost(aspect)))
}

pub fn recommend(scores: &FinalScoreVector, remedies: &[RemedyRecord]) -> Recommendation {
    let weakest = weakest(scores);
    let remedy = best_remedy(weakest, remedies).cloned();

    tracing::debug!(
        "Weakest aspect: {} ({}), remedy: {}",
        weakest,
        scores.get(weakest),
        remedy.as_ref().map(|r| r.name.as_str()).unwrap_or("none")
    );

    Recommendation { weakest, remedy }
}

pub fn find_remedy<'a>(remedies: &'a [RemedyRecord], name: &str) -> Option<&'a RemedyRecord> {
    let name = name.trim();
    remedies.iter().find(|remedy| remedy.name.trim() == name)
}

/// "What if I choose this remedy" view for any remedy, recommended or not.
pub fn preview(scores: &FinalScoreVector, remedy: &RemedyRecord) -> RemedyPreview {
    RemedyPreview {
        remedy: remedy.clone(),
        before: *scores,
        boosted: apply_boost(scores, remedy),
    }
}
