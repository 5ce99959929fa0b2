use crate::domain::model::{Aspect, FeatureDescription, FeatureMetadata, FeatureScoreMap};
use serde::Serialize;
use std::fmt;

pub const NO_DESCRIPTION: &str = "No reading available";

/// Description text for the facial feature behind `aspect` at `score`.
pub fn lookup<'a>(metadata: &'a [FeatureMetadata], aspect: Aspect, score: u32) -> Option<&'a str> {
    metadata
        .iter()
        .find(|feature| feature.name == aspect.facial_feature())
        .and_then(|feature| feature.descriptions.get(&score.to_string()))
        .map(String::as_str)
}

/// Splits `"summary: detail"`. Text without a colon is all summary.
pub fn split_description(text: &str) -> (String, String) {
    match text.split_once(':') {
        Some((summary, detail)) => (summary.trim().to_string(), detail.trim().to_string()),
        None => (text.trim().to_string(), String::new()),
    }
}

pub fn describe(scores: &FeatureScoreMap, metadata: &[FeatureMetadata]) -> Vec<FeatureDescription> {
    scores
        .present()
        .map(|(aspect, score)| {
            let text = lookup(metadata, aspect, score).unwrap_or_else(|| {
                tracing::debug!("No description for {} at score {}", aspect.facial_feature(), score);
                NO_DESCRIPTION
            });
            let (summary, detail) = split_description(text);

            FeatureDescription {
                aspect,
                feature: aspect.facial_feature().to_string(),
                score,
                summary,
                detail,
            }
        })
        .collect()
}

/// Five-star rendering of a 0-10 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PowerScale {
    pub filled: u8,
}

impl PowerScale {
    pub const STARS: u8 = 5;

    pub fn from_score(score: u32) -> Self {
        let filled = (score as f64 / 2.0).round().min(Self::STARS as f64) as u8;
        Self { filled }
    }

    pub fn empty(&self) -> u8 {
        Self::STARS - self.filled
    }
}

impl fmt::Display for PowerScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.filled {
            f.write_str("★")?;
        }
        for _ in 0..self.empty() {
            f.write_str("☆")?;
        }
        Ok(())
    }
}
