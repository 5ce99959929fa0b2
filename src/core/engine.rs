use crate::core::aggregate::{aggregate, face_vector, zodiac_vector};
use crate::core::descriptions::describe;
use crate::core::recommend::{self, find_remedy, recommend};
use crate::core::zodiac;
use crate::domain::model::{
    BirthDate, FaceReading, FeatureScoreMap, NarrativeRequest, Reading, ReferenceData,
    RemedyPreview, Snapshot,
};
use crate::domain::ports::{FaceAnalyzer, ReadingRenderer, RemedyNarrator};
use crate::utils::error::{ReadingError, Result};
use tracing::{debug, info, warn};

/// Runs one reading: snapshot analysis, zodiac lookup, aggregation,
/// recommendation and narrative. Holds no per-session state; the face
/// reading is passed back in by the caller.
pub struct FortuneEngine<A: FaceAnalyzer, N: RemedyNarrator> {
    reference: ReferenceData,
    analyzer: A,
    narrator: N,
}

impl<A: FaceAnalyzer, N: RemedyNarrator> FortuneEngine<A, N> {
    pub fn new(reference: ReferenceData, analyzer: A, narrator: N) -> Self {
        Self {
            reference,
            analyzer,
            narrator,
        }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Fails only when there is no snapshot. A failing analysis service is
    /// logged and yields `None`, leaving the face section empty.
    pub async fn analyze<R: ReadingRenderer>(
        &self,
        snapshot: Option<&Snapshot>,
        renderer: &mut R,
    ) -> Result<Option<FaceReading>> {
        let snapshot = snapshot.ok_or(ReadingError::NoSnapshot)?;

        info!("🧠 Analyzing face image ({} bytes)", snapshot.frame.data.len());
        let scores = match self.analyzer.analyze(snapshot).await {
            Ok(scores) => scores,
            Err(e) => {
                warn!("❌ Face analysis failed, continuing without face scores: {}", e);
                return Ok(None);
            }
        };
        debug!("📊 Face scores: {:?}", face_vector(&scores).values());

        let descriptions = describe(&scores, &self.reference.features);
        let face = FaceReading {
            scores,
            descriptions,
        };
        renderer.render_face(&face);

        Ok(Some(face))
    }

    /// Computes the reading for a birth date. Nothing runs without a
    /// snapshot. An empty birth date is a user error; an unparsable one reads
    /// as the unknown sign. `face` is `None` when analysis failed, which
    /// counts as zero face scores.
    pub async fn read<R: ReadingRenderer>(
        &self,
        snapshot: Option<&Snapshot>,
        face: Option<&FaceReading>,
        birth_date: Option<&str>,
        renderer: &mut R,
    ) -> Result<Reading> {
        if snapshot.is_none() {
            warn!("Reading requested without a snapshot");
            return Err(ReadingError::NoSnapshot);
        }

        let input = birth_date
            .map(str::trim)
            .filter(|input| !input.is_empty())
            .ok_or(ReadingError::MissingBirthDate)?;

        let birth_date = BirthDate::parse(input);
        if birth_date.is_none() {
            warn!("Could not parse birth date '{}', using unknown sign", input);
        }

        let record = birth_date
            .as_ref()
            .and_then(|date| zodiac::resolve_birth_date(&self.reference.zodiac, date));
        let sign = zodiac::identifier(record).to_string();
        info!("✨ Zodiac sign: {}", sign);
        renderer.render_zodiac(&sign, record);

        let no_face = FeatureScoreMap::new();
        let face_scores = face.map(|face| &face.scores).unwrap_or(&no_face);
        let final_scores = aggregate(record, face_scores);
        debug!("📊 Zodiac scores: {:?}", zodiac_vector(record).values());
        debug!("📊 Face scores: {:?}", face_vector(face_scores).values());
        info!("🎯 Final scores: {:?}", final_scores.values());
        renderer.render_scores(&final_scores);

        let recommendation = recommend(&final_scores, &self.reference.remedies);
        renderer.render_recommendation(&recommendation);

        let request = NarrativeRequest {
            score: final_scores.to_map(),
            zodiac: sign.clone(),
            remedy: recommendation
                .remedy
                .as_ref()
                .map(|remedy| remedy.name.clone())
                .unwrap_or_default(),
        };

        // single attempt, no retry
        let narrative = match self.narrator.narrate(&request).await {
            Ok(text) => {
                renderer.render_narrative(&text);
                Some(text)
            }
            Err(e) => {
                warn!("❌ Narrative request failed: {}", e);
                None
            }
        };

        Ok(Reading {
            zodiac: sign,
            birth_date,
            zodiac_scores: zodiac_vector(record),
            face_scores: face_vector(face_scores),
            final_scores,
            recommendation,
            narrative,
        })
    }

    /// Boosted scores if the named remedy were chosen.
    pub fn preview<R: ReadingRenderer>(
        &self,
        reading: &Reading,
        remedy_name: &str,
        renderer: &mut R,
    ) -> Option<RemedyPreview> {
        let Some(remedy) = find_remedy(&self.reference.remedies, remedy_name) else {
            warn!("No remedy named '{}'", remedy_name);
            return None;
        };

        let preview = recommend::preview(&reading.final_scores, remedy);
        renderer.render_preview(&preview);
        Some(preview)
    }
}
