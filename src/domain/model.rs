use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::Index;

/// Life domain scored by both signals. Declaration order is the vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aspect {
    Work,
    Finance,
    Love,
    Health,
    Protection,
}

impl Aspect {
    pub const ALL: [Aspect; 5] = [
        Aspect::Work,
        Aspect::Finance,
        Aspect::Love,
        Aspect::Health,
        Aspect::Protection,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Aspect::Work => "work",
            Aspect::Finance => "finance",
            Aspect::Love => "love",
            Aspect::Health => "health",
            Aspect::Protection => "protection",
        }
    }

    /// Facial region the analysis service reads this aspect from.
    pub fn facial_feature(self) -> &'static str {
        match self {
            Aspect::Work => "eyebrows",
            Aspect::Finance => "nose",
            Aspect::Love => "mouth",
            Aspect::Health => "cheeks",
            Aspect::Protection => "chin",
        }
    }

    /// Exact lowercase key, as written by the analysis service. Keys that
    /// differ only in case or padding are not aspects, so two raw keys can
    /// never land on the same aspect.
    pub fn parse(name: &str) -> Option<Aspect> {
        Aspect::ALL.into_iter().find(|aspect| aspect.as_str() == name)
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coerces a loosely typed score into a non-negative integer. Anything that
/// is not a positive number counts as zero.
pub(crate) fn score_from_value(value: &Value) -> u32 {
    let as_float = match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                return v.min(u32::MAX as u64) as u32;
            }
            n.as_f64()
        }
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    as_float
        .filter(|f| f.is_finite() && *f > 0.0)
        .map(|f| f.min(u32::MAX as f64) as u32)
        .unwrap_or(0)
}

fn lenient_score<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(score_from_value).unwrap_or(0))
}

/// Per-aspect scores returned by the face analysis service. Absent keys are
/// legal and read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureScoreMap(HashMap<Aspect, u32>);

impl FeatureScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, aspect: Aspect, score: u32) -> Option<u32> {
        self.0.insert(aspect, score)
    }

    pub fn get(&self, aspect: Aspect) -> Option<u32> {
        self.0.get(&aspect).copied()
    }

    pub fn score(&self, aspect: Aspect) -> u32 {
        self.get(aspect).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Present aspects in fixed aspect order.
    pub fn present(&self) -> impl Iterator<Item = (Aspect, u32)> + '_ {
        Aspect::ALL
            .into_iter()
            .filter_map(move |aspect| self.get(aspect).map(|score| (aspect, score)))
    }

    /// Builds a map from raw JSON keys, dropping keys that are not aspects.
    pub fn from_raw(raw: &HashMap<String, Value>) -> Self {
        let mut scores = Self::new();
        for (key, value) in raw {
            match Aspect::parse(key) {
                Some(aspect) => {
                    scores.insert(aspect, score_from_value(value));
                }
                None => tracing::debug!("Ignoring unknown feature score key: {}", key),
            }
        }
        scores
    }
}

impl FromIterator<(Aspect, u32)> for FeatureScoreMap {
    fn from_iter<I: IntoIterator<Item = (Aspect, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for FeatureScoreMap {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<HashMap<String, Value>>::deserialize(deserializer)?;
        Ok(raw.map(|raw| Self::from_raw(&raw)).unwrap_or_default())
    }
}

impl Serialize for FeatureScoreMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (aspect, score) in self.present() {
            map.serialize_entry(&aspect, &score)?;
        }
        map.end()
    }
}

/// Inclusive month/day boundary, written as `[month, day]` in the datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    pub fn new(month: u32, day: u32) -> Self {
        Self { month, day }
    }

    /// `month * 100 + day`, saturating so out-of-range boundaries still
    /// compare instead of overflowing.
    pub fn encode(self) -> u32 {
        self.month.saturating_mul(100).saturating_add(self.day)
    }

    /// True when the pair names a day of a leap year.
    pub fn is_calendar_day(self) -> bool {
        NaiveDate::from_ymd_opt(2000, self.month, self.day).is_some()
    }
}

impl From<(u32, u32)> for MonthDay {
    fn from((month, day): (u32, u32)) -> Self {
        Self { month, day }
    }
}

impl From<MonthDay> for (u32, u32) {
    fn from(value: MonthDay) -> Self {
        (value.month, value.day)
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.day, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZodiacRecord {
    pub sign: String,
    pub start: MonthDay,
    pub end: MonthDay,
    #[serde(default, deserialize_with = "lenient_score")]
    pub score_work: u32,
    #[serde(default, deserialize_with = "lenient_score")]
    pub score_finance: u32,
    #[serde(default, deserialize_with = "lenient_score")]
    pub score_love: u32,
    #[serde(default, deserialize_with = "lenient_score")]
    pub score_health: u32,
    #[serde(default, deserialize_with = "lenient_score")]
    pub score_protection: u32,
    #[serde(default)]
    pub work: String,
    #[serde(default)]
    pub finance: String,
    #[serde(default)]
    pub love: String,
    #[serde(default)]
    pub health: String,
    #[serde(default)]
    pub protection: String,
}

impl ZodiacRecord {
    /// First word of the trimmed sign field, e.g. `"Capricorn (Makara)"` -> `"Capricorn"`.
    pub fn identifier(&self) -> &str {
        self.sign.split_whitespace().next().unwrap_or("")
    }

    pub fn score(&self, aspect: Aspect) -> u32 {
        match aspect {
            Aspect::Work => self.score_work,
            Aspect::Finance => self.score_finance,
            Aspect::Love => self.score_love,
            Aspect::Health => self.score_health,
            Aspect::Protection => self.score_protection,
        }
    }

    pub fn text(&self, aspect: Aspect) -> &str {
        match aspect {
            Aspect::Work => &self.work,
            Aspect::Finance => &self.finance,
            Aspect::Love => &self.love,
            Aspect::Health => &self.health,
            Aspect::Protection => &self.protection,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectBoosts {
    #[serde(default, deserialize_with = "lenient_score")]
    pub work: u32,
    #[serde(default, deserialize_with = "lenient_score")]
    pub finance: u32,
    #[serde(default, deserialize_with = "lenient_score")]
    pub love: u32,
    #[serde(default, deserialize_with = "lenient_score")]
    pub health: u32,
    #[serde(default, deserialize_with = "lenient_score")]
    pub protection: u32,
}

impl AspectBoosts {
    pub fn get(&self, aspect: Aspect) -> u32 {
        match aspect {
            Aspect::Work => self.work,
            Aspect::Finance => self.finance,
            Aspect::Love => self.love,
            Aspect::Health => self.health,
            Aspect::Protection => self.protection,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemedyRecord {
    pub name: String,
    #[serde(flatten)]
    pub boosts: AspectBoosts,
    #[serde(default)]
    pub image: String,
    #[serde(default, alias = "meaning")]
    pub description: String,
    #[serde(default, alias = "productLink")]
    pub product_link: String,
}

impl RemedyRecord {
    pub fn boost(&self, aspect: Aspect) -> u32 {
        self.boosts.get(aspect)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureMetadata {
    pub name: String,
    #[serde(default)]
    pub descriptions: HashMap<String, String>,
}

/// The three static datasets, already parsed.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub features: Vec<FeatureMetadata>,
    pub zodiac: Vec<ZodiacRecord>,
    pub remedies: Vec<RemedyRecord>,
}

/// Five per-aspect totals in [`Aspect::ALL`] order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FinalScoreVector([u32; 5]);

impl FinalScoreVector {
    pub fn new(values: [u32; 5]) -> Self {
        Self(values)
    }

    pub fn from_fn(mut f: impl FnMut(Aspect) -> u32) -> Self {
        Self(Aspect::ALL.map(|aspect| f(aspect)))
    }

    pub fn get(&self, aspect: Aspect) -> u32 {
        self.0[aspect.index()]
    }

    pub fn values(&self) -> &[u32; 5] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Aspect, u32)> + '_ {
        Aspect::ALL.into_iter().zip(self.0.iter().copied())
    }

    pub fn to_map(&self) -> BTreeMap<Aspect, u32> {
        self.iter().collect()
    }
}

impl From<[u32; 5]> for FinalScoreVector {
    fn from(values: [u32; 5]) -> Self {
        Self(values)
    }
}

impl Index<Aspect> for FinalScoreVector {
    type Output = u32;

    fn index(&self, aspect: Aspect) -> &u32 {
        &self.0[aspect.index()]
    }
}

impl Serialize for FinalScoreVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Aspect::ALL.len()))?;
        for (aspect, value) in self.iter() {
            map.serialize_entry(&aspect, &value)?;
        }
        map.end()
    }
}

/// Raw image bytes as produced by a camera stream or an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl Frame {
    pub fn jpeg(data: Vec<u8>) -> Self {
        Self {
            data,
            mime_type: "image/jpeg".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotSource {
    Camera,
    Upload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub frame: Frame,
    pub source: SnapshotSource,
    pub captured_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn from_frame(frame: Frame, source: SnapshotSource) -> Self {
        Self {
            frame,
            source,
            captured_at: Utc::now(),
        }
    }
}

/// A birth date as entered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthDate(NaiveDate);

impl BirthDate {
    /// Accepts `dd/mm/yyyy` or ISO `yyyy-mm-dd`.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        NaiveDate::parse_from_str(input, "%d/%m/%Y")
            .or_else(|_| NaiveDate::parse_from_str(input, "%Y-%m-%d"))
            .ok()
            .map(Self)
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

/// Description of one facial feature at the score it received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureDescription {
    pub aspect: Aspect,
    pub feature: String,
    pub score: u32,
    pub summary: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaceReading {
    pub scores: FeatureScoreMap,
    pub descriptions: Vec<FeatureDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub weakest: Aspect,
    pub remedy: Option<RemedyRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemedyPreview {
    pub remedy: RemedyRecord,
    pub before: FinalScoreVector,
    pub boosted: FinalScoreVector,
}

/// Body sent to the remedy text service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrativeRequest {
    pub score: BTreeMap<Aspect, u32>,
    pub zodiac: String,
    pub remedy: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reading {
    pub zodiac: String,
    pub birth_date: Option<BirthDate>,
    pub zodiac_scores: FinalScoreVector,
    pub face_scores: FinalScoreVector,
    pub final_scores: FinalScoreVector,
    pub recommendation: Recommendation,
    pub narrative: Option<String>,
}
