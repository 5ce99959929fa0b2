use anyhow::Result;
use horo_scan::config::toml_config::DataConfig;
use horo_scan::core::recommend::{apply_boost, recommend};
use horo_scan::core::zodiac::uncovered_days;
use horo_scan::domain::model::{
    Aspect, AspectBoosts, FaceReading, FinalScoreVector, Frame, MonthDay, Recommendation,
    ReferenceData, RemedyPreview, RemedyRecord, Snapshot, SnapshotSource, ZodiacRecord,
};
use horo_scan::domain::ports::ReadingRenderer;
use horo_scan::utils::validation::Validate;
use horo_scan::{
    load_reference_data, CaptureStateMachine, FileCamera, FortuneEngine, HttpFaceAnalyzer,
    HttpRemedyNarrator, LocalStorage, ReadingError,
};
use httpmock::prelude::*;

#[derive(Default)]
struct CollectingRenderer {
    zodiac: Option<String>,
    face_lines: usize,
    scores: Option<FinalScoreVector>,
    remedy: Option<String>,
    narrative: Option<String>,
    preview: Option<FinalScoreVector>,
}

impl ReadingRenderer for CollectingRenderer {
    fn render_face(&mut self, face: &FaceReading) {
        self.face_lines = face.descriptions.len();
    }
    fn render_zodiac(&mut self, sign: &str, _record: Option<&ZodiacRecord>) {
        self.zodiac = Some(sign.to_string());
    }
    fn render_scores(&mut self, scores: &FinalScoreVector) {
        self.scores = Some(*scores);
    }
    fn render_recommendation(&mut self, recommendation: &Recommendation) {
        self.remedy = recommendation.remedy.as_ref().map(|r| r.name.clone());
    }
    fn render_narrative(&mut self, text: &str) {
        self.narrative = Some(text.to_string());
    }
    fn render_preview(&mut self, preview: &RemedyPreview) {
        self.preview = Some(preview.boosted);
    }
}

async fn sample_reference() -> ReferenceData {
    let storage = LocalStorage::new(format!("{}/data", env!("CARGO_MANIFEST_DIR")));
    let data = DataConfig {
        base_path: "data".to_string(),
        face_metrics: "face_metrics.json".to_string(),
        zodiac_table: "zodiac.json".to_string(),
        remedy_table: "remedies.json".to_string(),
    };
    load_reference_data(&storage, &data).await.unwrap()
}

fn uploaded() -> Snapshot {
    Snapshot::from_frame(Frame::jpeg(b"uploaded-face".to_vec()), SnapshotSource::Upload)
}

fn remedy(name: &str, boosts: AspectBoosts) -> RemedyRecord {
    RemedyRecord {
        name: name.to_string(),
        boosts,
        image: String::new(),
        description: String::new(),
        product_link: String::new(),
    }
}

#[tokio::test]
async fn test_sample_data_is_complete() -> Result<()> {
    let reference = sample_reference().await;

    reference.validate()?;
    assert!(uncovered_days(&reference.zodiac).is_empty());
    assert_eq!(reference.features.len(), 5);
    assert_eq!(reference.remedies.len(), 5);
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_reading_with_face_scores() {
    let server = MockServer::start();
    let predict = server.mock(|when, then| {
        when.method(POST).path("/predict").body_contains("name=\"image\"");
        then.status(200).json_body(serde_json::json!({
            "featureScores": {"work": 3, "finance": 1, "love": 2, "health": 2, "protection": 2}
        }));
    });
    // Sagittarius [6,7,6,7,7] plus face [3,1,2,2,2]
    let narrate = server.mock(|when, then| {
        when.method(POST).path("/generate_horoscope").json_body(serde_json::json!({
            "score": {"work": 9, "finance": 8, "love": 8, "health": 9, "protection": 9},
            "zodiac": "Sagittarius",
            "remedy": "Lakshmi"
        }));
        then.status(200)
            .json_body(serde_json::json!({"result": {"parts": [{"text": "Wealth follows patience"}]}}));
    });

    let engine = FortuneEngine::new(
        sample_reference().await,
        HttpFaceAnalyzer::new(server.url("/predict")),
        HttpRemedyNarrator::new(server.url("/generate_horoscope")),
    );
    let mut renderer = CollectingRenderer::default();

    let mut capture = CaptureStateMachine::new(FileCamera::new("unused.jpg"), Default::default());
    capture.upload(Frame::jpeg(b"uploaded-face".to_vec()));

    let face = engine
        .analyze(capture.snapshot(), &mut renderer)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(face.scores.score(Aspect::Work), 3);
    assert_eq!(renderer.face_lines, 5);

    let reading = engine
        .read(capture.snapshot(), Some(&face), Some("01/01/2000"), &mut renderer)
        .await
        .unwrap();

    predict.assert();
    narrate.assert();
    assert_eq!(reading.zodiac, "Sagittarius");
    assert_eq!(reading.final_scores.values(), &[9, 8, 8, 9, 9]);
    assert_eq!(reading.recommendation.weakest, Aspect::Finance);
    assert_eq!(renderer.remedy.as_deref(), Some("Lakshmi"));
    assert_eq!(reading.narrative.as_deref(), Some("Wealth follows patience"));
    assert_eq!(renderer.narrative.as_deref(), Some("Wealth follows patience"));

    let preview = engine.preview(&reading, "Lakshmi", &mut renderer).unwrap();
    assert_eq!(preview.boosted.values(), &[10, 13, 9, 9, 10]);
    assert_eq!(renderer.preview, Some(preview.boosted));
    assert!(engine.preview(&reading, "Nobody", &mut renderer).is_none());
}

#[tokio::test]
async fn test_failed_analysis_reads_zodiac_only() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/predict");
        then.status(400).json_body(serde_json::json!({"error": "no face found"}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/generate_horoscope");
        then.status(500).json_body(serde_json::json!({"error": "quota exceeded"}));
    });

    let engine = FortuneEngine::new(
        sample_reference().await,
        HttpFaceAnalyzer::new(server.url("/predict")),
        HttpRemedyNarrator::new(server.url("/generate_horoscope")),
    );
    let mut renderer = CollectingRenderer::default();

    let mut capture = CaptureStateMachine::new(FileCamera::new("unused.jpg"), Default::default());
    capture.upload(Frame::jpeg(b"blurry".to_vec()));

    let face = engine.analyze(capture.snapshot(), &mut renderer).await.unwrap();
    assert!(face.is_none());
    assert_eq!(renderer.face_lines, 0);

    let reading = engine
        .read(capture.snapshot(), face.as_ref(), Some("2000-08-20"), &mut renderer)
        .await
        .unwrap();

    assert_eq!(reading.zodiac, "Leo");
    assert_eq!(reading.final_scores, reading.zodiac_scores);
    assert_eq!(reading.face_scores.values(), &[0, 0, 0, 0, 0]);
    assert!(reading.narrative.is_none());
    assert!(renderer.narrative.is_none());
}

#[tokio::test]
async fn test_birth_date_input_errors() {
    let server = MockServer::start();
    let narrate = server.mock(|when, then| {
        when.method(POST)
            .path("/generate_horoscope")
            .body_contains("\"zodiac\":\"Unknown\"");
        then.status(200).json_body(serde_json::json!({"result": "The stars are silent"}));
    });

    let engine = FortuneEngine::new(
        sample_reference().await,
        HttpFaceAnalyzer::new(server.url("/predict")),
        HttpRemedyNarrator::new(server.url("/generate_horoscope")),
    );
    let mut renderer = CollectingRenderer::default();

    let snapshot = uploaded();
    let err = engine
        .read(Some(&snapshot), None, Some("  "), &mut renderer)
        .await
        .unwrap_err();
    assert!(matches!(err, ReadingError::MissingBirthDate));
    assert!(renderer.zodiac.is_none());

    let reading = engine
        .read(Some(&snapshot), None, Some("31/02/2000"), &mut renderer)
        .await
        .unwrap();
    narrate.assert();
    assert_eq!(reading.zodiac, "Unknown");
    assert_eq!(reading.final_scores.values(), &[0, 0, 0, 0, 0]);
    assert_eq!(reading.recommendation.weakest, Aspect::Work);
}

#[tokio::test]
async fn test_zodiac_only_health_score() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/generate_horoscope");
        then.status(200).json_body(serde_json::json!({"result": "ok"}));
    });

    let record: ZodiacRecord = serde_json::from_value(serde_json::json!({
        "sign": "Everyday", "start": [1, 1], "end": [12, 31], "score_health": 5
    }))
    .unwrap();
    assert_eq!(record.start, MonthDay::new(1, 1));

    let reference = ReferenceData {
        features: Vec::new(),
        zodiac: vec![record],
        remedies: Vec::new(),
    };
    let engine = FortuneEngine::new(
        reference,
        HttpFaceAnalyzer::new(server.url("/predict")),
        HttpRemedyNarrator::new(server.url("/generate_horoscope")),
    );
    let mut renderer = CollectingRenderer::default();

    let reading = engine
        .read(Some(&uploaded()), None, Some("15/06/1990"), &mut renderer)
        .await
        .unwrap();

    assert_eq!(reading.final_scores.values(), &[0, 0, 0, 5, 0]);
    assert_eq!(renderer.scores, Some(reading.final_scores));
    assert!(reading.recommendation.remedy.is_none());
}

#[tokio::test]
async fn test_reading_without_snapshot_is_refused() {
    let server = MockServer::start();
    let narrate = server.mock(|when, then| {
        when.method(POST).path("/generate_horoscope");
        then.status(200).json_body(serde_json::json!({"result": "ok"}));
    });

    let engine = FortuneEngine::new(
        sample_reference().await,
        HttpFaceAnalyzer::new(server.url("/predict")),
        HttpRemedyNarrator::new(server.url("/generate_horoscope")),
    );
    let mut renderer = CollectingRenderer::default();

    let mut capture = CaptureStateMachine::new(FileCamera::new("unused.jpg"), Default::default());
    capture.upload(Frame::jpeg(b"face".to_vec()));
    capture.clear();

    let err = engine
        .read(capture.snapshot(), None, Some("01/01/2000"), &mut renderer)
        .await
        .unwrap_err();

    assert!(matches!(err, ReadingError::NoSnapshot));
    assert!(renderer.zodiac.is_none());
    assert!(renderer.scores.is_none());
    assert!(renderer.remedy.is_none());
    narrate.assert_hits(0);
}

#[test]
fn test_weakest_finance_picks_first_max_boost() {
    let scores = FinalScoreVector::new([10, 3, 8, 6, 9]);
    let remedies = vec![
        remedy("Ganesha", AspectBoosts { work: 5, finance: 2, ..Default::default() }),
        remedy("Lakshmi", AspectBoosts { finance: 4, ..Default::default() }),
        remedy("Kuber", AspectBoosts { finance: 4, protection: 1, ..Default::default() }),
    ];

    let recommendation = recommend(&scores, &remedies);
    assert_eq!(recommendation.weakest, Aspect::Finance);
    assert_eq!(recommendation.weakest.index(), 1);
    assert_eq!(recommendation.remedy.unwrap().name, "Lakshmi");
}

#[test]
fn test_apply_boost_returns_new_vector() {
    let scores = FinalScoreVector::new([10, 3, 8, 6, 9]);
    let lakshmi = remedy("Lakshmi", AspectBoosts { finance: 4, ..Default::default() });

    let boosted = apply_boost(&scores, &lakshmi);
    assert_eq!(boosted.values(), &[10, 7, 8, 6, 9]);
    assert_eq!(scores.values(), &[10, 3, 8, 6, 9]);
}
