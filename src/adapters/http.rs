use crate::domain::model::{FeatureScoreMap, NarrativeRequest, Snapshot};
use crate::domain::ports::{FaceAnalyzer, RemedyNarrator};
use crate::utils::error::{ReadingError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;

pub const NO_NARRATIVE: &str = "No reading from the oracle";

#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    #[serde(rename = "featureScores", default)]
    feature_scores: FeatureScoreMap,
}

/// Turns a non-2xx response into a collaborator error, preferring the
/// service's own `{"error": ...}` message when there is one.
async fn check_status(service: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|json| json.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(body);

    Err(ReadingError::CollaboratorError {
        service: service.to_string(),
        message: format!("HTTP {}: {}", status, message),
    })
}

/// Posts the snapshot as multipart field `image` and reads back
/// `{"featureScores": {...}}`.
#[derive(Debug, Clone)]
pub struct HttpFaceAnalyzer {
    client: Client,
    endpoint: String,
}

impl HttpFaceAnalyzer {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl FaceAnalyzer for HttpFaceAnalyzer {
    async fn analyze(&self, snapshot: &Snapshot) -> Result<FeatureScoreMap> {
        let part = Part::bytes(snapshot.frame.data.clone())
            .file_name("face.jpg")
            .mime_str(&snapshot.frame.mime_type)?;
        let form = Form::new().part("image", part);

        tracing::debug!("Making analysis request to: {}", self.endpoint);
        let response = self.client.post(&self.endpoint).multipart(form).send().await?;
        tracing::debug!("Analysis response status: {}", response.status());

        let response = check_status("face analysis", response).await?;
        let body: AnalysisResponse = response.json().await?;
        Ok(body.feature_scores)
    }
}

/// Posts `{score, zodiac, remedy}` and returns the generated text. No timeout
/// and no retry.
#[derive(Debug, Clone)]
pub struct HttpRemedyNarrator {
    client: Client,
    endpoint: String,
}

impl HttpRemedyNarrator {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }
}

/// `result` is either plain text or a `{ "parts": [{ "text": ... }] }` block.
fn extract_narrative(body: &Value) -> Option<String> {
    let result = body.get("result")?;
    if let Some(text) = result.as_str() {
        return Some(text.to_string());
    }

    result
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
        .map(str::to_string)
}

#[async_trait]
impl RemedyNarrator for HttpRemedyNarrator {
    async fn narrate(&self, request: &NarrativeRequest) -> Result<String> {
        tracing::debug!("Making narrative request to: {}", self.endpoint);
        let response = self.client.post(&self.endpoint).json(request).send().await?;

        let response = check_status("remedy narrative", response).await?;
        let body: Value = response.json().await?;
        Ok(extract_narrative(&body).unwrap_or_else(|| NO_NARRATIVE.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Aspect, Frame, SnapshotSource};
    use httpmock::prelude::*;

    fn snapshot() -> Snapshot {
        Snapshot::from_frame(Frame::jpeg(b"jpeg-bytes".to_vec()), SnapshotSource::Camera)
    }

    #[test]
    fn test_extract_narrative_shapes() {
        let plain = serde_json::json!({"result": "Fortune favours you"});
        assert_eq!(extract_narrative(&plain).unwrap(), "Fortune favours you");

        let parts = serde_json::json!({"result": {"parts": [{"text": "Honour Lakshmi"}], "role": "model"}});
        assert_eq!(extract_narrative(&parts).unwrap(), "Honour Lakshmi");

        let empty = serde_json::json!({"result": {"parts": []}});
        assert!(extract_narrative(&empty).is_none());
    }

    #[tokio::test]
    async fn test_analyzer_posts_multipart_image() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/predict")
                .header_exists("content-type")
                .body_contains("name=\"image\"")
                .body_contains("filename=\"face.jpg\"");
            then.status(200)
                .json_body(serde_json::json!({"featureScores": {"work": 6, "finance": 2}}));
        });

        let analyzer = HttpFaceAnalyzer::new(server.url("/predict"));
        let scores = analyzer.analyze(&snapshot()).await.unwrap();

        mock.assert();
        assert_eq!(scores.get(Aspect::Work), Some(6));
        assert_eq!(scores.get(Aspect::Finance), Some(2));
        assert_eq!(scores.get(Aspect::Love), None);
    }

    #[tokio::test]
    async fn test_analyzer_surfaces_service_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/predict");
            then.status(400).json_body(serde_json::json!({"error": "no face found"}));
        });

        let analyzer = HttpFaceAnalyzer::new(server.url("/predict"));
        let err = analyzer.analyze(&snapshot()).await.unwrap_err();
        match err {
            ReadingError::CollaboratorError { service, message } => {
                assert_eq!(service, "face analysis");
                assert!(message.contains("no face found"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_narrator_sends_scores_zodiac_and_remedy() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/generate_horoscope")
                .json_body(serde_json::json!({
                    "score": {"work": 10, "finance": 3, "love": 8, "health": 6, "protection": 9},
                    "zodiac": "Leo",
                    "remedy": "Lakshmi"
                }));
            then.status(200)
                .json_body(serde_json::json!({"result": {"parts": [{"text": "A bright year"}]}}));
        });

        let narrator = HttpRemedyNarrator::new(server.url("/generate_horoscope"));
        let request = NarrativeRequest {
            score: crate::domain::model::FinalScoreVector::new([10, 3, 8, 6, 9]).to_map(),
            zodiac: "Leo".to_string(),
            remedy: "Lakshmi".to_string(),
        };

        let text = narrator.narrate(&request).await.unwrap();
        mock.assert();
        assert_eq!(text, "A bright year");
    }

    #[tokio::test]
    async fn test_narrator_without_text_uses_placeholder() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/generate_horoscope");
            then.status(200).json_body(serde_json::json!({"result": {}}));
        });

        let narrator = HttpRemedyNarrator::new(server.url("/generate_horoscope"));
        let request = NarrativeRequest {
            score: Default::default(),
            zodiac: "Unknown".to_string(),
            remedy: String::new(),
        };

        assert_eq!(narrator.narrate(&request).await.unwrap(), NO_NARRATIVE);
        mock.assert_hits(1);
    }
}
