use crate::config::toml_config::DataConfig;
use crate::core::Storage;
use crate::domain::model::{FeatureMetadata, ReferenceData, RemedyRecord, ZodiacRecord};
use crate::utils::error::{ReadingError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

/// Feature metadata is either a bare list or wrapped as `{ "features": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum FeatureMetadataDocument {
    Wrapped { features: Vec<FeatureMetadata> },
    Bare(Vec<FeatureMetadata>),
}

async fn read_json<S: Storage, T: DeserializeOwned>(
    storage: &S,
    dataset: &str,
    path: &str,
) -> Result<T> {
    let bytes = storage.read_file(path).await?;
    serde_json::from_slice(&bytes).map_err(|e| ReadingError::ReferenceDataError {
        dataset: dataset.to_string(),
        message: format!("{}: {}", path, e),
    })
}

pub async fn load_reference_data<S: Storage>(
    storage: &S,
    data: &DataConfig,
) -> Result<ReferenceData> {
    let document: FeatureMetadataDocument =
        read_json(storage, "feature metadata", &data.face_metrics).await?;
    let features = match document {
        FeatureMetadataDocument::Wrapped { features } => features,
        FeatureMetadataDocument::Bare(features) => features,
    };
    let zodiac: Vec<ZodiacRecord> = read_json(storage, "zodiac table", &data.zodiac_table).await?;
    let remedies: Vec<RemedyRecord> = read_json(storage, "remedy table", &data.remedy_table).await?;

    tracing::info!(
        "📚 Loaded {} feature(s), {} zodiac record(s), {} remed(ies)",
        features.len(),
        zodiac.len(),
        remedies.len()
    );

    Ok(ReferenceData {
        features,
        zodiac,
        remedies,
    })
}
