use crate::core::capture::CaptureSettings;
use crate::utils::error::{ReadingError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub service: ServiceConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    pub data: DataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub analysis_endpoint: String,
    pub narrative_endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    #[serde(default = "default_scan_delay_seconds")]
    pub scan_delay_seconds: u64,
    #[serde(default = "default_frame_interval_millis")]
    pub frame_interval_millis: u64,
}

fn default_scan_delay_seconds() -> u64 {
    7
}

fn default_frame_interval_millis() -> u64 {
    33
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            scan_delay_seconds: default_scan_delay_seconds(),
            frame_interval_millis: default_frame_interval_millis(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_base_path")]
    pub base_path: String,
    pub face_metrics: String,
    pub zodiac_table: String,
    pub remedy_table: String,
}

fn default_base_path() -> String {
    ".".to_string()
}

impl AppConfig {
    /// Loads and parses a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReadingError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ReadingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ReadingError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("service.analysis_endpoint", &self.service.analysis_endpoint)?;
        validation::validate_url("service.narrative_endpoint", &self.service.narrative_endpoint)?;

        validation::validate_range(
            "capture.scan_delay_seconds",
            self.capture.scan_delay_seconds,
            0,
            600,
        )?;
        validation::validate_positive_number(
            "capture.frame_interval_millis",
            self.capture.frame_interval_millis,
            1,
        )?;

        validation::validate_path("data.base_path", &self.data.base_path)?;
        validation::validate_path("data.face_metrics", &self.data.face_metrics)?;
        validation::validate_path("data.zodiac_table", &self.data.zodiac_table)?;
        validation::validate_path("data.remedy_table", &self.data.remedy_table)?;

        Ok(())
    }

    pub fn capture_settings(&self) -> CaptureSettings {
        CaptureSettings {
            scan_delay: Duration::from_secs(self.capture.scan_delay_seconds),
            frame_interval: Duration::from_millis(self.capture.frame_interval_millis),
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
