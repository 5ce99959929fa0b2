use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadingError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("No birth date supplied")]
    MissingBirthDate,

    #[error("Camera unavailable: {reason}")]
    CameraDenied { reason: String },

    #[error("No snapshot captured")]
    NoSnapshot,

    #[error("Camera stream is closed")]
    StreamClosed,

    #[error("Cannot {operation} while capture is {state}")]
    InvalidTransition { operation: String, state: String },

    #[error("{service} failed: {message}")]
    CollaboratorError { service: String, message: String },

    #[error("Reference data error in {dataset}: {message}")]
    ReferenceDataError { dataset: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserInput,
    Lookup,
    Collaborator,
    Resource,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ReadingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReadingError::MissingBirthDate | ReadingError::CameraDenied { .. } => {
                ErrorCategory::UserInput
            }
            ReadingError::ApiError(_) | ReadingError::CollaboratorError { .. } => {
                ErrorCategory::Collaborator
            }
            ReadingError::NoSnapshot
            | ReadingError::StreamClosed
            | ReadingError::InvalidTransition { .. } => ErrorCategory::Resource,
            ReadingError::ConfigError { .. }
            | ReadingError::ConfigValidationError { .. }
            | ReadingError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ReadingError::ReferenceDataError { .. } => ErrorCategory::Lookup,
            ReadingError::IoError(_) | ReadingError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::UserInput | ErrorCategory::Collaborator => ErrorSeverity::Medium,
            ErrorCategory::Lookup | ErrorCategory::Resource | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ReadingError::MissingBirthDate => "Pass a birth date such as --birthdate 01/01/2000",
            ReadingError::CameraDenied { .. } => {
                "Grant camera access (or check the image path) and start the scan again"
            }
            ReadingError::NoSnapshot => "Capture or upload a face image before requesting a reading",
            ReadingError::InvalidTransition { .. } | ReadingError::StreamClosed => {
                "Clear the capture session and start over"
            }
            ReadingError::ApiError(_) | ReadingError::CollaboratorError { .. } => {
                "Check that the analysis service is running and reachable"
            }
            ReadingError::ReferenceDataError { .. } => {
                "Check the zodiac, remedy and feature metadata files"
            }
            ReadingError::ConfigError { .. }
            | ReadingError::ConfigValidationError { .. }
            | ReadingError::InvalidConfigValueError { .. } => "Fix the configuration file and retry",
            ReadingError::IoError(_) => "Check file paths and permissions",
            ReadingError::SerializationError(_) => "Check that the JSON input is well formed",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ReadingError::MissingBirthDate => "Please enter your birth date".to_string(),
            ReadingError::CameraDenied { reason } => format!("Could not open the camera: {}", reason),
            ReadingError::NoSnapshot => "No face image found".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReadingError>;
