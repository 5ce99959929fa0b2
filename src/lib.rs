pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::camera::FileCamera;
pub use adapters::console::ConsoleRenderer;
pub use adapters::http::{HttpFaceAnalyzer, HttpRemedyNarrator};
pub use adapters::storage::{load_reference_data, LocalStorage};
pub use config::toml_config::AppConfig;
pub use core::{capture::CaptureStateMachine, engine::FortuneEngine};
pub use utils::error::{ReadingError, Result};
