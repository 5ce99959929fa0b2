use crate::domain::model::Frame;
use crate::domain::ports::{Camera, MediaStream};
use crate::utils::error::{ReadingError, Result};
use std::path::{Path, PathBuf};

/// Camera backed by a still image on disk. Opening the camera reads the file;
/// an unreadable file is reported the same way a refused permission is.
#[derive(Debug, Clone)]
pub struct FileCamera {
    path: PathBuf,
}

impl FileCamera {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

fn mime_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        _ => "image/jpeg",
    }
}

impl Camera for FileCamera {
    type Stream = FileStream;

    async fn open(&mut self) -> Result<FileStream> {
        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|e| ReadingError::CameraDenied {
                reason: format!("{}: {}", self.path.display(), e),
            })?;

        tracing::debug!("📷 Opened image source {}", self.path.display());
        Ok(FileStream {
            frame: Frame {
                data,
                mime_type: mime_type_for(&self.path).to_string(),
            },
            live: true,
        })
    }
}

/// Stream that yields the same frame until stopped.
#[derive(Debug)]
pub struct FileStream {
    frame: Frame,
    live: bool,
}

impl MediaStream for FileStream {
    async fn ready(&mut self) {}

    fn grab_frame(&mut self) -> Result<Frame> {
        if !self.live {
            return Err(ReadingError::StreamClosed);
        }
        Ok(self.frame.clone())
    }

    fn stop(&mut self) {
        self.live = false;
    }

    fn is_live(&self) -> bool {
        self.live
    }
}
