use crate::domain::model::Snapshot;

/// Holds zero or one image. Setting a new image drops the previous one.
#[derive(Debug)]
pub struct SnapshotStore<T = Snapshot> {
    current: Option<T>,
}

impl<T> SnapshotStore<T> {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn set(&mut self, image: T) -> &T {
        if self.current.take().is_some() {
            tracing::debug!("Replaced previous snapshot");
        }
        self.current.insert(image)
    }

    pub fn clear(&mut self) {
        if self.current.take().is_some() {
            tracing::debug!("Snapshot released");
        }
    }

    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}

impl<T> Default for SnapshotStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
