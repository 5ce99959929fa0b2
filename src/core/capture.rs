//! Camera capture lifecycle: request access, stream for a fixed scan window,
//! take one snapshot, stop the camera.
//!
//! ```text
//! Idle ──start──> Requesting ──granted──> Streaming ──delay──> Captured
//!   ^                 │ denied                                    │
//!   └─────────────────┘<──────────────── clear ───────────────────┘
//! ```
//!
//! Every transition takes `&mut self`, so two scans can never be in flight
//! at once. Calling [`CaptureStateMachine::start`] while a stream is open
//! stops that stream before a new one is requested.

use crate::core::snapshot::SnapshotStore;
use crate::domain::model::{Frame, Snapshot, SnapshotSource};
use crate::domain::ports::{Camera, FrameObserver, MediaStream, NoopObserver};
use crate::utils::error::{ReadingError, Result};
use std::fmt;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

pub const DEFAULT_SCAN_DELAY: Duration = Duration::from_secs(7);
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(33);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Requesting,
    Streaming,
    Captured,
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CaptureState::Idle => "idle",
            CaptureState::Requesting => "requesting",
            CaptureState::Streaming => "streaming",
            CaptureState::Captured => "captured",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSettings {
    /// Measured from entering `Streaming` to taking the snapshot.
    pub scan_delay: Duration,
    /// Cadence at which live frames reach the observer.
    pub frame_interval: Duration,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            scan_delay: DEFAULT_SCAN_DELAY,
            frame_interval: DEFAULT_FRAME_INTERVAL,
        }
    }
}

pub struct CaptureStateMachine<C: Camera, O: FrameObserver = NoopObserver> {
    camera: C,
    observer: O,
    settings: CaptureSettings,
    state: CaptureState,
    scanning: bool,
    stream: Option<C::Stream>,
    streaming_since: Option<Instant>,
    snapshots: SnapshotStore,
}

impl<C: Camera> CaptureStateMachine<C, NoopObserver> {
    pub fn new(camera: C, settings: CaptureSettings) -> Self {
        Self::with_observer(camera, NoopObserver, settings)
    }
}

impl<C: Camera, O: FrameObserver> CaptureStateMachine<C, O> {
    pub fn with_observer(camera: C, observer: O, settings: CaptureSettings) -> Self {
        Self {
            camera,
            observer,
            settings,
            state: CaptureState::Idle,
            scanning: false,
            stream: None,
            streaming_since: None,
            snapshots: SnapshotStore::new(),
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning
    }

    pub fn has_stream(&self) -> bool {
        self.stream.is_some()
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshots.current()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Requests the camera and starts streaming. Any open stream is stopped
    /// first and any snapshot is discarded. On denial the machine is left
    /// `Idle` and the camera is not retried.
    pub async fn start(&mut self) -> Result<()> {
        if self.stop_stream() {
            debug!("Stopped the previous stream before starting a new scan");
        }
        self.snapshots.clear();
        self.scanning = false;
        self.streaming_since = None;
        self.state = CaptureState::Requesting;
        debug!("Requesting camera access");

        let stream = match self.camera.open().await {
            Ok(stream) => stream,
            Err(e) => {
                self.state = CaptureState::Idle;
                warn!("Camera access failed: {}", e);
                return Err(match e {
                    ReadingError::CameraDenied { .. } => e,
                    other => ReadingError::CameraDenied {
                        reason: other.to_string(),
                    },
                });
            }
        };

        self.state = CaptureState::Streaming;
        self.scanning = true;
        self.streaming_since = Some(Instant::now());
        info!("📷 Scan started, capturing in {:?}", self.settings.scan_delay);

        self.stream.insert(stream).ready().await;
        debug!("Camera stream ready");
        Ok(())
    }

    /// Waits out the scan window, feeding live frames to the observer, then
    /// captures exactly one frame and stops the camera.
    pub async fn finish_scan(&mut self) -> Result<&Snapshot> {
        if self.state != CaptureState::Streaming {
            return Err(ReadingError::InvalidTransition {
                operation: "capture a snapshot".to_string(),
                state: self.state.to_string(),
            });
        }

        let deadline = self.streaming_since.unwrap_or_else(Instant::now) + self.settings.scan_delay;
        let sleep = tokio::time::sleep_until(deadline);
        tokio::pin!(sleep);

        let mut ticker = tokio::time::interval(self.settings.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = &mut sleep => break,
                _ = ticker.tick() => self.deliver_frame(),
            }
        }

        let frame = self
            .stream
            .as_mut()
            .ok_or(ReadingError::StreamClosed)?
            .grab_frame()?;

        self.stop_stream();
        self.scanning = false;
        self.streaming_since = None;
        self.state = CaptureState::Captured;
        info!("📸 Snapshot captured");

        Ok(self
            .snapshots
            .set(Snapshot::from_frame(frame, SnapshotSource::Camera)))
    }

    /// `start` followed by `finish_scan`.
    pub async fn scan(&mut self) -> Result<&Snapshot> {
        self.start().await?;
        self.finish_scan().await
    }

    /// Discards the current snapshot and starts a new scan.
    pub async fn reset_scan(&mut self) -> Result<()> {
        if self.state != CaptureState::Captured {
            return Err(ReadingError::InvalidTransition {
                operation: "reset the scan".to_string(),
                state: self.state.to_string(),
            });
        }

        self.snapshots.clear();
        self.start().await
    }

    /// Uses an image supplied directly instead of the camera.
    pub fn upload(&mut self, frame: Frame) -> &Snapshot {
        self.stop_stream();
        self.scanning = false;
        self.streaming_since = None;
        self.state = CaptureState::Captured;
        info!("📁 Image uploaded");

        self.snapshots
            .set(Snapshot::from_frame(frame, SnapshotSource::Upload))
    }

    /// Tears down the camera and the snapshot. Valid from any state.
    pub fn clear(&mut self) {
        self.stop_stream();
        self.snapshots.clear();
        self.scanning = false;
        self.streaming_since = None;
        self.state = CaptureState::Idle;
        debug!("Capture session cleared");
    }

    fn deliver_frame(&mut self) {
        if !self.scanning {
            return;
        }
        let Some(stream) = self.stream.as_mut() else {
            return;
        };
        if !stream.is_live() {
            return;
        }

        match stream.grab_frame() {
            Ok(frame) => self.observer.on_frame(&frame),
            Err(e) => debug!("Skipping live frame: {}", e),
        }
    }

    fn stop_stream(&mut self) -> bool {
        match self.stream.take() {
            Some(mut stream) => {
                stream.stop();
                debug!("Camera stream stopped");
                true
            }
            None => false,
        }
    }
}

impl<C: Camera, O: FrameObserver> Drop for CaptureStateMachine<C, O> {
    fn drop(&mut self) {
        self.stop_stream();
    }
}
