//! Camera seam: scoped live frame streams.
//!
//! Opening a stream is the permission boundary. A stream holds live tracks
//! until [`CameraStream::stop`] is called; [`StreamGuard`] makes sure that also
//! happens when the owning task is torn down mid-flight.

use crate::{Error, Result};
use async_trait::async_trait;
use log::{debug, info};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Instant;

/// One captured video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Monotonic frame number within the stream
    pub sequence: u64,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Capture instant
    pub captured_at: Instant,
    /// Packed RGB pixels, shared to keep per-frame clones cheap
    pub pixels: Arc<[u8]>,
}

impl VideoFrame {
    /// Black RGB frame of the given size
    #[must_use]
    pub fn blank(sequence: u64, width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * 3;
        Self {
            sequence,
            width,
            height,
            captured_at: Instant::now(),
            pixels: vec![0u8; len].into(),
        }
    }
}

/// Host camera able to open live streams
#[async_trait]
pub trait Camera: Send {
    /// Acquire a live stream at the requested resolution.
    ///
    /// Fails with [`Error::CameraPermission`] when access is refused.
    async fn open(&mut self, width: u32, height: u32) -> Result<Box<dyn CameraStream>>;
}

/// Live stream of video frames
#[async_trait]
pub trait CameraStream: Send {
    /// Wait for the next frame
    async fn next_frame(&mut self) -> Result<VideoFrame>;

    /// Stop every track of the stream. Idempotent.
    fn stop(&mut self);

    /// Whether any track is still live
    fn is_live(&self) -> bool;
}

/// Owns a stream and stops its tracks on drop
pub struct StreamGuard {
    stream: Box<dyn CameraStream>,
}

impl StreamGuard {
    #[must_use]
    pub fn new(stream: Box<dyn CameraStream>) -> Self {
        Self { stream }
    }

    /// Read the next frame from the guarded stream
    ///
    /// # Errors
    ///
    /// Propagates the stream's read error
    pub async fn next_frame(&mut self) -> Result<VideoFrame> {
        self.stream.next_frame().await
    }

    /// Stop the tracks now rather than at drop
    pub fn release(&mut self) {
        if self.stream.is_live() {
            info!("Releasing camera stream");
            self.stream.stop();
        }
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.release();
    }
}

/// Camera producing blank frames, for headless runs and tests.
///
/// Clones share a live-track counter, so a test can keep one clone and
/// observe whether the monitor released the stream it opened.
#[derive(Debug, Clone, Default)]
pub struct SyntheticCamera {
    deny_permission: bool,
    live_tracks: Arc<AtomicUsize>,
}

impl SyntheticCamera {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `open` fail as if the user refused camera access
    #[must_use]
    pub fn denying_permission(mut self) -> Self {
        self.deny_permission = true;
        self
    }

    /// Number of tracks currently live across all streams of this camera
    #[must_use]
    pub fn live_tracks(&self) -> usize {
        self.live_tracks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Camera for SyntheticCamera {
    async fn open(&mut self, width: u32, height: u32) -> Result<Box<dyn CameraStream>> {
        if self.deny_permission {
            return Err(Error::CameraPermission("access to the camera was refused".to_string()));
        }
        if width == 0 || height == 0 {
            return Err(Error::Camera(format!("Unsupported resolution {width}x{height}")));
        }
        self.live_tracks.fetch_add(1, Ordering::SeqCst);
        debug!("Synthetic camera opened at {}x{}", width, height);
        Ok(Box::new(SyntheticStream {
            width,
            height,
            sequence: 0,
            pixels: vec![0u8; width as usize * height as usize * 3].into(),
            live: true,
            live_tracks: Arc::clone(&self.live_tracks),
        }))
    }
}

struct SyntheticStream {
    width: u32,
    height: u32,
    sequence: u64,
    pixels: Arc<[u8]>,
    live: bool,
    live_tracks: Arc<AtomicUsize>,
}

#[async_trait]
impl CameraStream for SyntheticStream {
    async fn next_frame(&mut self) -> Result<VideoFrame> {
        if !self.live {
            return Err(Error::Camera("stream already stopped".to_string()));
        }
        let frame = VideoFrame {
            sequence: self.sequence,
            width: self.width,
            height: self.height,
            captured_at: Instant::now(),
            pixels: Arc::clone(&self.pixels),
        };
        self.sequence += 1;
        Ok(frame)
    }

    fn stop(&mut self) {
        if self.live {
            self.live = false;
            self.live_tracks.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn is_live(&self) -> bool {
        self.live
    }
}
