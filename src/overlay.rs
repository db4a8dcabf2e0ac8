//! Per-frame visual overlay hook.

use crate::{camera::VideoFrame, landmarks::FrameDetection, monitor::MonitorSnapshot};
use log::debug;

/// Receives every processed frame for drawing
pub trait FrameOverlay: Send {
    fn draw(&mut self, frame: &VideoFrame, detections: &[FrameDetection], snapshot: &MonitorSnapshot);
}

/// Overlay that draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOverlay;

impl FrameOverlay for NoOverlay {
    fn draw(&mut self, _frame: &VideoFrame, _detections: &[FrameDetection], _snapshot: &MonitorSnapshot) {}
}

/// Debug-logs the eye outline of the first face every `every` frames
#[derive(Debug, Clone)]
pub struct LogOverlay {
    every: u64,
}

impl LogOverlay {
    #[must_use]
    pub fn new(every: u64) -> Self {
        Self { every: every.max(1) }
    }
}

impl FrameOverlay for LogOverlay {
    fn draw(&mut self, frame: &VideoFrame, detections: &[FrameDetection], snapshot: &MonitorSnapshot) {
        if frame.sequence % self.every != 0 {
            return;
        }
        match detections.first() {
            Some(face) => {
                let outline: Vec<(f32, f32)> = face.eye_outline().map(|p| (p.x, p.y)).collect();
                let gaps = snapshot
                    .eye_gaps
                    .map(|g| format!("{:.1}/{:.1}px", g.right, g.left))
                    .unwrap_or_else(|| "-".to_string());
                debug!(
                    "frame {} eyes {} ({}s, gaps {}) outline {:?}",
                    frame.sequence,
                    if snapshot.eyes_closed { "closed" } else { "open" },
                    snapshot.closed_seconds,
                    gaps,
                    outline
                );
            }
            None => debug!("frame {} no face", frame.sequence),
        }
    }
}
