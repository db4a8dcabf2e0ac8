//! Facial landmark types and the landmark source seam.
//!
//! The face-landmark model is an external collaborator: anything that can turn a
//! [`VideoFrame`] into zero or more [`FrameDetection`]s implements
//! [`LandmarkSource`]. How the model is fetched or initialised is the caller's
//! business; the monitor only ever holds an already-loaded source.

use crate::{camera::VideoFrame, Error, Result};
use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 2-D landmark point in capture-resolution pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "PointRepr")]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Accepted on-disk point shapes: `{"x":..,"y":..}`, `[x, y]` or `[x, y, z]`
#[derive(Deserialize)]
#[serde(untagged)]
enum PointRepr {
    Named { x: f32, y: f32 },
    Pair([f32; 2]),
    Triple([f32; 3]),
}

impl From<PointRepr> for Point {
    fn from(repr: PointRepr) -> Self {
        match repr {
            PointRepr::Named { x, y } | PointRepr::Pair([x, y]) | PointRepr::Triple([x, y, _]) => {
                Self { x, y }
            }
        }
    }
}

/// One face's eyelid contours for a single frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameDetection {
    /// Upper eyelid contour of the right eye
    #[serde(alias = "rightEyeUpper0")]
    pub right_upper_lid: Vec<Point>,

    /// Lower eyelid contour of the right eye
    #[serde(alias = "rightEyeLower0")]
    pub right_lower_lid: Vec<Point>,

    /// Upper eyelid contour of the left eye
    #[serde(alias = "leftEyeUpper0")]
    pub left_upper_lid: Vec<Point>,

    /// Lower eyelid contour of the left eye
    #[serde(alias = "leftEyeLower0")]
    pub left_lower_lid: Vec<Point>,
}

impl FrameDetection {
    /// All eyelid points in drawing order (right upper, right lower, left upper, left lower)
    pub fn eye_outline(&self) -> impl Iterator<Item = &Point> + '_ {
        self.right_upper_lid
            .iter()
            .chain(&self.right_lower_lid)
            .chain(&self.left_upper_lid)
            .chain(&self.left_lower_lid)
    }
}

/// Anything that can estimate faces in a video frame
#[async_trait]
pub trait LandmarkSource: Send {
    /// Estimate the faces present in `frame`
    async fn estimate_faces(&mut self, frame: &VideoFrame) -> Result<Vec<FrameDetection>>;

    /// Source name for log lines
    fn name(&self) -> &str;
}

/// Replays a recorded landmark stream, one frame's detections per entry.
///
/// Recordings are JSON lines: each non-empty line is an array of detections
/// (an empty array is a frame with no face). Playback loops at the end.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    frames: Vec<Vec<FrameDetection>>,
    cursor: usize,
    looping: bool,
}

impl ReplaySource {
    /// Create a looping replay over in-memory frames
    ///
    /// # Errors
    ///
    /// Returns an error if `frames` is empty
    pub fn new(frames: Vec<Vec<FrameDetection>>) -> Result<Self> {
        if frames.is_empty() {
            return Err(Error::InvalidInput("Replay needs at least one frame".to_string()));
        }
        Ok(Self {
            frames,
            cursor: 0,
            looping: true,
        })
    }

    /// Stop at the last recorded frame instead of wrapping around.
    /// Once exhausted, every further frame reports no face.
    #[must_use]
    pub fn once(mut self) -> Self {
        self.looping = false;
        self
    }

    /// Load a JSON-lines recording
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a line is not valid JSON,
    /// or the recording holds no frames
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let frames = Self::parse(&content)?;
        info!("Loaded {} recorded frames from {}", frames.len(), path.display());
        Self::new(frames)
    }

    /// Parse JSON-lines content into per-frame detections
    ///
    /// # Errors
    ///
    /// Returns the first line that fails to parse, with its line number
    pub fn parse(content: &str) -> Result<Vec<Vec<FrameDetection>>> {
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(number, line)| {
                serde_json::from_str(line).map_err(|e| {
                    Error::InvalidInput(format!("Recording line {}: {}", number + 1, e))
                })
            })
            .collect()
    }

    /// Number of recorded frames
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; a replay is never constructed empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[async_trait]
impl LandmarkSource for ReplaySource {
    async fn estimate_faces(&mut self, frame: &VideoFrame) -> Result<Vec<FrameDetection>> {
        if self.cursor >= self.frames.len() {
            if !self.looping {
                return Ok(Vec::new());
            }
            debug!("Replay wrapped at frame {}", frame.sequence);
            self.cursor = 0;
        }
        let detections = self.frames[self.cursor].clone();
        self.cursor += 1;
        Ok(detections)
    }

    fn name(&self) -> &str {
        "replay"
    }
}
