//! Eye state evaluation from eyelid landmarks.
//!
//! Each eye's openness is the vertical gap between one upper-lid and one
//! lower-lid point. The subject closes when either gap drops under the close
//! threshold and reopens only when both gaps exceed the open threshold. Gaps in
//! between keep the previous state.

use crate::{
    config::EyeConfig,
    landmarks::{FrameDetection, Point},
    Error, Result,
};
use serde::{Deserialize, Serialize};

/// Vertical eyelid gaps for one frame, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeGaps {
    pub right: f32,
    pub left: f32,
}

/// Result of evaluating one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeReading {
    /// Eye state after this frame
    pub closed: bool,
    /// Gaps of the evaluated face, `None` on a no-face frame
    pub gaps: Option<EyeGaps>,
}

/// Hysteresis evaluator holding the previous eye state
#[derive(Debug, Clone)]
pub struct EyeStateEvaluator {
    config: EyeConfig,
    closed: bool,
}

impl EyeStateEvaluator {
    /// Create an evaluator starting with the eyes open
    #[must_use]
    pub fn new(config: EyeConfig) -> Self {
        Self { config, closed: false }
    }

    /// Evaluate one frame's detections. Only the first face is considered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDetection`] if the first face lacks the
    /// configured lid points; the previous state is kept in that case.
    pub fn evaluate(&mut self, detections: &[FrameDetection]) -> Result<EyeReading> {
        let Some(first) = detections.first() else {
            return Ok(EyeReading {
                closed: self.closed,
                gaps: None,
            });
        };

        let gaps = eye_gaps(first, self.config.upper_lid_index, self.config.lower_lid_index)?;
        self.closed = next_closed(self.closed, gaps, &self.config);

        Ok(EyeReading {
            closed: self.closed,
            gaps: Some(gaps),
        })
    }

    /// Current eye state
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &EyeConfig {
        &self.config
    }

    /// Forget the previous state
    pub fn reset(&mut self) {
        self.closed = false;
    }
}

/// Compute both eyes' gaps for a detection
///
/// # Errors
///
/// Returns [`Error::InvalidDetection`] if a contour is shorter than its index
pub fn eye_gaps(detection: &FrameDetection, upper_index: usize, lower_index: usize) -> Result<EyeGaps> {
    let right = lid_gap(
        &detection.right_upper_lid,
        &detection.right_lower_lid,
        upper_index,
        lower_index,
        "right",
    )?;
    let left = lid_gap(
        &detection.left_upper_lid,
        &detection.left_lower_lid,
        upper_index,
        lower_index,
        "left",
    )?;
    Ok(EyeGaps { right, left })
}

fn lid_gap(
    upper: &[Point],
    lower: &[Point],
    upper_index: usize,
    lower_index: usize,
    eye: &str,
) -> Result<f32> {
    let top = upper.get(upper_index).ok_or_else(|| {
        Error::InvalidDetection(format!(
            "{eye} upper lid has {} points, need index {upper_index}",
            upper.len()
        ))
    })?;
    let bottom = lower.get(lower_index).ok_or_else(|| {
        Error::InvalidDetection(format!(
            "{eye} lower lid has {} points, need index {lower_index}",
            lower.len()
        ))
    })?;
    Ok((top.y - bottom.y).abs())
}

/// Apply the hysteresis rule to the previous state
#[must_use]
pub fn next_closed(was_closed: bool, gaps: EyeGaps, config: &EyeConfig) -> bool {
    if gaps.right < config.close_threshold || gaps.left < config.close_threshold {
        return true;
    }
    if was_closed && gaps.right > config.open_threshold && gaps.left > config.open_threshold {
        return false;
    }
    was_closed
}
