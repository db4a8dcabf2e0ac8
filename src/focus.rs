//! Focus score aggregation from per-frame face presence.
//!
//! A linear ratchet: frames with a face recover the focus level by a small
//! step, frames without one decay it by a larger step and count as a
//! distraction. There is no time-based smoothing.

use crate::{config::FocusConfig, constants::FOCUS_LEVEL_MAX};
use serde::{Deserialize, Serialize};

/// Focus values after one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusReading {
    pub focus_level: u8,
    pub distraction_count: u32,
}

/// Focus level and distraction counter
#[derive(Debug, Clone)]
pub struct FocusScoreAggregator {
    recover_step: u8,
    decay_step: u8,
    focus_level: u8,
    distraction_count: u32,
}

impl FocusScoreAggregator {
    /// Create an aggregator at full focus
    #[must_use]
    pub fn new(recover_step: u8, decay_step: u8) -> Self {
        Self {
            recover_step,
            decay_step,
            focus_level: FOCUS_LEVEL_MAX,
            distraction_count: 0,
        }
    }

    /// Update with the number of faces seen in a frame
    pub fn on_frame(&mut self, face_count: usize) -> FocusReading {
        if face_count > 0 {
            self.focus_level = self.focus_level.saturating_add(self.recover_step).min(FOCUS_LEVEL_MAX);
        } else {
            self.focus_level = self.focus_level.saturating_sub(self.decay_step);
            self.distraction_count = self.distraction_count.saturating_add(1);
        }
        self.reading()
    }

    /// Current values
    #[must_use]
    pub fn reading(&self) -> FocusReading {
        FocusReading {
            focus_level: self.focus_level,
            distraction_count: self.distraction_count,
        }
    }

    /// Back to full focus and no distractions, at the start of a new period
    pub fn reset(&mut self) {
        self.focus_level = FOCUS_LEVEL_MAX;
        self.distraction_count = 0;
    }
}

impl From<&FocusConfig> for FocusScoreAggregator {
    fn from(config: &FocusConfig) -> Self {
        Self::new(config.recover_step, config.decay_step)
    }
}
