//! Blink and closure-timer state machine.
//!
//! Two states, `Open` (initial) and `Closed`. Closing starts a whole-second
//! closure timer that the owner advances with [`BlinkStateMachine::tick`] once
//! per second of wall-clock time. Reopening counts a blink, settles an optional
//! eye-rest award from the final timer value and clears the timer.

use crate::{
    constants::{CLOSURE_CAUTION_SECONDS, CLOSURE_CRITICAL_SECONDS, CLOSURE_WARNING_SECONDS},
    rewards::{ExperienceAward, XpPolicy},
};
use log::debug;
use serde::{Deserialize, Serialize};

/// Eye phase tracked by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EyePhase {
    #[default]
    Open,
    Closed,
}

/// Edge produced by a frame
#[derive(Debug, Clone, PartialEq)]
pub enum BlinkTransition {
    /// Open to closed; the closure timer starts at zero
    Closed,
    /// Closed to open
    Opened {
        /// Final closure timer value
        closed_seconds: u32,
        /// Blink count including this blink
        blink_count: u64,
        /// Eye-rest award, when the closure was long enough
        award: Option<ExperienceAward>,
    },
}

/// How long the eyes have been closed, in display bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosureAlert {
    Normal,
    Caution,
    Warning,
    Critical,
}

impl ClosureAlert {
    /// Alert band for a closure of `seconds`
    #[must_use]
    pub fn for_seconds(seconds: u32) -> Self {
        match seconds {
            s if s >= CLOSURE_CRITICAL_SECONDS => Self::Critical,
            s if s >= CLOSURE_WARNING_SECONDS => Self::Warning,
            s if s >= CLOSURE_CAUTION_SECONDS => Self::Caution,
            _ => Self::Normal,
        }
    }
}

/// Blink counter plus closure timer
#[derive(Debug, Clone, Default)]
pub struct BlinkStateMachine {
    phase: EyePhase,
    closed_seconds: u32,
    blink_count: u64,
    xp_policy: Option<XpPolicy>,
}

impl BlinkStateMachine {
    /// State machine that never awards XP
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State machine that settles eye-rest awards on reopening
    #[must_use]
    pub fn with_xp_policy(policy: XpPolicy) -> Self {
        Self {
            xp_policy: Some(policy),
            ..Self::default()
        }
    }

    /// Feed the evaluator's verdict for one frame
    pub fn update(&mut self, closed: bool) -> Option<BlinkTransition> {
        match (self.phase, closed) {
            (EyePhase::Open, true) => {
                self.phase = EyePhase::Closed;
                self.closed_seconds = 0;
                debug!("Eyes closed");
                Some(BlinkTransition::Closed)
            }
            (EyePhase::Closed, false) => {
                let closed_seconds = self.closed_seconds;
                self.phase = EyePhase::Open;
                self.closed_seconds = 0;
                self.blink_count += 1;
                let award = self
                    .xp_policy
                    .as_ref()
                    .and_then(|policy| policy.award_for(closed_seconds));
                debug!(
                    "Eyes opened after {}s, blink #{}{}",
                    closed_seconds,
                    self.blink_count,
                    if award.is_some() { " (eye-rest award)" } else { "" }
                );
                Some(BlinkTransition::Opened {
                    closed_seconds,
                    blink_count: self.blink_count,
                    award,
                })
            }
            _ => None,
        }
    }

    /// Advance the closure timer by one second.
    ///
    /// Returns the new timer value, or `None` when the eyes are open (a tick
    /// that lands after a reopen is dropped).
    pub fn tick(&mut self) -> Option<u32> {
        if self.phase != EyePhase::Closed {
            return None;
        }
        self.closed_seconds = self.closed_seconds.saturating_add(1);
        Some(self.closed_seconds)
    }

    #[must_use]
    pub fn phase(&self) -> EyePhase {
        self.phase
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.phase == EyePhase::Closed
    }

    /// Whole seconds since the last close, zero while open
    #[must_use]
    pub fn closed_seconds(&self) -> u32 {
        self.closed_seconds
    }

    #[must_use]
    pub fn blink_count(&self) -> u64 {
        self.blink_count
    }

    /// Display band of the running closure
    #[must_use]
    pub fn alert(&self) -> ClosureAlert {
        ClosureAlert::for_seconds(self.closed_seconds)
    }
}
