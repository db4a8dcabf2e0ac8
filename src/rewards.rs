//! Experience points: eye-rest awards, session awards and level progression.
//!
//! The monitor only constructs these values. Writing them anywhere is the job
//! of an [`crate::sink::AwardSink`].

use crate::{
    config::RewardConfig,
    constants::{
        SESSION_BASE_XP, SESSION_DISTRACTION_PENALTY_DIVISOR, SESSION_FOCUS_BONUS_DIVISOR,
        XP_PER_LEVEL,
    },
    session::SessionMode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why an award was granted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AwardReason {
    /// Eyes were kept closed for a rest
    EyeRest { closed_seconds: u32 },
    /// A pomodoro period ran to completion
    SessionComplete { mode: SessionMode, cycle: u32 },
}

/// XP granted for one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceAward {
    pub points: u32,
    pub reason: AwardReason,
    pub awarded_at: DateTime<Utc>,
}

impl ExperienceAward {
    #[must_use]
    pub fn new(points: u32, reason: AwardReason) -> Self {
        Self {
            points,
            reason,
            awarded_at: Utc::now(),
        }
    }
}

/// Eye-rest award rule: every full `threshold_seconds` of closure is worth
/// `points_per_interval`, up to `max_points`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpPolicy {
    pub threshold_seconds: u32,
    pub points_per_interval: u32,
    pub max_points: u32,
}

impl XpPolicy {
    /// Points earned for a closure of `closed_seconds`, zero under the threshold
    #[must_use]
    pub fn points_for(&self, closed_seconds: u32) -> u32 {
        if self.threshold_seconds == 0 || closed_seconds < self.threshold_seconds {
            return 0;
        }
        let intervals = closed_seconds / self.threshold_seconds;
        intervals
            .saturating_mul(self.points_per_interval)
            .min(self.max_points)
    }

    /// Build the award for a closure, if it earned anything
    #[must_use]
    pub fn award_for(&self, closed_seconds: u32) -> Option<ExperienceAward> {
        match self.points_for(closed_seconds) {
            0 => None,
            points => Some(ExperienceAward::new(points, AwardReason::EyeRest { closed_seconds })),
        }
    }
}

impl From<&RewardConfig> for XpPolicy {
    fn from(config: &RewardConfig) -> Self {
        Self {
            threshold_seconds: config.threshold_seconds,
            points_per_interval: config.points_per_interval,
            max_points: config.max_points,
        }
    }
}

/// XP for a completed work period: base plus a focus bonus minus a
/// distraction penalty, never negative
#[must_use]
pub fn session_xp(focus_level: u8, distraction_count: u32) -> u32 {
    let earned = SESSION_BASE_XP + i64::from(focus_level) / SESSION_FOCUS_BONUS_DIVISOR
        - i64::from(distraction_count) / SESSION_DISTRACTION_PENALTY_DIVISOR;
    u32::try_from(earned.max(0)).unwrap_or(u32::MAX)
}

/// Accumulated XP, level and streak of the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub xp: u64,
    pub level: u32,
    pub streak: u32,
}

impl Default for Progress {
    fn default() -> Self {
        Self::with_xp(0, 0)
    }
}

impl Progress {
    /// Start from previously persisted totals
    #[must_use]
    pub fn with_xp(xp: u64, streak: u32) -> Self {
        Self {
            xp,
            level: level_for(xp),
            streak,
        }
    }

    /// Add an award; returns true when the level went up
    pub fn apply(&mut self, award: &ExperienceAward) -> bool {
        let before = self.level;
        self.xp = self.xp.saturating_add(u64::from(award.points));
        self.level = level_for(self.xp);
        self.level > before
    }

    /// Record another completed work period
    pub fn extend_streak(&mut self) {
        self.streak = self.streak.saturating_add(1);
    }
}

/// Level reached with `xp` points
#[must_use]
pub fn level_for(xp: u64) -> u32 {
    u32::try_from(xp / XP_PER_LEVEL + 1).unwrap_or(u32::MAX)
}
