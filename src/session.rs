//! Pomodoro work/break clock.
//!
//! Counts the current period down one second per [`PomodoroSession::tick`]
//! while running. When a period ends the clock stops, records the completion
//! and loads the next period: a long break after every fourth work period, a
//! short break after the others, and work after any break.

use crate::{
    config::SessionConfig,
    constants::{LONG_BREAK_EVERY, MAX_SESSION_MINUTES, MIN_SESSION_MINUTES},
};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

/// Kind of period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    Work,
    ShortBreak,
    LongBreak,
}

impl SessionMode {
    #[must_use]
    pub fn is_break(self) -> bool {
        !matches!(self, Self::Work)
    }
}

/// Read-only view of the clock for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub mode: SessionMode,
    pub remaining_seconds: u32,
    pub running: bool,
    pub cycle_count: u32,
}

/// A period that ran to zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodCompletion {
    /// Mode of the finished period
    pub mode: SessionMode,
    /// Its configured length
    pub duration_minutes: u32,
    /// Completed work periods so far, including this one
    pub cycle_count: u32,
    /// Mode loaded for the next period
    pub next_mode: SessionMode,
}

/// Record handed to the persistence collaborator when a period ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub mode: SessionMode,
    pub duration_minutes: u32,
    pub focus_level: u8,
    pub distraction_count: u32,
    pub blink_count: u64,
    pub xp_earned: u32,
    pub completed_at: DateTime<Utc>,
}

/// Work/break countdown
#[derive(Debug, Clone)]
pub struct PomodoroSession {
    durations: SessionConfig,
    mode: SessionMode,
    remaining_seconds: u32,
    running: bool,
    cycle_count: u32,
}

impl PomodoroSession {
    /// Stopped clock loaded with a work period
    #[must_use]
    pub fn new(durations: SessionConfig) -> Self {
        let durations = durations.clamped();
        Self {
            remaining_seconds: durations.work_minutes * 60,
            durations,
            mode: SessionMode::Work,
            running: false,
            cycle_count: 0,
        }
    }

    pub fn start(&mut self) {
        if !self.running {
            info!("{:?} period started, {}s remaining", self.mode, self.remaining_seconds);
            self.running = true;
        }
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Stop and reload the full length of the current mode
    pub fn reset(&mut self) {
        self.running = false;
        self.remaining_seconds = self.minutes_for(self.mode) * 60;
    }

    /// Jump to another mode, stopped and at full length
    pub fn switch_mode(&mut self, mode: SessionMode) {
        self.mode = mode;
        self.reset();
    }

    /// Replace the period lengths. A stopped clock reloads its current mode.
    pub fn set_durations(&mut self, durations: SessionConfig) {
        self.durations = durations.clamped();
        if !self.running {
            self.remaining_seconds = self.minutes_for(self.mode) * 60;
        }
    }

    /// Advance by one second; returns the completion when the period hits zero
    pub fn tick(&mut self) -> Option<PeriodCompletion> {
        if !self.running {
            return None;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return None;
        }
        Some(self.complete())
    }

    fn complete(&mut self) -> PeriodCompletion {
        let finished = self.mode;
        let duration_minutes = self.minutes_for(finished);
        let next_mode = if finished == SessionMode::Work {
            self.cycle_count += 1;
            if self.cycle_count % LONG_BREAK_EVERY == 0 {
                SessionMode::LongBreak
            } else {
                SessionMode::ShortBreak
            }
        } else {
            SessionMode::Work
        };
        info!("{:?} period complete, next {:?}", finished, next_mode);

        self.running = false;
        self.mode = next_mode;
        self.remaining_seconds = self.minutes_for(next_mode) * 60;

        PeriodCompletion {
            mode: finished,
            duration_minutes,
            cycle_count: self.cycle_count,
            next_mode,
        }
    }

    fn minutes_for(&self, mode: SessionMode) -> u32 {
        match mode {
            SessionMode::Work => self.durations.work_minutes,
            SessionMode::ShortBreak => self.durations.short_break_minutes,
            SessionMode::LongBreak => self.durations.long_break_minutes,
        }
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView {
            mode: self.mode,
            remaining_seconds: self.remaining_seconds,
            running: self.running,
            cycle_count: self.cycle_count,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn durations(&self) -> &SessionConfig {
        &self.durations
    }
}

/// Clamp a user-entered period length to the supported range
#[must_use]
pub fn clamp_minutes(minutes: u32) -> u32 {
    minutes.clamp(MIN_SESSION_MINUTES, MAX_SESSION_MINUTES)
}
