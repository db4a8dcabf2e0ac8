//! Configuration management for the eye/focus monitor

use crate::{
    constants::{
        DEFAULT_CAPTURE_HEIGHT, DEFAULT_CAPTURE_WIDTH, DEFAULT_CLOSE_THRESHOLD_PX,
        DEFAULT_FAILURE_LOG_EVERY, DEFAULT_FOCUS_DECAY_STEP, DEFAULT_FOCUS_RECOVER_STEP,
        DEFAULT_FRAME_INTERVAL_MS, DEFAULT_LONG_BREAK_MINUTES, DEFAULT_LOWER_LID_INDEX,
        DEFAULT_OPEN_THRESHOLD_PX, DEFAULT_SHORT_BREAK_MINUTES, DEFAULT_UPPER_LID_INDEX,
        DEFAULT_WORK_MINUTES, DEFAULT_XP_MAX_POINTS, DEFAULT_XP_POINTS_PER_INTERVAL,
        DEFAULT_XP_THRESHOLD_SECONDS, FOCUS_LEVEL_MAX, MAX_SESSION_MINUTES, MIN_SESSION_MINUTES,
    },
    session::clamp_minutes,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Eye state thresholds and landmark indices
    pub eyes: EyeConfig,

    /// Eye-rest XP policy
    pub rewards: RewardConfig,

    /// Focus score steps
    pub focus: FocusConfig,

    /// Pomodoro period lengths
    pub session: SessionConfig,

    /// Capture resolution and frame pacing
    pub capture: CaptureConfig,
}

/// Eye state evaluation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EyeConfig {
    /// Gap below which an eye counts as closed (px)
    pub close_threshold: f32,

    /// Gap both eyes must exceed to reopen (px)
    pub open_threshold: f32,

    /// Point index into each upper lid contour
    pub upper_lid_index: usize,

    /// Point index into each lower lid contour
    pub lower_lid_index: usize,
}

/// Eye-rest award parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Award XP for eye rests in focus mode
    pub enabled: bool,

    /// Minimum closure in whole seconds
    pub threshold_seconds: u32,

    /// Points per full threshold interval
    pub points_per_interval: u32,

    /// Cap per closure
    pub max_points: u32,
}

/// Focus score parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Gain per frame with a face
    pub recover_step: u8,

    /// Loss per frame without a face
    pub decay_step: u8,
}

/// Pomodoro durations in minutes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub work_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
}

/// Capture and loop pacing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Expected frame width; thresholds are tuned for this resolution
    pub width: u32,

    /// Expected frame height
    pub height: u32,

    /// Delay between loop iterations in milliseconds
    pub frame_interval_ms: u64,

    /// Consecutive frame failures between escalated log lines
    pub failure_log_every: u32,
}

impl Default for EyeConfig {
    fn default() -> Self {
        Self {
            close_threshold: DEFAULT_CLOSE_THRESHOLD_PX,
            open_threshold: DEFAULT_OPEN_THRESHOLD_PX,
            upper_lid_index: DEFAULT_UPPER_LID_INDEX,
            lower_lid_index: DEFAULT_LOWER_LID_INDEX,
        }
    }
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_seconds: DEFAULT_XP_THRESHOLD_SECONDS,
            points_per_interval: DEFAULT_XP_POINTS_PER_INTERVAL,
            max_points: DEFAULT_XP_MAX_POINTS,
        }
    }
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            recover_step: DEFAULT_FOCUS_RECOVER_STEP,
            decay_step: DEFAULT_FOCUS_DECAY_STEP,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            short_break_minutes: DEFAULT_SHORT_BREAK_MINUTES,
            long_break_minutes: DEFAULT_LONG_BREAK_MINUTES,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CAPTURE_WIDTH,
            height: DEFAULT_CAPTURE_HEIGHT,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            failure_log_every: DEFAULT_FAILURE_LOG_EVERY,
        }
    }
}

impl SessionConfig {
    /// Copy with every duration forced into the supported range
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            work_minutes: clamp_minutes(self.work_minutes),
            short_break_minutes: clamp_minutes(self.short_break_minutes),
            long_break_minutes: clamp_minutes(self.long_break_minutes),
        }
    }
}

impl CaptureConfig {
    /// Loop pacing interval
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        // Eye thresholds
        let eyes = &self.eyes;
        if !eyes.close_threshold.is_finite() || eyes.close_threshold <= 0.0 {
            return Err(Error::ConfigError(
                "Close threshold must be a positive number of pixels".to_string(),
            ));
        }
        if !eyes.open_threshold.is_finite() || eyes.open_threshold <= 0.0 {
            return Err(Error::ConfigError(
                "Open threshold must be a positive number of pixels".to_string(),
            ));
        }
        if eyes.close_threshold > eyes.open_threshold {
            return Err(Error::ConfigError(format!(
                "Close threshold ({}) must not exceed open threshold ({})",
                eyes.close_threshold, eyes.open_threshold
            )));
        }

        // Rewards
        if self.rewards.enabled && self.rewards.threshold_seconds == 0 {
            return Err(Error::ConfigError(
                "Eye-rest threshold must be at least one second".to_string(),
            ));
        }

        // Focus steps
        if self.focus.recover_step > FOCUS_LEVEL_MAX || self.focus.decay_step > FOCUS_LEVEL_MAX {
            return Err(Error::ConfigError(format!(
                "Focus steps must be between 0 and {FOCUS_LEVEL_MAX}"
            )));
        }

        // Session durations
        let session = &self.session;
        for (name, minutes) in [
            ("work", session.work_minutes),
            ("short break", session.short_break_minutes),
            ("long break", session.long_break_minutes),
        ] {
            if !(MIN_SESSION_MINUTES..=MAX_SESSION_MINUTES).contains(&minutes) {
                return Err(Error::ConfigError(format!(
                    "The {name} duration must be between {MIN_SESSION_MINUTES} and {MAX_SESSION_MINUTES} minutes"
                )));
            }
        }

        // Capture
        if self.capture.width == 0 || self.capture.height == 0 {
            return Err(Error::ConfigError("Capture resolution must be non-zero".to_string()));
        }
        if self.capture.frame_interval_ms == 0 {
            return Err(Error::ConfigError("Frame interval must be greater than 0".to_string()));
        }
        if self.capture.failure_log_every == 0 {
            return Err(Error::ConfigError(
                "Failure log interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Eye/Focus Monitor Configuration

# Eye state: gaps are vertical pixel distances at the capture resolution
eyes:
  close_threshold: 7.0
  open_threshold: 9.0
  upper_lid_index: 3
  lower_lid_index: 4

# Eye-rest XP (focus mode)
rewards:
  enabled: true
  threshold_seconds: 3
  points_per_interval: 2
  max_points: 10

# Focus score steps per frame
focus:
  recover_step: 2
  decay_step: 5

# Pomodoro periods in minutes (1-120)
session:
  work_minutes: 25
  short_break_minutes: 5
  long_break_minutes: 15

# Capture resolution and loop pacing
capture:
  width: 640
  height: 480
  frame_interval_ms: 16
  failure_log_every: 30
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_matches_defaults() {
        let parsed = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
        assert_eq!(parsed, Config::default());
        parsed.validate().unwrap();
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed = Config::from_yaml("eyes:\n  close_threshold: 5.5\n").unwrap();
        assert_eq!(parsed.eyes.close_threshold, 5.5);
        assert_eq!(parsed.eyes.open_threshold, 9.0);
        assert_eq!(parsed.session, SessionConfig::default());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let mut config = Config::default();
        config.eyes.close_threshold = 10.0;
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_non_finite_threshold_rejected() {
        let mut config = Config::default();
        config.eyes.open_threshold = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_session_bounds() {
        let mut config = Config::default();
        config.session.work_minutes = 121;
        assert!(config.validate().is_err());
        config.session.work_minutes = 120;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_frame_interval_rejected() {
        let mut config = Config::default();
        config.capture.frame_interval_ms = 0;
        assert!(config.validate().is_err());
    }
}
