//! Constants used throughout the application

/// Eyelid gap below which an eye counts as closed (pixels at capture resolution)
pub const DEFAULT_CLOSE_THRESHOLD_PX: f32 = 7.0;

/// Eyelid gap both eyes must exceed before the subject counts as open again
pub const DEFAULT_OPEN_THRESHOLD_PX: f32 = 9.0;

/// Index of the mid-lid point in the upper eyelid contour
pub const DEFAULT_UPPER_LID_INDEX: usize = 3;

/// Index of the mid-lid point in the lower eyelid contour
pub const DEFAULT_LOWER_LID_INDEX: usize = 4;

/// Capture resolution the pixel thresholds were tuned for
pub const DEFAULT_CAPTURE_WIDTH: u32 = 640;
pub const DEFAULT_CAPTURE_HEIGHT: u32 = 480;

/// Frame pacing interval, roughly one display refresh at 60 Hz
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

/// Closure timer and session clock tick period
pub const TICK_INTERVAL_MS: u64 = 1000;

/// Consecutive frame failures between escalated log lines
pub const DEFAULT_FAILURE_LOG_EVERY: u32 = 30;

/// Upper bound on extra frame intervals waited during a failure streak
pub const MAX_FAILURE_BACKOFF_FRAMES: u32 = 8;

/// Eye-rest XP policy defaults
pub const DEFAULT_XP_THRESHOLD_SECONDS: u32 = 3;
pub const DEFAULT_XP_POINTS_PER_INTERVAL: u32 = 2;
pub const DEFAULT_XP_MAX_POINTS: u32 = 10;

/// Focus level bounds and per-frame steps
pub const FOCUS_LEVEL_MAX: u8 = 100;
pub const DEFAULT_FOCUS_RECOVER_STEP: u8 = 2;
pub const DEFAULT_FOCUS_DECAY_STEP: u8 = 5;

/// Pomodoro durations in minutes
pub const DEFAULT_WORK_MINUTES: u32 = 25;
pub const DEFAULT_SHORT_BREAK_MINUTES: u32 = 5;
pub const DEFAULT_LONG_BREAK_MINUTES: u32 = 15;
pub const MIN_SESSION_MINUTES: u32 = 1;
pub const MAX_SESSION_MINUTES: u32 = 120;

/// Every n-th completed work period is followed by a long break
pub const LONG_BREAK_EVERY: u32 = 4;

/// Session XP: base award, focus divisor and distraction divisor
pub const SESSION_BASE_XP: i64 = 50;
pub const SESSION_FOCUS_BONUS_DIVISOR: i64 = 10;
pub const SESSION_DISTRACTION_PENALTY_DIVISOR: i64 = 2;

/// XP needed per level
pub const XP_PER_LEVEL: u64 = 1000;

/// Closed-eye alert tiers in seconds
pub const CLOSURE_CAUTION_SECONDS: u32 = 180;
pub const CLOSURE_WARNING_SECONDS: u32 = 240;
pub const CLOSURE_CRITICAL_SECONDS: u32 = 300;

/// Capacity of the monitor event broadcast channel
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Capacity of the session command channel
pub const COMMAND_CHANNEL_CAPACITY: usize = 16;
