//! Eye and focus state monitor driven by per-frame face landmarks.
//!
//! This library turns a stream of facial landmark detections into:
//! - An open/closed eye state with hysteresis
//! - A blink counter and a whole-second closure timer
//! - Experience-point awards for resting the eyes
//! - A focus level that decays while no face is in view
//! - A pomodoro work/break clock with per-session XP
//!
//! The landmark model and the camera are collaborators behind the
//! [`landmarks::LandmarkSource`] and [`camera::Camera`] traits. The render loop
//! in [`monitor`] paces frames, ticks the timers and can be stopped at any time.
//!
//! # Examples
//!
//! ## Evaluating Frames Directly
//!
//! ```no_run
//! use eye_focus_monitor::{
//!     config::Config,
//!     landmarks::ReplaySource,
//!     monitor::{MonitorMode, TrackerCore},
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let frames = ReplaySource::parse(&std::fs::read_to_string("session.jsonl")?)?;
//! let mut core = TrackerCore::new(&Config::default(), MonitorMode::EyeRest);
//!
//! for detections in &frames {
//!     let outcome = core.process_frame(detections);
//!     for event in outcome.events {
//!         println!("{:?}", event);
//!     }
//! }
//! println!("Blinks: {}", core.snapshot().blink_count);
//! # Ok(())
//! # }
//! ```
//!
//! ## Running the Render Loop
//!
//! ```no_run
//! use eye_focus_monitor::{
//!     camera::SyntheticCamera,
//!     config::Config,
//!     landmarks::ReplaySource,
//!     monitor::{Monitor, MonitorEvent, MonitorMode, SessionCommand},
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = ReplaySource::from_file("session.jsonl")?;
//! let mut camera = SyntheticCamera::new();
//!
//! let handle = Monitor::new(Config::default(), MonitorMode::Focus, source)?
//!     .start(&mut camera)
//!     .await?;
//! let mut events = handle.subscribe();
//! handle.command(SessionCommand::Start).await?;
//!
//! while let Ok(event) = events.recv().await {
//!     if let MonitorEvent::SessionCompleted(summary) = event {
//!         println!("Earned {} XP", summary.xp_earned);
//!         break;
//!     }
//! }
//!
//! let last = handle.stop().await?;
//! println!("Focus level: {:?}", last.focus.map(|f| f.focus_level));
//! # Ok(())
//! # }
//! ```

/// Camera collaborator and video frames
pub mod camera;

/// Face landmark detections and the landmark source collaborator
pub mod landmarks;

/// Open/closed eye evaluation with hysteresis
pub mod eye_state;

/// Blink counting and the closure timer
pub mod blink;

/// Focus score from face presence
pub mod focus;

/// Experience points and levels
pub mod rewards;

/// Pomodoro work/break clock
pub mod session;

/// Per-frame drawing hook
pub mod overlay;

/// Award and session persistence adapters
pub mod sink;

/// Render loop driver
pub mod monitor;

/// Small formatting helpers
pub mod utils;

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
