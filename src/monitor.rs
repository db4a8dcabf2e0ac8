//! Render loop driver and the tracker core it owns.
//!
//! [`TrackerCore`] is the synchronous state: evaluator, blink state machine,
//! and in focus mode the focus aggregator, pomodoro clock and XP progress. It
//! can be driven directly by a host that runs its own frame loop.
//!
//! [`Monitor`] wraps the core in a tokio task that pulls frames from a camera,
//! asks the landmark source for detections and feeds the core, while two
//! independent one-second intervals drive the closure timer and the session
//! clock. [`MonitorHandle`] exposes snapshots, events and session commands,
//! and stops the task deterministically.

use crate::{
    blink::{BlinkStateMachine, BlinkTransition, ClosureAlert},
    camera::{Camera, StreamGuard, VideoFrame},
    config::{CaptureConfig, Config, SessionConfig},
    constants::{
        COMMAND_CHANNEL_CAPACITY, EVENT_CHANNEL_CAPACITY, MAX_FAILURE_BACKOFF_FRAMES, TICK_INTERVAL_MS,
    },
    eye_state::{EyeGaps, EyeStateEvaluator},
    focus::{FocusReading, FocusScoreAggregator},
    landmarks::{FrameDetection, LandmarkSource},
    overlay::{FrameOverlay, NoOverlay},
    rewards::{session_xp, AwardReason, ExperienceAward, Progress, XpPolicy},
    session::{PomodoroSession, SessionMode, SessionSummary, SessionView},
    Error, Result,
};
use chrono::Utc;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::{future::Future, pin::Pin, time::Duration};
use tokio::{
    sync::{broadcast, mpsc, watch},
    task::JoinHandle,
    time::{interval, interval_at, Instant, Interval, MissedTickBehavior},
};

/// Which variant of the monitor is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MonitorMode {
    /// Eye state, closure timer and blink counter only
    EyeRest,
    /// Everything: eye-rest XP, focus score and the pomodoro clock
    Focus,
}

/// Read-only state for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorSnapshot {
    pub mode: MonitorMode,
    pub eyes_closed: bool,
    pub closed_seconds: u32,
    pub closure_alert: ClosureAlert,
    /// Eyelid gaps of the last evaluated face, `None` while no face is in view
    pub eye_gaps: Option<EyeGaps>,
    pub blink_count: u64,
    pub faces_in_view: usize,
    pub focus: Option<FocusReading>,
    pub progress: Option<Progress>,
    pub session: Option<SessionView>,
    pub frames_processed: u64,
    pub frame_failures: u64,
}

/// Things worth telling the UI or the persistence collaborator about
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEvent {
    EyesClosed,
    EyesOpened { closed_seconds: u32, blink_count: u64 },
    FaceLost,
    FaceFound,
    Award(ExperienceAward),
    LevelUp { level: u32 },
    SessionCompleted(SessionSummary),
}

/// Pomodoro clock commands (focus mode)
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Start,
    Pause,
    Reset,
    SetDurations(SessionConfig),
    SwitchMode(SessionMode),
}

/// What one frame did to the core
#[derive(Debug, Default)]
pub struct FrameOutcome {
    pub events: Vec<MonitorEvent>,
    /// The eyes closed on this frame; the closure timer restarts now
    pub closed_now: bool,
    /// The frame's detection could not be evaluated
    pub error: Option<Error>,
}

/// Focus-mode state
#[derive(Debug, Clone)]
struct FocusState {
    aggregator: FocusScoreAggregator,
    session: PomodoroSession,
    progress: Progress,
}

/// Shared eye/focus state machine, one per monitored subject
#[derive(Debug, Clone)]
pub struct TrackerCore {
    mode: MonitorMode,
    evaluator: EyeStateEvaluator,
    blink: BlinkStateMachine,
    focus: Option<FocusState>,
    faces_in_view: usize,
    eye_gaps: Option<EyeGaps>,
    face_present: bool,
    frames_processed: u64,
    frame_failures: u64,
}

impl TrackerCore {
    #[must_use]
    pub fn new(config: &Config, mode: MonitorMode) -> Self {
        let (blink, focus) = match mode {
            MonitorMode::EyeRest => (BlinkStateMachine::new(), None),
            MonitorMode::Focus => {
                let blink = if config.rewards.enabled {
                    BlinkStateMachine::with_xp_policy(XpPolicy::from(&config.rewards))
                } else {
                    BlinkStateMachine::new()
                };
                let focus = FocusState {
                    aggregator: FocusScoreAggregator::from(&config.focus),
                    session: PomodoroSession::new(config.session.clone()),
                    progress: Progress::default(),
                };
                (blink, Some(focus))
            }
        };
        Self {
            mode,
            evaluator: EyeStateEvaluator::new(config.eyes.clone()),
            blink,
            focus,
            faces_in_view: 0,
            eye_gaps: None,
            face_present: true,
            frames_processed: 0,
            frame_failures: 0,
        }
    }

    /// Resume from previously persisted XP totals (focus mode only)
    #[must_use]
    pub fn with_progress(mut self, progress: Progress) -> Self {
        if let Some(focus) = &mut self.focus {
            focus.progress = progress;
        }
        self
    }

    /// Feed one frame's detections
    pub fn process_frame(&mut self, detections: &[FrameDetection]) -> FrameOutcome {
        let mut outcome = FrameOutcome::default();
        self.frames_processed += 1;
        self.faces_in_view = detections.len();

        let present = !detections.is_empty();
        if present != self.face_present {
            self.face_present = present;
            outcome.events.push(if present {
                MonitorEvent::FaceFound
            } else {
                MonitorEvent::FaceLost
            });
        }

        if let Some(focus) = &mut self.focus {
            focus.aggregator.on_frame(detections.len());
        }

        let reading = match self.evaluator.evaluate(detections) {
            Ok(reading) => reading,
            Err(e) => {
                self.eye_gaps = None;
                outcome.error = Some(e);
                return outcome;
            }
        };
        self.eye_gaps = reading.gaps;

        match self.blink.update(reading.closed) {
            Some(BlinkTransition::Closed) => {
                outcome.closed_now = true;
                outcome.events.push(MonitorEvent::EyesClosed);
            }
            Some(BlinkTransition::Opened {
                closed_seconds,
                blink_count,
                award,
            }) => {
                outcome.events.push(MonitorEvent::EyesOpened {
                    closed_seconds,
                    blink_count,
                });
                if let Some(award) = award {
                    self.grant(award, &mut outcome.events);
                }
            }
            None => {}
        }

        outcome
    }

    /// One second of wall-clock time passed for the closure timer
    pub fn tick_closure(&mut self) -> Option<u32> {
        self.blink.tick()
    }

    /// One second of wall-clock time passed for the pomodoro clock
    pub fn tick_session(&mut self) -> Vec<MonitorEvent> {
        let mut events = Vec::new();
        let Some(focus) = &mut self.focus else {
            return events;
        };
        let Some(done) = focus.session.tick() else {
            return events;
        };

        let reading = focus.aggregator.reading();
        let xp_earned = if done.mode == SessionMode::Work {
            focus.progress.extend_streak();
            session_xp(reading.focus_level, reading.distraction_count)
        } else {
            0
        };
        focus.aggregator.reset();

        let summary = SessionSummary {
            mode: done.mode,
            duration_minutes: done.duration_minutes,
            focus_level: reading.focus_level,
            distraction_count: reading.distraction_count,
            blink_count: self.blink.blink_count(),
            xp_earned,
            completed_at: Utc::now(),
        };
        if xp_earned > 0 {
            let award = ExperienceAward::new(
                xp_earned,
                AwardReason::SessionComplete {
                    mode: done.mode,
                    cycle: done.cycle_count,
                },
            );
            self.grant(award, &mut events);
        }
        events.push(MonitorEvent::SessionCompleted(summary));
        events
    }

    /// Apply a session command; returns true when the clock (re)started
    pub fn handle_command(&mut self, command: SessionCommand) -> bool {
        let Some(focus) = &mut self.focus else {
            warn!("Ignoring {:?}: session commands need focus mode", command);
            return false;
        };
        debug!("Session command {:?}", command);
        match command {
            SessionCommand::Start => {
                let was_running = focus.session.is_running();
                focus.session.start();
                !was_running
            }
            SessionCommand::Pause => {
                focus.session.pause();
                false
            }
            SessionCommand::Reset => {
                focus.session.reset();
                focus.aggregator.reset();
                false
            }
            SessionCommand::SetDurations(durations) => {
                focus.session.set_durations(durations);
                false
            }
            SessionCommand::SwitchMode(mode) => {
                focus.session.switch_mode(mode);
                focus.aggregator.reset();
                false
            }
        }
    }

    /// Count a frame that never reached the evaluator
    pub fn record_failure(&mut self) {
        self.frame_failures += 1;
    }

    fn grant(&mut self, award: ExperienceAward, events: &mut Vec<MonitorEvent>) {
        if let Some(focus) = &mut self.focus {
            if focus.progress.apply(&award) {
                info!("Level up: {}", focus.progress.level);
                events.push(MonitorEvent::Award(award));
                events.push(MonitorEvent::LevelUp {
                    level: focus.progress.level,
                });
                return;
            }
        }
        events.push(MonitorEvent::Award(award));
    }

    #[must_use]
    pub fn mode(&self) -> MonitorMode {
        self.mode
    }

    #[must_use]
    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            mode: self.mode,
            eyes_closed: self.blink.is_closed(),
            closed_seconds: self.blink.closed_seconds(),
            closure_alert: self.blink.alert(),
            eye_gaps: self.eye_gaps,
            blink_count: self.blink.blink_count(),
            faces_in_view: self.faces_in_view,
            focus: self.focus.as_ref().map(|f| f.aggregator.reading()),
            progress: self.focus.as_ref().map(|f| f.progress),
            session: self.focus.as_ref().map(|f| f.session.view()),
            frames_processed: self.frames_processed,
            frame_failures: self.frame_failures,
        }
    }
}

/// A configured, not yet started monitor
pub struct Monitor<S: LandmarkSource> {
    config: Config,
    mode: MonitorMode,
    source: S,
    overlay: Box<dyn FrameOverlay>,
    progress: Option<Progress>,
}

impl<S: LandmarkSource + 'static> Monitor<S> {
    /// Create a monitor around an already loaded landmark source
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(config: Config, mode: MonitorMode, source: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            mode,
            source,
            overlay: Box::new(NoOverlay),
            progress: None,
        })
    }

    /// Draw every processed frame through `overlay`
    #[must_use]
    pub fn with_overlay(mut self, overlay: Box<dyn FrameOverlay>) -> Self {
        self.overlay = overlay;
        self
    }

    /// Resume XP totals from the persistence collaborator
    #[must_use]
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Acquire the camera and spawn the render loop.
    ///
    /// # Errors
    ///
    /// Camera acquisition errors, including [`Error::CameraPermission`], are
    /// returned as is; nothing is spawned in that case.
    pub async fn start<C: Camera + ?Sized>(self, camera: &mut C) -> Result<MonitorHandle> {
        let capture = self.config.capture.clone();
        let stream = match camera.open(capture.width, capture.height).await {
            Ok(stream) => stream,
            Err(e) => {
                error!("Camera setup failed: {}", e);
                return Err(e);
            }
        };
        let guard = StreamGuard::new(stream);

        let mut core = TrackerCore::new(&self.config, self.mode);
        if let Some(progress) = self.progress {
            core = core.with_progress(progress);
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (snapshot_tx, snapshot_rx) = watch::channel(core.snapshot());
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);

        info!(
            "Starting {:?} monitor with {} landmark source at {}x{}",
            self.mode,
            self.source.name(),
            capture.width,
            capture.height
        );

        let render_loop = RenderLoop {
            state: LoopState {
                core,
                overlay: self.overlay,
                capture,
                snapshots: snapshot_tx,
                events: events_tx.clone(),
                failure_streak: 0,
                resolution_warned: false,
            },
            pipeline: FramePipeline {
                stream: guard,
                source: self.source,
            },
            shutdown: shutdown_rx,
            commands: commands_rx,
        };
        let task = tokio::spawn(render_loop.run());

        Ok(MonitorHandle {
            shutdown: shutdown_tx,
            commands: commands_tx,
            snapshots: snapshot_rx,
            events: events_tx,
            task: Some(task),
        })
    }
}

/// Control surface of a running monitor
pub struct MonitorHandle {
    shutdown: watch::Sender<bool>,
    commands: mpsc::Sender<SessionCommand>,
    snapshots: watch::Receiver<MonitorSnapshot>,
    events: broadcast::Sender<MonitorEvent>,
    task: Option<JoinHandle<MonitorSnapshot>>,
}

impl MonitorHandle {
    /// Latest published state
    #[must_use]
    pub fn snapshot(&self) -> MonitorSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified on every published snapshot
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<MonitorSnapshot> {
        self.snapshots.clone()
    }

    /// Subscribe to events emitted from now on
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.events.subscribe()
    }

    /// Send a pomodoro command to the loop
    ///
    /// # Errors
    ///
    /// Returns [`Error::MonitorStopped`] if the loop is no longer running
    pub async fn command(&self, command: SessionCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| Error::MonitorStopped("render loop has exited".to_string()))
    }

    /// Whether the render loop task is still alive
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the loop, release the camera and return the final state
    ///
    /// # Errors
    ///
    /// Returns [`Error::MonitorStopped`] if the loop task panicked
    pub async fn stop(mut self) -> Result<MonitorSnapshot> {
        let _ = self.shutdown.send(true);
        // The task stays owned until it finished, so cancelling this future
        // still aborts the loop through Drop
        let Some(task) = self.task.as_mut() else {
            return Ok(self.snapshot());
        };
        let finished = task.await;
        self.task = None;
        finished.map_err(|e| Error::MonitorStopped(format!("render loop failed: {e}")))
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            debug!("Monitor handle dropped, aborting render loop");
            task.abort();
        }
    }
}

/// Camera stream and landmark source, moved into each frame fetch
struct FramePipeline<S> {
    stream: StreamGuard,
    source: S,
}

type Fetched = Result<(VideoFrame, Vec<FrameDetection>)>;

/// A frame read plus prediction that has not resolved yet
type InFlight<S> = Pin<Box<dyn Future<Output = (FramePipeline<S>, Fetched)> + Send>>;

impl<S: LandmarkSource + 'static> FramePipeline<S> {
    /// Read one frame and predict on it, handing the pipeline back afterwards
    async fn fetch(mut self) -> (Self, Fetched) {
        let fetched = self.fetch_one().await;
        (self, fetched)
    }

    async fn fetch_one(&mut self) -> Fetched {
        let frame = self.stream.next_frame().await?;
        let detections = self.source.estimate_faces(&frame).await?;
        Ok((frame, detections))
    }
}

/// State owned by the spawned loop task
struct RenderLoop<S> {
    state: LoopState,
    pipeline: FramePipeline<S>,
    shutdown: watch::Receiver<bool>,
    commands: mpsc::Receiver<SessionCommand>,
}

fn second_ticker() -> Interval {
    let period = Duration::from_millis(TICK_INTERVAL_MS);
    let mut ticker = interval_at(Instant::now() + period, period);
    // Seconds missed under load are caught up, never stretched
    ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
    ticker
}

impl<S: LandmarkSource + 'static> RenderLoop<S> {
    async fn run(self) -> MonitorSnapshot {
        let Self {
            mut state,
            pipeline,
            mut shutdown,
            mut commands,
        } = self;

        let frame_interval = state.capture.frame_interval();
        let mut frames = interval(frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut closure_ticks = second_ticker();
        let mut session_ticks = second_ticker();

        let mut idle: Option<FramePipeline<S>> = Some(pipeline);
        let mut in_flight: Option<InFlight<S>> = None;

        loop {
            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                Some(command) = commands.recv() => {
                    if state.core.handle_command(command) {
                        session_ticks.reset();
                    }
                    state.publish(Vec::new());
                }
                _ = closure_ticks.tick() => {
                    if let Some(seconds) = state.core.tick_closure() {
                        debug!("Eyes closed for {}s", seconds);
                        state.publish(Vec::new());
                    }
                }
                _ = session_ticks.tick() => {
                    let events = state.core.tick_session();
                    state.publish(events);
                }
                (pipeline, fetched) = async {
                    match in_flight.as_mut() {
                        Some(fetch) => fetch.await,
                        None => std::future::pending().await,
                    }
                }, if in_flight.is_some() => {
                    in_flight = None;
                    idle = Some(pipeline);
                    if state.frame_done(fetched) {
                        closure_ticks.reset();
                    }
                    let backoff = state.backoff_frames();
                    if backoff > 0 {
                        frames.reset_after(frame_interval * (backoff + 1));
                    }
                }
                _ = frames.tick(), if idle.is_some() => {
                    if let Some(pipeline) = idle.take() {
                        in_flight = Some(Box::pin(pipeline.fetch()));
                    }
                }
            }
        }

        // A pending fetch owns the stream; dropping it stops the tracks
        drop(in_flight);
        if let Some(mut pipeline) = idle {
            pipeline.stream.release();
        }
        let snapshot = state.core.snapshot();
        info!(
            "Monitor stopped after {} frames, {} blinks",
            snapshot.frames_processed, snapshot.blink_count
        );
        snapshot
    }
}

/// Loop state that frame results and ticks update
struct LoopState {
    core: TrackerCore,
    overlay: Box<dyn FrameOverlay>,
    capture: CaptureConfig,
    snapshots: watch::Sender<MonitorSnapshot>,
    events: broadcast::Sender<MonitorEvent>,
    failure_streak: u32,
    resolution_warned: bool,
}

impl LoopState {
    /// Feed a finished fetch to the core; returns true when the eyes just closed
    fn frame_done(&mut self, fetched: Fetched) -> bool {
        let (frame, detections) = match fetched {
            Ok(fetched) => fetched,
            Err(e) => {
                self.frame_failed(&e);
                return false;
            }
        };
        self.check_resolution(&frame);

        let outcome = self.core.process_frame(&detections);
        match outcome.error {
            Some(e) => self.frame_failed(&e),
            None => self.failure_streak = 0,
        }

        let snapshot = self.core.snapshot();
        self.overlay.draw(&frame, &detections, &snapshot);
        self.publish(outcome.events);
        outcome.closed_now
    }

    fn frame_failed(&mut self, e: &Error) {
        self.core.record_failure();
        self.failure_streak = self.failure_streak.saturating_add(1);
        if self.failure_streak % self.capture.failure_log_every == 0 {
            error!("{} consecutive frame failures, latest: {}", self.failure_streak, e);
        } else {
            warn!("Frame failed, retrying: {}", e);
        }
    }

    /// Extra frame intervals to wait during a failure streak
    fn backoff_frames(&self) -> u32 {
        (self.failure_streak / self.capture.failure_log_every).min(MAX_FAILURE_BACKOFF_FRAMES)
    }

    fn check_resolution(&mut self, frame: &VideoFrame) {
        if !self.resolution_warned && (frame.width != self.capture.width || frame.height != self.capture.height) {
            warn!(
                "Frame is {}x{} but thresholds assume {}x{}; eye state may be off",
                frame.width, frame.height, self.capture.width, self.capture.height
            );
            self.resolution_warned = true;
        }
    }

    fn publish(&mut self, events: Vec<MonitorEvent>) {
        for event in events {
            // No subscribers is fine
            let _ = self.events.send(event);
        }
        self.snapshots.send_replace(self.core.snapshot());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::Point;

    fn face(gap: f32) -> FrameDetection {
        let lid = |y: f32| (0..9).map(|i| Point::new(i as f32, y)).collect::<Vec<_>>();
        FrameDetection {
            right_upper_lid: lid(100.0),
            right_lower_lid: lid(100.0 + gap),
            left_upper_lid: lid(100.0),
            left_lower_lid: lid(100.0 + gap),
        }
    }

    #[test]
    fn test_eye_rest_mode_has_no_focus_state() {
        let core = TrackerCore::new(&Config::default(), MonitorMode::EyeRest);
        let snapshot = core.snapshot();
        assert!(snapshot.focus.is_none());
        assert!(snapshot.progress.is_none());
        assert!(snapshot.session.is_none());
    }

    #[test]
    fn test_eye_rest_mode_never_awards() {
        let mut core = TrackerCore::new(&Config::default(), MonitorMode::EyeRest);
        core.process_frame(&[face(2.0)]);
        for _ in 0..10 {
            core.tick_closure();
        }
        let outcome = core.process_frame(&[face(12.0)]);
        assert_eq!(
            outcome.events,
            vec![MonitorEvent::EyesOpened {
                closed_seconds: 10,
                blink_count: 1
            }]
        );
    }

    #[test]
    fn test_focus_mode_awards_eye_rest() {
        let mut core = TrackerCore::new(&Config::default(), MonitorMode::Focus);
        assert!(core.process_frame(&[face(2.0)]).closed_now);
        for _ in 0..3 {
            core.tick_closure();
        }
        let outcome = core.process_frame(&[face(12.0)]);
        assert!(outcome
            .events
            .iter()
            .any(|e| matches!(e, MonitorEvent::Award(a) if a.points == 2)));
        assert_eq!(core.snapshot().progress.map(|p| p.xp), Some(2));
    }

    #[test]
    fn test_rewards_can_be_disabled() {
        let mut config = Config::default();
        config.rewards.enabled = false;
        let mut core = TrackerCore::new(&config, MonitorMode::Focus);
        core.process_frame(&[face(2.0)]);
        for _ in 0..6 {
            core.tick_closure();
        }
        let outcome = core.process_frame(&[face(12.0)]);
        assert!(!outcome.events.iter().any(|e| matches!(e, MonitorEvent::Award(_))));
    }

    #[test]
    fn test_face_presence_events() {
        let mut core = TrackerCore::new(&Config::default(), MonitorMode::Focus);
        assert!(core.process_frame(&[face(12.0)]).events.is_empty());
        assert_eq!(core.process_frame(&[]).events, vec![MonitorEvent::FaceLost]);
        assert!(core.process_frame(&[]).events.is_empty());
        assert_eq!(core.process_frame(&[face(12.0)]).events, vec![MonitorEvent::FaceFound]);
    }

    #[test]
    fn test_snapshot_carries_gaps_of_face_in_view() {
        let mut core = TrackerCore::new(&Config::default(), MonitorMode::EyeRest);
        core.process_frame(&[face(5.0)]);
        let gaps = core.snapshot().eye_gaps.unwrap();
        assert_eq!((gaps.right, gaps.left), (5.0, 5.0));

        core.process_frame(&[]);
        assert!(core.snapshot().eye_gaps.is_none());
        assert!(core.snapshot().eyes_closed);
    }

    #[test]
    fn test_invalid_detection_still_counts_face() {
        let mut core = TrackerCore::new(&Config::default(), MonitorMode::Focus);
        core.process_frame(&[]);
        let outcome = core.process_frame(&[FrameDetection::default()]);
        assert!(matches!(outcome.error, Some(Error::InvalidDetection(_))));
        assert_eq!(outcome.events, vec![MonitorEvent::FaceFound]);
        assert_eq!(core.snapshot().focus.map(|f| f.focus_level), Some(97));
    }

    #[test]
    fn test_work_period_completion() {
        let mut config = Config::default();
        config.session.work_minutes = 1;
        let mut core = TrackerCore::new(&config, MonitorMode::Focus);
        assert!(core.handle_command(SessionCommand::Start));
        assert!(!core.handle_command(SessionCommand::Start));

        // four faceless frames: focus 80, four distractions
        for _ in 0..4 {
            core.process_frame(&[]);
        }
        let mut events = Vec::new();
        for _ in 0..60 {
            events.extend(core.tick_session());
        }
        let award = events
            .iter()
            .find_map(|e| match e {
                MonitorEvent::Award(a) => Some(a.clone()),
                _ => None,
            })
            .expect("session award");
        // 50 + 80/10 - 4/2
        assert_eq!(award.points, 56);
        let summary = events
            .iter()
            .find_map(|e| match e {
                MonitorEvent::SessionCompleted(s) => Some(s.clone()),
                _ => None,
            })
            .expect("session summary");
        assert_eq!(summary.mode, SessionMode::Work);
        assert_eq!(summary.focus_level, 80);
        assert_eq!(summary.distraction_count, 4);
        assert_eq!(summary.xp_earned, 56);

        let snapshot = core.snapshot();
        assert_eq!(snapshot.focus.map(|f| f.focus_level), Some(100));
        assert_eq!(snapshot.progress.map(|p| p.streak), Some(1));
        assert_eq!(snapshot.session.map(|s| s.mode), Some(SessionMode::ShortBreak));
    }

    #[test]
    fn test_commands_ignored_in_eye_rest_mode() {
        let mut core = TrackerCore::new(&Config::default(), MonitorMode::EyeRest);
        assert!(!core.handle_command(SessionCommand::Start));
        assert!(core.tick_session().is_empty());
    }

    #[test]
    fn test_with_progress_resumes_level() {
        let core = TrackerCore::new(&Config::default(), MonitorMode::Focus)
            .with_progress(Progress::with_xp(2500, 7));
        let progress = core.snapshot().progress.unwrap();
        assert_eq!(progress.level, 3);
        assert_eq!(progress.streak, 7);
    }
}
