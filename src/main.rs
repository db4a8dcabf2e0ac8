//! Eye/focus monitor driven by a recorded landmark stream.

use anyhow::{bail, Result};
use clap::Parser;
use eye_focus_monitor::{
    camera::SyntheticCamera,
    config::{Config, EXAMPLE_CONFIG},
    landmarks::ReplaySource,
    monitor::{Monitor, MonitorEvent, MonitorMode, SessionCommand},
    overlay::LogOverlay,
    sink::{AwardSink, JsonLinesSink},
    utils::{format_clock, parse_durations},
};
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON-lines landmark recording to replay
    #[arg(short, long, required_unless_present = "print_config")]
    replay: Option<String>,

    /// Monitor mode (eye-rest, focus)
    #[arg(short, long, default_value = "focus")]
    mode: String,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Stop after this many processed frames (otherwise run until Ctrl-C)
    #[arg(short, long)]
    frames: Option<u64>,

    /// Append awards and session summaries to this JSON-lines file
    #[arg(short, long)]
    awards: Option<String>,

    /// Start the pomodoro clock right away (focus mode)
    #[arg(long)]
    start_session: bool,

    /// Pomodoro durations in minutes as work/short/long, e.g. 50/10/30
    #[arg(long)]
    durations: Option<String>,

    /// Play the recording once instead of looping it
    #[arg(long)]
    once: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_config: bool,
}

fn parse_mode(mode: &str) -> Result<MonitorMode> {
    match mode {
        "eye-rest" | "eyerest" => Ok(MonitorMode::EyeRest),
        "focus" => Ok(MonitorMode::Focus),
        other => bail!("Unknown mode '{other}', expected eye-rest or focus"),
    }
}

fn forward_event(event: &MonitorEvent, sink: Option<&dyn AwardSink>) {
    match event {
        MonitorEvent::EyesOpened {
            closed_seconds,
            blink_count,
        } => info!("Blink #{} after {}s closed", blink_count, closed_seconds),
        MonitorEvent::FaceLost => info!("Face lost"),
        MonitorEvent::FaceFound => info!("Face back in view"),
        MonitorEvent::LevelUp { level } => info!("Reached level {}", level),
        MonitorEvent::Award(award) => {
            info!("+{} XP ({:?})", award.points, award.reason);
            if let Some(sink) = sink {
                if let Err(e) = sink.record_award(award) {
                    warn!("Failed to record award: {}", e);
                }
            }
        }
        MonitorEvent::SessionCompleted(summary) => {
            info!(
                "{:?} period done: focus {}, {} distractions, {} XP",
                summary.mode, summary.focus_level, summary.distraction_count, summary.xp_earned
            );
            if let Some(sink) = sink {
                if let Err(e) = sink.record_session(summary) {
                    warn!("Failed to record session: {}", e);
                }
            }
        }
        MonitorEvent::EyesClosed => {}
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Eye/Focus Monitor");

    // Load configuration if provided
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };
    if let Some(durations) = &args.durations {
        config.session = parse_durations(durations)?.clamped();
    }

    let mode = parse_mode(&args.mode)?;
    let Some(replay_path) = args.replay else {
        bail!("--replay is required");
    };
    let mut source = ReplaySource::from_file(&replay_path)?;
    if args.once {
        source = source.once();
    }
    info!("Replaying {} recorded frames from {}", source.len(), replay_path);

    let sink: Option<Arc<dyn AwardSink>> = match &args.awards {
        Some(path) => Some(Arc::new(JsonLinesSink::open(path)?)),
        None => None,
    };

    let mut camera = SyntheticCamera::new();
    let overlay_every = 1000 / config.capture.frame_interval_ms.max(1);
    let handle = Monitor::new(config, mode, source)?
        .with_overlay(Box::new(LogOverlay::new(overlay_every)))
        .start(&mut camera)
        .await?;

    let mut events = handle.subscribe();
    let forwarder = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => forward_event(&event, sink.as_deref()),
                Err(RecvError::Lagged(skipped)) => warn!("Dropped {} monitor events", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });

    if args.start_session {
        handle.command(SessionCommand::Start).await?;
    }

    let mut snapshots = handle.watch();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let processed = snapshots.borrow_and_update().frames_processed;
                if args.frames.is_some_and(|limit| processed >= limit) {
                    break;
                }
            }
        }
    }

    let last = handle.stop().await?;
    if forwarder.await.is_err() {
        warn!("Event forwarder exited abnormally");
    }

    if let Some(session) = &last.session {
        info!(
            "{:?} {} remaining, {} work periods done",
            session.mode,
            format_clock(session.remaining_seconds),
            session.cycle_count
        );
    }
    println!("{}", serde_json::to_string_pretty(&last)?);

    Ok(())
}
