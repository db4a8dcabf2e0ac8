//! Error handling tests for all modules


use eye_focus_monitor::{
    camera::{Camera, CameraStream, SyntheticCamera},
    config::EyeConfig,
    eye_state::{eye_gaps, EyeStateEvaluator},
    landmarks::{FrameDetection, LandmarkSource, Point, ReplaySource},
    monitor::{MonitorMode, SessionCommand, TrackerCore},
    sink::{AwardSink, JsonLinesSink},
    utils::parse_durations,
    Error,
};
use test_helpers::{face, lid};

#[test]
fn test_replay_parse_errors() {
    // Empty recording
    let result = ReplaySource::new(Vec::new());
    assert!(matches!(result, Err(Error::InvalidInput(_))));

    // Bad line reports its number
    let content = "[]\n\n[{\"right_upper_lid\": 5}]\n";
    match ReplaySource::parse(content) {
        Err(Error::InvalidInput(msg)) => assert!(msg.contains("line 3"), "{msg}"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }

    // Blank lines are skipped
    let frames = ReplaySource::parse("[]\n   \n[]\n").unwrap();
    assert_eq!(frames.len(), 2);
}

#[test]
fn test_replay_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = ReplaySource::from_file(dir.path().join("none.jsonl"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_short_contour_is_invalid_detection() {
    let mut detection = face(12.0);
    detection.left_lower_lid = vec![Point::new(0.0, 0.0); 3];

    match eye_gaps(&detection, 3, 4) {
        Err(Error::InvalidDetection(msg)) => assert!(msg.contains("left lower lid")),
        other => panic!("Expected InvalidDetection, got {other:?}"),
    }
}

#[test]
fn test_invalid_detection_keeps_previous_state() {
    let mut evaluator = EyeStateEvaluator::new(EyeConfig::default());
    evaluator.evaluate(&[face(2.0)]).unwrap();
    assert!(evaluator.is_closed());

    let broken = FrameDetection {
        right_upper_lid: lid(0.0),
        ..FrameDetection::default()
    };
    let result = evaluator.evaluate(&[broken]);
    assert!(result.unwrap_err().is_frame_recoverable());
    assert!(evaluator.is_closed());
}

#[test]
fn test_tracker_reports_but_survives_invalid_detection() {
    let mut core = TrackerCore::new(&Default::default(), MonitorMode::EyeRest);
    let outcome = core.process_frame(&[FrameDetection::default()]);
    assert!(matches!(outcome.error, Some(Error::InvalidDetection(_))));

    let outcome = core.process_frame(&[face(2.0)]);
    assert!(outcome.error.is_none());
    assert!(outcome.closed_now);
}

#[test]
fn test_session_commands_without_focus_mode() {
    let mut core = TrackerCore::new(&Default::default(), MonitorMode::EyeRest);
    assert!(!core.handle_command(SessionCommand::Start));
    assert!(core.snapshot().session.is_none());
}

#[tokio::test]
async fn test_camera_errors() {
    let mut camera = SyntheticCamera::new();
    assert!(matches!(camera.open(0, 480).await, Err(Error::Camera(_))));

    let mut denied = SyntheticCamera::new().denying_permission();
    let err = denied.open(640, 480).await.err().unwrap();
    assert!(matches!(err, Error::CameraPermission(_)));
    assert!(!err.is_frame_recoverable());
}

#[tokio::test]
async fn test_stopped_stream_errors() {
    let mut camera = SyntheticCamera::new();
    let mut stream = camera.open(640, 480).await.unwrap();
    stream.stop();
    stream.stop();
    assert_eq!(camera.live_tracks(), 0);
    assert!(matches!(stream.next_frame().await, Err(Error::Camera(_))));
}

#[tokio::test]
async fn test_exhausted_replay_reports_no_face() {
    let mut source = ReplaySource::new(vec![vec![face(12.0)]]).unwrap().once();
    let frame = eye_focus_monitor::camera::VideoFrame::blank(0, 640, 480);
    assert_eq!(source.estimate_faces(&frame).await.unwrap().len(), 1);
    assert!(source.estimate_faces(&frame).await.unwrap().is_empty());
    assert!(source.estimate_faces(&frame).await.unwrap().is_empty());
}

#[test]
fn test_sink_path_errors() {
    let dir = tempfile::tempdir().unwrap();
    // A directory cannot be opened for appending
    let result = JsonLinesSink::open(dir.path());
    assert!(matches!(result, Err(Error::Io(_))));

    let sink = JsonLinesSink::open(dir.path().join("ok.jsonl")).unwrap();
    let award = eye_focus_monitor::rewards::ExperienceAward::new(
        2,
        eye_focus_monitor::rewards::AwardReason::EyeRest { closed_seconds: 3 },
    );
    assert!(sink.record_award(&award).is_ok());
}

#[test]
fn test_duration_parse_errors() {
    assert!(matches!(parse_durations("25-5-15"), Err(Error::InvalidInput(_))));
    assert!(matches!(parse_durations("25/5/15/30"), Err(Error::InvalidInput(_))));
    assert!(parse_durations("25/5/15").is_ok());
}
