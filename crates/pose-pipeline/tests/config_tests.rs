use pose_graph::{DEFAULT_ASSETS, POSE_LANDMARK_COUNT, StreamNames};
use pose_pipeline::{
    DEFAULT_LANDMARK_RANGE, LandmarkRange, PipelineConfig, PipelineError, ScreenOrigin,
};
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_defaults() {
    let config = PipelineConfig::default();
    assert_eq!((config.width, config.height, config.fps), (640, 480, 30));
    assert_eq!(config.device_index, 0);
    assert_eq!(config.streams, StreamNames::default());
    assert_eq!(config.assets, DEFAULT_ASSETS.to_vec());
    assert_eq!(config.landmark_range, DEFAULT_LANDMARK_RANGE);
    assert_eq!(config.landmark_range, LandmarkRange::new(1, 32));
    assert_eq!(config.screen_origin, ScreenOrigin::TopLeft);
    assert_eq!(config.size_timeout(), Duration::from_secs(5));
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_json_keeps_defaults() {
    let config = PipelineConfig::from_json(
        r#"{
            "width": 1280,
            "height": 720,
            "graph_path": "graphs/upper_body.pbtxt",
            "screen_origin": "bottom_left",
            "streams": { "landmarks": "pose_landmarks_smoothed" }
        }"#,
    )
    .unwrap();
    assert_eq!((config.width, config.height), (1280, 720));
    assert_eq!(config.fps, 30);
    assert_eq!(config.graph_path, PathBuf::from("graphs/upper_body.pbtxt"));
    assert_eq!(config.screen_origin, ScreenOrigin::BottomLeft);
    assert_eq!(config.streams.landmarks, "pose_landmarks_smoothed");
    assert_eq!(config.streams.input, "input_video");
}

#[test]
fn test_landmark_range_from_json() {
    let config =
        PipelineConfig::from_json(r#"{ "landmark_range": { "first": 11, "last": 24 } }"#).unwrap();
    assert_eq!(config.landmark_range, LandmarkRange::new(11, 24));
    assert_eq!(config.landmark_range.len(), 14);
    assert!(config.landmark_range.contains(11));
    assert!(!config.landmark_range.contains(25));
}

#[test]
fn test_rejects_invalid_values() {
    for json in [
        r#"{ "width": 0 }"#,
        r#"{ "fps": 0 }"#,
        r#"{ "landmark_range": { "first": 5, "last": 2 } }"#,
        r#"{ "screen_origin": "center" }"#,
        "not json",
    ] {
        assert!(
            matches!(PipelineConfig::from_json(json), Err(PipelineError::Config(_))),
            "{json}"
        );
    }
}

#[test]
fn test_landmark_range_past_pose_is_rejected() {
    for json in [
        r#"{ "landmark_range": { "first": 1, "last": 33 } }"#,
        r#"{ "landmark_range": { "first": 1, "last": 1000000000000 } }"#,
        r#"{ "landmark_range": { "first": 0, "last": 18446744073709551615 } }"#,
    ] {
        match PipelineConfig::from_json(json) {
            Err(PipelineError::Config(msg)) => assert!(msg.contains("landmark range"), "{msg}"),
            other => panic!("{json}: unexpected {other:?}"),
        }
    }

    let widest = LandmarkRange::new(0, POSE_LANDMARK_COUNT - 1);
    let config = PipelineConfig::default().with_landmark_range(widest);
    assert!(config.validate().is_ok());
    assert!(
        config
            .with_landmark_range(LandmarkRange::new(0, POSE_LANDMARK_COUNT))
            .validate()
            .is_err()
    );
}

#[test]
fn test_missing_file() {
    let path = std::env::temp_dir().join("pose-pipeline-no-such-config.json");
    match PipelineConfig::from_json_file(&path) {
        Err(PipelineError::Config(msg)) => assert!(msg.contains("no-such-config")),
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn test_json_file_round_trip() {
    let path = std::env::temp_dir().join(format!("pose-pipeline-{}.json", std::process::id()));
    let config = PipelineConfig::default()
        .with_device_index(2)
        .with_fps(60)
        .with_screen_origin(ScreenOrigin::BottomLeft);
    std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

    let loaded = PipelineConfig::from_json_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_capture_config() {
    let capture = PipelineConfig::default()
        .with_device_index(1)
        .with_size(320, 240)
        .with_fps(15)
        .capture();
    assert_eq!(capture.device_index(), 1);
    assert_eq!((capture.width(), capture.height()), (320, 240));
    assert_eq!(capture.fps(), 15);
    assert_eq!(capture.buffer_count(), 4);
}
