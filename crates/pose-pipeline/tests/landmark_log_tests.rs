// Installs a process-wide logger, so it lives in its own test binary.

use log::{Level, LevelFilter, Log, Metadata, Record};
use pose_base::{Origin, Rect, Vec2};
use pose_graph::{Packet, Timestamp, fixed_pose};
use pose_pipeline::{DEFAULT_LANDMARK_RANGE, Presenter};
use std::sync::Mutex;

struct CaptureLogger {
    lines: Mutex<Vec<(Level, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.lines
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    lines: Mutex::new(Vec::new()),
};

#[test]
fn test_logs_exactly_32_landmarks() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let mut presenter = Presenter::new(
        Vec2::new(640, 480),
        Rect::from_pixels(Vec2::new(640, 480)),
        Origin::TopLeft,
        DEFAULT_LANDMARK_RANGE,
    );
    presenter
        .present_landmarks(&Packet::new(fixed_pose(), Timestamp::from_micros(42)))
        .unwrap();

    let lines = LOGGER.lines.lock().unwrap();
    let landmarks: Vec<&String> = lines
        .iter()
        .filter(|(level, line)| *level == Level::Info && line.starts_with("landmark "))
        .map(|(_, line)| line)
        .collect();
    assert_eq!(landmarks.len(), 32);
    assert!(landmarks[0].starts_with("landmark 1 at 42us: ("));
    assert!(landmarks[31].starts_with("landmark 32 at 42us: ("));
    assert!(!lines.iter().any(|(_, line)| line.starts_with("landmark 0 ")));
}
