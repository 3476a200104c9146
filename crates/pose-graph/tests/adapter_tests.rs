use pose_base::Vec2;
use pose_graph::{
    Engine, GraphError, ImageFormat, InputPacket, OutputPacket, StreamAdapter, Timestamp,
};

// Records every submitted packet
#[derive(Default)]
struct RecordingEngine {
    submitted: Vec<(String, InputPacket)>,
    fail_submit: bool,
}

impl Engine for RecordingEngine {
    fn observe(&mut self, _stream: &str) -> Result<(), GraphError> {
        Ok(())
    }

    fn start(&mut self) -> Result<(), GraphError> {
        Ok(())
    }

    fn submit(&mut self, stream: &str, packet: InputPacket) -> Result<(), GraphError> {
        if self.fail_submit {
            return Err(GraphError::Engine("queue full".to_string()));
        }
        self.submitted.push((stream.to_string(), packet));
        Ok(())
    }

    fn poll_next(&mut self, _stream: &str) -> Result<Option<OutputPacket>, GraphError> {
        Ok(None)
    }

    fn close_input(&mut self, _stream: &str) -> Result<(), GraphError> {
        Ok(())
    }

    fn wait_until_done(&mut self) -> Result<(), GraphError> {
        Ok(())
    }
}

fn ts(micros: i64) -> Timestamp {
    Timestamp::from_micros(micros)
}

#[test]
fn test_submit_builds_srgba_packet() {
    let mut engine = RecordingEngine::default();
    let mut adapter = StreamAdapter::new("input_video", Vec2::new(2, 1));
    adapter.submit(&mut engine, &[1, 2, 3, 4, 5, 6, 7, 8], ts(10)).unwrap();

    let (stream, packet) = &engine.submitted[0];
    assert_eq!(stream, "input_video");
    assert_eq!(packet.timestamp, ts(10));
    assert_eq!(packet.value.format, ImageFormat::Srgba);
    assert_eq!(packet.value.size, Vec2::new(2, 1));
    assert_eq!(packet.value.stride(), 8);
    assert_eq!(packet.value.data, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(adapter.last_timestamp(), Some(ts(10)));
}

#[test]
fn test_duplicate_timestamp_rejected() {
    let mut engine = RecordingEngine::default();
    let mut adapter = StreamAdapter::new("input_video", Vec2::new(1, 1));
    adapter.submit(&mut engine, &[0; 4], ts(5)).unwrap();

    assert_eq!(
        adapter.submit(&mut engine, &[0; 4], ts(5)),
        Err(GraphError::TimestampNotMonotonic {
            previous: ts(5),
            got: ts(5)
        })
    );
    assert_eq!(
        adapter.submit(&mut engine, &[0; 4], ts(4)),
        Err(GraphError::TimestampNotMonotonic {
            previous: ts(5),
            got: ts(4)
        })
    );
    assert_eq!(engine.submitted.len(), 1);

    adapter.submit(&mut engine, &[0; 4], ts(6)).unwrap();
    assert_eq!(engine.submitted.len(), 2);
}

#[test]
fn test_wrong_frame_size_rejected() {
    let mut engine = RecordingEngine::default();
    let mut adapter = StreamAdapter::new("input_video", Vec2::new(2, 2));
    assert_eq!(
        adapter.submit(&mut engine, &[0; 12], ts(1)),
        Err(GraphError::FrameSize {
            expected: 16,
            got: 12
        })
    );
    assert!(engine.submitted.is_empty());
    assert_eq!(adapter.last_timestamp(), None);
}

#[test]
fn test_engine_failure_propagates_without_advancing() {
    let mut engine = RecordingEngine {
        fail_submit: true,
        ..Default::default()
    };
    let mut adapter = StreamAdapter::new("input_video", Vec2::new(1, 1));
    assert!(matches!(
        adapter.submit(&mut engine, &[0; 4], ts(1)),
        Err(GraphError::Engine(_))
    ));
    assert_eq!(adapter.last_timestamp(), None);

    engine.fail_submit = false;
    adapter.submit(&mut engine, &[0; 4], ts(1)).unwrap();
}

#[test]
fn test_timestamp_display() {
    assert_eq!(ts(1500).to_string(), "1500us");
    assert!(ts(1) < ts(2));
}
