#![allow(dead_code)]

use pose_base::Vec2;
use pose_graph::{
    Engine, EngineSetup, GraphError, ImageFormat, ImageFrame, InputPacket, LandmarkList,
    OutputPacket, Packet, StreamNames, fixed_pose,
};
use pose_pipeline::PipelineConfig;
use pose_video::{CaptureBackend, CaptureConfig, DeviceInfo, FrameBuffer, FrameSource, VideoError};
use std::cell::Cell;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const GRAPH: &str = r#"# pose tracking, CPU
input_stream: "input_video"
output_stream: "output_video"
output_stream: "pose_landmarks"

node {
  calculator: "PoseLandmarkCpu"
  input_stream: "IMAGE:input_video"
  output_stream: "LANDMARKS:pose_landmarks"
}
node {
  calculator: "AnnotationOverlayCalculator"
  input_stream: "IMAGE:input_video"
  output_stream: "IMAGE:output_video"
}
"#;

/// Shared, ordered record of what the mocks were asked to do.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, call: impl Into<String>) {
        self.0.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn position(&self, call: &str) -> Option<usize> {
        self.calls().iter().position(|c| c == call)
    }

    pub fn contains(&self, call: &str) -> bool {
        self.position(call).is_some()
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }
}

/// Backend whose single source reports `size` and produces `frames` frames.
pub struct MockBackend {
    pub device_count: usize,
    pub size: Vec2<usize>,
    pub frames: usize,
    pub log: CallLog,
    pub opened: Cell<usize>,
}

impl MockBackend {
    pub fn new(log: &CallLog) -> Self {
        Self {
            device_count: 1,
            size: Vec2::new(64, 48),
            frames: usize::MAX,
            log: log.clone(),
            opened: Cell::new(0),
        }
    }
}

impl CaptureBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn devices(&self) -> Result<Vec<DeviceInfo>, VideoError> {
        Ok((0..self.device_count)
            .map(|index| DeviceInfo {
                index,
                name: format!("mock-{index}"),
                path: None,
            })
            .collect())
    }

    fn open(
        &self,
        _device: &DeviceInfo,
        _config: &CaptureConfig,
    ) -> Result<Box<dyn FrameSource>, VideoError> {
        self.opened.set(self.opened.get() + 1);
        self.log.push("source.open");
        Ok(Box::new(MockSource {
            size: self.size,
            remaining: self.frames,
            produced: 0,
            log: self.log.clone(),
        }))
    }
}

/// Fills every pixel with the frame number.
pub struct MockSource {
    size: Vec2<usize>,
    remaining: usize,
    produced: u8,
    log: CallLog,
}

impl FrameSource for MockSource {
    fn size(&self) -> Vec2<usize> {
        self.size
    }

    fn read_into(&mut self, buffer: &mut FrameBuffer) -> Result<bool, VideoError> {
        if self.remaining == 0 {
            return Ok(false);
        }
        self.remaining -= 1;
        self.produced = self.produced.wrapping_add(1);
        buffer.as_mut_slice().fill(self.produced);
        Ok(true)
    }

    fn stop(&mut self) {
        self.log.push("source.stop");
    }
}

/// Engine that answers every submitted frame synchronously: the image is
/// echoed on the video stream and `landmarks` go out on the landmark stream.
pub struct StubEngine {
    pub streams: StreamNames,
    pub landmarks: LandmarkList,
    /// Replaces the echoed image with a blank one of this size.
    pub image_size: Option<Vec2<usize>>,
    pub fail_start: bool,
    log: CallLog,
    outputs: HashMap<String, VecDeque<OutputPacket>>,
}

impl StubEngine {
    pub fn new(log: &CallLog) -> Self {
        Self {
            streams: StreamNames::default(),
            landmarks: fixed_pose(),
            image_size: None,
            fail_start: false,
            log: log.clone(),
            outputs: HashMap::new(),
        }
    }

    pub fn with_landmarks(mut self, landmarks: LandmarkList) -> Self {
        self.landmarks = landmarks;
        self
    }

    fn queue(&mut self, stream: &str, packet: OutputPacket) {
        if let Some(queue) = self.outputs.get_mut(stream) {
            queue.push_back(packet);
        }
    }
}

impl Engine for StubEngine {
    fn observe(&mut self, stream: &str) -> Result<(), GraphError> {
        self.log.push(format!("observe {stream}"));
        self.outputs.insert(stream.to_string(), VecDeque::new());
        Ok(())
    }

    fn start(&mut self) -> Result<(), GraphError> {
        self.log.push("start");
        if self.fail_start {
            return Err(GraphError::Engine("calculator failed to open".to_string()));
        }
        Ok(())
    }

    fn submit(&mut self, stream: &str, packet: InputPacket) -> Result<(), GraphError> {
        self.log.push(format!("submit {stream}"));
        let Packet { timestamp, mut value } = packet;
        if let Some(size) = self.image_size {
            let blank = vec![0; size.area() * 4];
            value = ImageFrame::from_pixels(ImageFormat::Srgba, size, &blank)?;
        }
        let landmarks = self.landmarks.clone();
        let video = self.streams.output_video.clone();
        let landmark_stream = self.streams.landmarks.clone();
        self.queue(&video, OutputPacket::Image(Packet::new(value, timestamp)));
        self.queue(
            &landmark_stream,
            OutputPacket::Landmarks(Packet::new(landmarks, timestamp)),
        );
        Ok(())
    }

    fn poll_next(&mut self, stream: &str) -> Result<Option<OutputPacket>, GraphError> {
        let queue = self
            .outputs
            .get_mut(stream)
            .ok_or_else(|| GraphError::UnknownStream(stream.to_string()))?;
        Ok(queue.pop_front())
    }

    fn close_input(&mut self, stream: &str) -> Result<(), GraphError> {
        self.log.push(format!("close {stream}"));
        Ok(())
    }

    fn wait_until_done(&mut self) -> Result<(), GraphError> {
        self.log.push("wait");
        Ok(())
    }
}

impl Drop for StubEngine {
    fn drop(&mut self) {
        self.log.push("engine.drop");
    }
}

pub fn factory(
    engine: StubEngine,
    log: &CallLog,
) -> impl FnOnce(EngineSetup) -> Result<StubEngine, GraphError> {
    let log = log.clone();
    move |setup| {
        log.push(format!("engine.create assets={}", setup.assets.len()));
        Ok(engine)
    }
}

/// Directory holding a graph file and the default model assets.
pub struct Fixture {
    pub dir: PathBuf,
}

impl Fixture {
    pub fn new(name: &str) -> Self {
        Self::with_graph(name, GRAPH)
    }

    pub fn with_graph(name: &str, graph: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "pose-pipeline-{}-{}",
            std::process::id(),
            name
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("assets")).unwrap();
        std::fs::write(dir.join("pose.pbtxt"), graph).unwrap();
        for asset in pose_graph::DEFAULT_ASSETS {
            std::fs::write(dir.join("assets").join(asset), b"model").unwrap();
        }
        Self { dir }
    }

    pub fn config(&self) -> PipelineConfig {
        PipelineConfig::default()
            .with_size(64, 48)
            .with_graph_path(self.dir.join("pose.pbtxt"))
            .with_asset_dir(self.dir.join("assets"))
            .with_size_timeout(Duration::from_millis(200))
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}
