use crate::{DEFAULT_LANDMARK_RANGE, LandmarkRange, PipelineError};
use pose_base::Origin;
use pose_graph::{DEFAULT_ASSETS, POSE_LANDMARK_COUNT, StreamNames};
use pose_video::CaptureConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where landmark y coordinates start on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenOrigin {
    #[default]
    TopLeft,
    BottomLeft,
}

impl From<ScreenOrigin> for Origin {
    fn from(origin: ScreenOrigin) -> Self {
        match origin {
            ScreenOrigin::TopLeft => Origin::TopLeft,
            ScreenOrigin::BottomLeft => Origin::BottomLeft,
        }
    }
}

/// Everything the pipeline needs to start.
///
/// Every field has a default, so a JSON file only has to name what differs:
///
/// ```json
/// { "width": 1280, "height": 720, "graph_path": "graphs/pose_tracking.pbtxt" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub device_index: usize,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub buffer_count: u32,
    pub streams: StreamNames,
    pub graph_path: PathBuf,
    pub asset_dir: PathBuf,
    pub assets: Vec<String>,
    pub landmark_range: LandmarkRange,
    pub screen_origin: ScreenOrigin,
    /// How long `start` waits for the device to report a frame size.
    pub size_timeout_ms: u64,
    /// Sleep between frame size checks.
    pub size_poll_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            width: 640,
            height: 480,
            fps: 30,
            buffer_count: 4,
            streams: StreamNames::default(),
            graph_path: PathBuf::from("graphs/pose_tracking.pbtxt"),
            asset_dir: PathBuf::from("assets"),
            assets: DEFAULT_ASSETS.iter().map(|name| name.to_string()).collect(),
            landmark_range: DEFAULT_LANDMARK_RANGE,
            screen_origin: ScreenOrigin::TopLeft,
            size_timeout_ms: 5000,
            size_poll_ms: 10,
        }
    }
}

impl PipelineConfig {
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| PipelineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Reject settings the pipeline cannot run with.
    ///
    /// `landmark_range.last` must be below `POSE_LANDMARK_COUNT` (33), the
    /// size of every landmark list the graph produces.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.width == 0 || self.height == 0 {
            return Err(PipelineError::Config(format!(
                "frame size {}x{} is empty",
                self.width, self.height
            )));
        }
        if self.fps == 0 {
            return Err(PipelineError::Config("fps must be positive".to_string()));
        }
        if self.landmark_range.first > self.landmark_range.last {
            return Err(PipelineError::Config(format!(
                "landmark range {}..={} is empty",
                self.landmark_range.first, self.landmark_range.last
            )));
        }
        if self.landmark_range.last >= POSE_LANDMARK_COUNT {
            return Err(PipelineError::Config(format!(
                "landmark range ends at {}, pose has {} landmarks",
                self.landmark_range.last, POSE_LANDMARK_COUNT
            )));
        }
        Ok(())
    }

    pub fn with_device_index(mut self, device_index: usize) -> Self {
        self.device_index = device_index;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_graph_path(mut self, graph_path: impl Into<PathBuf>) -> Self {
        self.graph_path = graph_path.into();
        self
    }

    pub fn with_asset_dir(mut self, asset_dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = asset_dir.into();
        self
    }

    pub fn with_assets(mut self, assets: Vec<String>) -> Self {
        self.assets = assets;
        self
    }

    pub fn with_landmark_range(mut self, landmark_range: LandmarkRange) -> Self {
        self.landmark_range = landmark_range;
        self
    }

    pub fn with_screen_origin(mut self, screen_origin: ScreenOrigin) -> Self {
        self.screen_origin = screen_origin;
        self
    }

    pub fn with_size_timeout(mut self, timeout: Duration) -> Self {
        self.size_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn size_timeout(&self) -> Duration {
        Duration::from_millis(self.size_timeout_ms)
    }

    pub fn size_poll(&self) -> Duration {
        Duration::from_millis(self.size_poll_ms.max(1))
    }

    pub fn capture(&self) -> CaptureConfig {
        CaptureConfig::default()
            .with_device_index(self.device_index)
            .with_width(self.width)
            .with_height(self.height)
            .with_fps(self.fps)
            .with_buffer_count(self.buffer_count)
    }
}
