use pose_graph::GraphError;
use pose_video::VideoError;
use std::fmt;
use std::time::Duration;

#[derive(Debug)]
pub enum PipelineError {
    /// Configuration file missing or malformed.
    Config(String),
    /// No capture device, or the configured one could not be opened.
    Open(VideoError),
    /// Capture failed while reading a frame.
    Video(VideoError),
    /// The device never reported a usable frame size.
    SizeTimeout(Duration),
    /// Graph description, assets or engine could not be set up.
    Engine(GraphError),
    Submit(GraphError),
    Poll(GraphError),
    Present(String),
    /// Closing or draining the engine failed during teardown.
    Teardown(GraphError),
    NotStarted,
}

impl PipelineError {
    /// True for failures that happen before the first tick.
    pub fn is_initialization(&self) -> bool {
        matches!(
            self,
            PipelineError::Config(_)
                | PipelineError::Open(_)
                | PipelineError::SizeTimeout(_)
                | PipelineError::Engine(_)
        )
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Config(msg) => write!(f, "config error: {msg}"),
            PipelineError::Open(err) => write!(f, "cannot open capture device: {err}"),
            PipelineError::Video(err) => write!(f, "capture failed: {err}"),
            PipelineError::SizeTimeout(waited) => {
                write!(f, "capture device reported no frame size within {waited:?}")
            }
            PipelineError::Engine(err) => write!(f, "engine setup failed: {err}"),
            PipelineError::Submit(err) => write!(f, "submit failed: {err}"),
            PipelineError::Poll(err) => write!(f, "poll failed: {err}"),
            PipelineError::Present(msg) => write!(f, "present failed: {msg}"),
            PipelineError::Teardown(err) => write!(f, "teardown failed: {err}"),
            PipelineError::NotStarted => write!(f, "pipeline not started"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Open(err) | PipelineError::Video(err) => Some(err),
            PipelineError::Engine(err)
            | PipelineError::Submit(err)
            | PipelineError::Poll(err)
            | PipelineError::Teardown(err) => Some(err),
            _ => None,
        }
    }
}

impl From<VideoError> for PipelineError {
    fn from(err: VideoError) -> Self {
        PipelineError::Video(err)
    }
}
