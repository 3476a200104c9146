/// Requested capture parameters. The device may negotiate something else;
/// [`FrameSource::size`](crate::FrameSource::size) reports what it settled on.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptureConfig {
    device_index: usize,
    width: u32,
    height: u32,
    fps: u32,
    buffer_count: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            width: 640,
            height: 480,
            fps: 30,
            buffer_count: 4,
        }
    }
}

impl CaptureConfig {
    /// Position of the device in the backend's enumeration order.
    pub fn with_device_index(mut self, device_index: usize) -> Self {
        self.device_index = device_index;
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Depth of the capture queue between the device thread and the reader.
    pub fn with_buffer_count(mut self, buffer_count: u32) -> Self {
        self.buffer_count = buffer_count;
        self
    }

    pub fn device_index(&self) -> usize {
        self.device_index
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn buffer_count(&self) -> u32 {
        self.buffer_count
    }
}
