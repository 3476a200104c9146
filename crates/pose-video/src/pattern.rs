//! Synthetic capture backend.
//!
//! Produces a moving gradient so the pipeline can run on machines without a
//! camera. Like a real device it reports no size until a warm-up period has
//! passed.

use crate::{
    BYTES_PER_PIXEL, CaptureBackend, CaptureConfig, DeviceInfo, FrameBuffer, FrameSource,
    VideoError,
};
use pose_base::Vec2;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct PatternBackend {
    device_count: usize,
    warmup: Duration,
}

impl Default for PatternBackend {
    fn default() -> Self {
        Self {
            device_count: 1,
            warmup: Duration::ZERO,
        }
    }
}

impl PatternBackend {
    pub fn new(device_count: usize) -> Self {
        Self {
            device_count,
            ..Self::default()
        }
    }

    /// Time after opening during which the source reports size `(0, 0)`.
    pub fn with_warmup(mut self, warmup: Duration) -> Self {
        self.warmup = warmup;
        self
    }
}

impl CaptureBackend for PatternBackend {
    fn name(&self) -> &str {
        "pattern"
    }

    fn devices(&self) -> Result<Vec<DeviceInfo>, VideoError> {
        Ok((0..self.device_count)
            .map(|index| DeviceInfo {
                index,
                name: format!("pattern-{index}"),
                path: None,
            })
            .collect())
    }

    fn open(
        &self,
        device: &DeviceInfo,
        config: &CaptureConfig,
    ) -> Result<Box<dyn FrameSource>, VideoError> {
        if device.index >= self.device_count {
            return Err(VideoError::Device(format!("no pattern device {}", device.index)));
        }
        Ok(Box::new(PatternSource::new(
            Vec2::new(config.width() as usize, config.height() as usize),
            self.warmup,
        )))
    }
}

#[derive(Debug)]
pub struct PatternSource {
    size: Vec2<usize>,
    opened_at: Instant,
    warmup: Duration,
    frame_index: u64,
    stopped: bool,
}

impl PatternSource {
    pub fn new(size: Vec2<usize>, warmup: Duration) -> Self {
        Self {
            size,
            opened_at: Instant::now(),
            warmup,
            frame_index: 0,
            stopped: false,
        }
    }

    fn ready(&self) -> bool {
        self.opened_at.elapsed() >= self.warmup
    }

    /// Number of frames produced so far.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

impl FrameSource for PatternSource {
    fn size(&self) -> Vec2<usize> {
        if self.ready() { self.size } else { Vec2::zero() }
    }

    fn read_into(&mut self, buffer: &mut FrameBuffer) -> Result<bool, VideoError> {
        if self.stopped {
            return Err(VideoError::Stream("pattern source stopped".to_string()));
        }
        if !self.ready() {
            return Ok(false);
        }
        if buffer.size() != self.size {
            return Err(VideoError::Stream(format!(
                "buffer is {:?}, source produces {:?}",
                buffer.size(),
                self.size
            )));
        }

        let shift = self.frame_index as usize;
        let width = self.size.x;
        for (i, pixel) in buffer.as_mut_slice().chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
            let x = i % width;
            let y = i / width;
            pixel[0] = ((x + shift) & 0xFF) as u8;
            pixel[1] = ((y + shift) & 0xFF) as u8;
            pixel[2] = ((x ^ y) & 0xFF) as u8;
            pixel[3] = 0xFF;
        }
        self.frame_index += 1;
        Ok(true)
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}
