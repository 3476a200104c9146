use crate::VideoError;
use pose_base::Vec2;

/// RGBA8
pub const BYTES_PER_PIXEL: usize = 4;

/// Fixed-size RGBA8 pixel buffer, allocated once and overwritten in place.
#[derive(Clone, PartialEq)]
pub struct FrameBuffer {
    size: Vec2<usize>,
    data: Vec<u8>,
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("size", &self.size)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl FrameBuffer {
    pub fn new(size: Vec2<usize>) -> Self {
        Self {
            size,
            data: vec![0u8; size.area() * BYTES_PER_PIXEL],
        }
    }

    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    /// Row stride in bytes.
    pub fn stride(&self) -> usize {
        self.size.x * BYTES_PER_PIXEL
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Overwrite the whole buffer; `pixels` must match its length exactly.
    pub fn copy_from(&mut self, pixels: &[u8]) -> Result<(), VideoError> {
        if pixels.len() != self.data.len() {
            return Err(VideoError::Stream(format!(
                "frame is {} bytes, buffer expects {} ({}x{} RGBA)",
                pixels.len(),
                self.data.len(),
                self.size.x,
                self.size.y
            )));
        }
        self.data.copy_from_slice(pixels);
        Ok(())
    }
}
