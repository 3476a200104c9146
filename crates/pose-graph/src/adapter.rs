use crate::{Engine, GraphError, ImageFormat, ImageFrame, Packet, Timestamp};
use pose_base::Vec2;

/// Turns raw RGBA buffers into input packets for one named stream.
///
/// Timestamps must be strictly increasing; a repeated or earlier timestamp
/// is rejected before anything reaches the engine.
#[derive(Debug)]
pub struct StreamAdapter {
    stream: String,
    size: Vec2<usize>,
    last: Option<Timestamp>,
}

impl StreamAdapter {
    pub fn new(stream: impl Into<String>, size: Vec2<usize>) -> Self {
        Self {
            stream: stream.into(),
            size,
            last: None,
        }
    }

    pub fn stream(&self) -> &str {
        &self.stream
    }

    /// Timestamp of the last packet the engine accepted.
    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.last
    }

    pub fn submit<E: Engine + ?Sized>(
        &mut self,
        engine: &mut E,
        pixels: &[u8],
        timestamp: Timestamp,
    ) -> Result<(), GraphError> {
        if let Some(previous) = self.last {
            if timestamp <= previous {
                return Err(GraphError::TimestampNotMonotonic {
                    previous,
                    got: timestamp,
                });
            }
        }
        let frame = ImageFrame::from_pixels(ImageFormat::Srgba, self.size, pixels)?;
        engine.submit(&self.stream, Packet::new(frame, timestamp))?;
        self.last = Some(timestamp);
        Ok(())
    }
}
