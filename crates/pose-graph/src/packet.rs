use crate::GraphError;
use pose_base::{Vec2, Vec3};
use std::fmt;

/// Number of landmarks in a full-body pose landmark set.
pub const POSE_LANDMARK_COUNT: usize = 33;

/// Packet timestamp in microseconds since the pipeline clock started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    pub const fn micros(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}us", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// 8-bit sRGB with alpha, 4 bytes per pixel.
    Srgba,
}

impl ImageFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            ImageFormat::Srgba => 4,
        }
    }
}

/// Pixel data handed to or returned from the graph.
#[derive(Clone, PartialEq)]
pub struct ImageFrame {
    pub format: ImageFormat,
    pub size: Vec2<usize>,
    pub data: Vec<u8>,
}

impl fmt::Debug for ImageFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFrame")
            .field("format", &self.format)
            .field("size", &self.size)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl ImageFrame {
    /// Copy `pixels` into a new frame, checking the length against `size`.
    pub fn from_pixels(
        format: ImageFormat,
        size: Vec2<usize>,
        pixels: &[u8],
    ) -> Result<Self, GraphError> {
        let expected = size.area() * format.bytes_per_pixel();
        if pixels.len() != expected {
            return Err(GraphError::FrameSize {
                expected,
                got: pixels.len(),
            });
        }
        Ok(Self {
            format,
            size,
            data: pixels.to_vec(),
        })
    }

    pub fn stride(&self) -> usize {
        self.size.x * self.format.bytes_per_pixel()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedLandmark {
    /// Horizontal position, 0 at the left image edge and 1 at the right.
    pub x: f32,
    /// Vertical position, 0 at the top image edge and 1 at the bottom.
    pub y: f32,
    /// Depth relative to the hips, roughly in units of image width.
    pub z: f32,
    pub visibility: Option<f32>,
}

impl NormalizedLandmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            visibility: None,
        }
    }

    pub fn position(&self) -> Vec3<f32> {
        Vec3::new(self.x, self.y, self.z)
    }
}

pub type LandmarkList = Vec<NormalizedLandmark>;

/// A value stamped with the timestamp of the input it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet<T> {
    pub timestamp: Timestamp,
    pub value: T,
}

impl<T> Packet<T> {
    pub fn new(value: T, timestamp: Timestamp) -> Self {
        Self { timestamp, value }
    }
}

pub type InputPacket = Packet<ImageFrame>;

/// Anything an output stream can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputPacket {
    Image(Packet<ImageFrame>),
    Landmarks(Packet<LandmarkList>),
}

impl OutputPacket {
    pub fn kind(&self) -> &'static str {
        match self {
            OutputPacket::Image(_) => ImageFrame::KIND,
            OutputPacket::Landmarks(_) => LandmarkList::KIND,
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        match self {
            OutputPacket::Image(packet) => packet.timestamp,
            OutputPacket::Landmarks(packet) => packet.timestamp,
        }
    }
}

/// Payload types a typed output stream can be opened for.
pub trait PacketPayload: Sized {
    const KIND: &'static str;

    /// Unwrap `packet` if it carries `Self`, hand it back otherwise.
    fn from_output(packet: OutputPacket) -> Result<Packet<Self>, OutputPacket>;
}

impl PacketPayload for ImageFrame {
    const KIND: &'static str = "image";

    fn from_output(packet: OutputPacket) -> Result<Packet<Self>, OutputPacket> {
        match packet {
            OutputPacket::Image(packet) => Ok(packet),
            other => Err(other),
        }
    }
}

impl PacketPayload for LandmarkList {
    const KIND: &'static str = "landmarks";

    fn from_output(packet: OutputPacket) -> Result<Packet<Self>, OutputPacket> {
        match packet {
            OutputPacket::Landmarks(packet) => Ok(packet),
            other => Err(other),
        }
    }
}
