//! Frame acquisition for the pose pipeline.
//!
//! A [`CaptureBackend`] enumerates devices and opens them as
//! [`FrameSource`]s. Every source hands out RGBA8 frames, copied into a
//! caller-owned [`FrameBuffer`] so nothing is allocated per frame.

pub mod config;
pub mod convert;
pub mod error;
pub mod framebuffer;
pub mod pattern;
pub mod traits;

#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use config::CaptureConfig;
pub use error::VideoError;
pub use framebuffer::{BYTES_PER_PIXEL, FrameBuffer};
pub use pattern::{PatternBackend, PatternSource};
pub use traits::{CaptureBackend, DeviceInfo, FrameSource, open_configured};

#[cfg(feature = "v4l2")]
pub use v4l2::{V4l2Backend, V4l2Source};
