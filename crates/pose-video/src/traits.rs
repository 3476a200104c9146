use crate::{CaptureConfig, FrameBuffer, VideoError};
use pose_base::Vec2;
use std::path::PathBuf;

/// A capture device as reported by a backend's enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    pub index: usize,
    pub name: String,
    pub path: Option<PathBuf>,
}

/// Entry point of a capture API: lists devices and opens one of them.
pub trait CaptureBackend {
    fn name(&self) -> &str;

    fn devices(&self) -> Result<Vec<DeviceInfo>, VideoError>;

    fn open(
        &self,
        device: &DeviceInfo,
        config: &CaptureConfig,
    ) -> Result<Box<dyn FrameSource>, VideoError>;
}

/// An open capture device producing RGBA8 frames.
pub trait FrameSource: Send {
    /// Negotiated frame size, `(0, 0)` until the device has reported one.
    fn size(&self) -> Vec2<usize>;

    /// Copy the most recent frame into `buffer`.
    ///
    /// Returns `Ok(false)` when no frame arrived since the last call; the
    /// buffer is left as it was.
    fn read_into(&mut self, buffer: &mut FrameBuffer) -> Result<bool, VideoError>;

    /// Stop capturing. Further reads fail with `VideoError::Stream`.
    fn stop(&mut self);
}

/// Enumerate `backend`'s devices and open the one `config` asks for.
///
/// Fails with `VideoError::NoDevices` before anything is opened when the
/// backend has no devices at all.
pub fn open_configured(
    backend: &dyn CaptureBackend,
    config: &CaptureConfig,
) -> Result<Box<dyn FrameSource>, VideoError> {
    let devices = backend.devices()?;
    if devices.is_empty() {
        return Err(VideoError::NoDevices);
    }
    for device in &devices {
        log::debug!("{}: found device {} ({})", backend.name(), device.index, device.name);
    }
    let device = devices.get(config.device_index()).ok_or_else(|| {
        VideoError::Device(format!(
            "device index {} out of range, {} device(s) available",
            config.device_index(),
            devices.len()
        ))
    })?;
    log::info!(
        "{}: opening {} at {}x{}@{}",
        backend.name(),
        device.name,
        config.width(),
        config.height(),
        config.fps()
    );
    backend.open(device, config)
}
