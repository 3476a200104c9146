use crate::{
    BYTES_PER_PIXEL, CaptureBackend, CaptureConfig, DeviceInfo, FrameBuffer, FrameSource,
    VideoError, convert,
};
use pose_base::Vec2;
use std::path::PathBuf;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc;
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

type FrameResult = Result<Vec<u8>, VideoError>;

#[derive(Debug, Clone, Copy, PartialEq)]
enum WireFormat {
    Yuyv,
    Mjpg,
}

/// Video4Linux2 capture devices (`/dev/video*`).
#[derive(Debug, Default, Clone)]
pub struct V4l2Backend;

impl CaptureBackend for V4l2Backend {
    fn name(&self) -> &str {
        "v4l2"
    }

    fn devices(&self) -> Result<Vec<DeviceInfo>, VideoError> {
        let mut nodes = v4l::context::enum_devices();
        nodes.sort_by_key(|node| node.index());
        Ok(nodes
            .into_iter()
            .enumerate()
            .map(|(index, node)| DeviceInfo {
                index,
                name: node
                    .name()
                    .unwrap_or_else(|| node.path().display().to_string()),
                path: Some(node.path().to_path_buf()),
            })
            .collect())
    }

    fn open(
        &self,
        device: &DeviceInfo,
        config: &CaptureConfig,
    ) -> Result<Box<dyn FrameSource>, VideoError> {
        let path = device
            .path
            .clone()
            .ok_or_else(|| VideoError::Device(format!("{} has no device node", device.name)))?;
        Ok(Box::new(V4l2Source::open(path, config)?))
    }
}

/// An open V4L2 device streaming on a background thread.
///
/// The thread converts every frame to RGBA into buffers recycled through a
/// return channel, so steady-state capture does not allocate.
pub struct V4l2Source {
    path: PathBuf,
    size: Vec2<usize>,
    streaming: Arc<AtomicBool>,
    cancel: Arc<AtomicBool>,
    frames: mpsc::Receiver<FrameResult>,
    recycle: mpsc::Sender<Vec<u8>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for V4l2Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("V4l2Source")
            .field("path", &self.path)
            .field("size", &self.size)
            .field("streaming", &self.streaming.load(Ordering::Relaxed))
            .field("thread_handle", &self.thread_handle.is_some())
            .finish()
    }
}

impl V4l2Source {
    /// Open the device node, negotiate YUYV (or MJPG) at the requested size
    /// and rate, and start the capture thread.
    ///
    /// # Errors
    ///
    /// Returns `VideoError::Device` if the node cannot be opened, rejects the
    /// format or frame rate, or only offers a pixel format other than YUYV
    /// and MJPG.
    pub fn open(path: PathBuf, config: &CaptureConfig) -> Result<Self, VideoError> {
        // Open V4L2 device
        let device = Device::with_path(&path)?;

        // Request YUYV, the driver may answer with MJPG instead
        let requested = Format::new(config.width(), config.height(), FourCC::new(b"YUYV"));
        let actual = Capture::set_format(&device, &requested)?;
        let wire = match &actual.fourcc.repr {
            b"YUYV" => WireFormat::Yuyv,
            b"MJPG" => WireFormat::Mjpg,
            _ => {
                return Err(VideoError::Device(format!(
                    "unsupported pixel format: {}",
                    actual.fourcc
                )));
            }
        };
        let size = Vec2::new(actual.width as usize, actual.height as usize);
        if size != Vec2::new(config.width() as usize, config.height() as usize) {
            log::warn!(
                "v4l2: {} negotiated {}x{} instead of {}x{}",
                path.display(),
                size.x,
                size.y,
                config.width(),
                config.height()
            );
        }

        // Set frame rate
        let params = v4l::video::capture::Parameters::with_fps(config.fps());
        Capture::set_params(&device, &params)?;

        // Frames go out on one channel, spent buffers come back on the other
        let buffer_count = config.buffer_count().max(1);
        let (frame_tx, frame_rx) = mpsc::channel(buffer_count as usize);
        let (recycle_tx, recycle_rx) = mpsc::channel(buffer_count as usize + 1);
        let streaming = Arc::new(AtomicBool::new(false));
        let cancel = Arc::new(AtomicBool::new(false));

        // Start capture thread
        let handle = thread::spawn({
            let streaming = Arc::clone(&streaming);
            let cancel = Arc::clone(&cancel);
            move || {
                let worker = CaptureWorker {
                    size,
                    wire,
                    buffer_count,
                    streaming,
                    cancel,
                };
                if let Err(e) = worker.run(device, &frame_tx, recycle_rx) {
                    log::error!("v4l2: capture thread failed: {}", e);
                    let _ = frame_tx.blocking_send(Err(e));
                }
            }
        });

        Ok(Self {
            path,
            size,
            streaming,
            cancel,
            frames: frame_rx,
            recycle: recycle_tx,
            thread_handle: Some(handle),
        })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

struct CaptureWorker {
    size: Vec2<usize>,
    wire: WireFormat,
    buffer_count: u32,
    streaming: Arc<AtomicBool>,
    cancel: Arc<AtomicBool>,
}

impl CaptureWorker {
    fn run(
        &self,
        device: Device,
        frames: &mpsc::Sender<FrameResult>,
        mut recycle: mpsc::Receiver<Vec<u8>>,
    ) -> Result<(), VideoError> {
        let mut stream = MmapStream::with_buffers(&device, Type::VideoCapture, self.buffer_count)
            .map_err(|e| VideoError::Stream(e.to_string()))?;
        let frame_len = self.size.area() * BYTES_PER_PIXEL;

        while !self.cancel.load(Ordering::Relaxed) {
            let (data, _metadata) =
                CaptureStream::next(&mut stream).map_err(|e| VideoError::Stream(e.to_string()))?;

            let mut rgba = recycle.try_recv().unwrap_or_else(|_| vec![0u8; frame_len]);
            match self.wire {
                // drivers may report padding past the last row
                WireFormat::Yuyv => {
                    let len = self.size.area() * 2;
                    let data = data.get(..len).ok_or_else(|| {
                        VideoError::Stream(format!("short YUYV frame: {} bytes", data.len()))
                    })?;
                    convert::yuyv_to_rgba(self.size, data, &mut rgba)?
                }
                WireFormat::Mjpg => convert::jpeg_to_rgba(self.size, data, &mut rgba)?,
            }

            self.streaming.store(true, Ordering::Relaxed);
            if frames.blocking_send(Ok(rgba)).is_err() {
                // reader closed the channel
                break;
            }
        }
        Ok(())
    }
}

impl FrameSource for V4l2Source {
    fn size(&self) -> Vec2<usize> {
        if self.streaming.load(Ordering::Relaxed) {
            self.size
        } else {
            Vec2::zero()
        }
    }

    fn read_into(&mut self, buffer: &mut FrameBuffer) -> Result<bool, VideoError> {
        if self.thread_handle.is_none() {
            return Err(VideoError::Stream("capture stopped".to_string()));
        }

        // skip to the newest queued frame
        let mut latest = None;
        loop {
            match self.frames.try_recv() {
                Ok(frame) => {
                    if let Some(stale) = latest.replace(frame?) {
                        let _ = self.recycle.try_send(stale);
                    }
                }
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    if latest.is_none() {
                        return Err(VideoError::Channel("capture thread exited".to_string()));
                    }
                    break;
                }
            }
        }

        match latest {
            Some(frame) => {
                buffer.copy_from(&frame)?;
                let _ = self.recycle.try_send(frame);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn stop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        self.frames.close();
        // release queued frames
        while self.frames.try_recv().is_ok() {}
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
            log::info!("v4l2: {} stopped", self.path.display());
        }
    }
}

impl Drop for V4l2Source {
    fn drop(&mut self) {
        self.stop();
    }
}
