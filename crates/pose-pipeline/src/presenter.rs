use crate::PipelineError;
use pose_base::{Origin, Rect, Vec2, Vec3};
use pose_graph::{ImageFormat, ImageFrame, LandmarkList, Packet, POSE_LANDMARK_COUNT, Timestamp};
use serde::{Deserialize, Serialize};

/// Inclusive range of landmark indices the presenter maps and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandmarkRange {
    pub first: usize,
    pub last: usize,
}

/// Indices 1 through 32 of the 33-point pose set. Index 0 (the nose) is
/// not drawn.
pub const DEFAULT_LANDMARK_RANGE: LandmarkRange = LandmarkRange { first: 1, last: 32 };

impl Default for LandmarkRange {
    fn default() -> Self {
        DEFAULT_LANDMARK_RANGE
    }
}

impl LandmarkRange {
    pub const fn new(first: usize, last: usize) -> Self {
        Self { first, last }
    }

    pub fn len(&self) -> usize {
        self.last.saturating_add(1).saturating_sub(self.first)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.first..=self.last).contains(&index)
    }

    pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
        self.first..=self.last
    }
}

/// RGBA8 pixels waiting to be shown, plus whether they changed since the
/// display last picked them up.
#[derive(Clone, PartialEq)]
pub struct Texture {
    size: Vec2<usize>,
    data: Vec<u8>,
    dirty: bool,
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("size", &self.size)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Texture {
    pub fn new(size: Vec2<usize>) -> Self {
        Self {
            size,
            data: vec![0u8; size.area() * ImageFormat::Srgba.bytes_per_pixel()],
            dirty: false,
        }
    }

    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag, returning whether it was set.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub fn upload(&mut self, frame: &ImageFrame) -> Result<(), PipelineError> {
        if frame.format != ImageFormat::Srgba {
            return Err(PipelineError::Present(format!(
                "unsupported image format {:?}",
                frame.format
            )));
        }
        if frame.size != self.size || frame.data.len() != self.data.len() {
            return Err(PipelineError::Present(format!(
                "image is {:?} ({} bytes), texture is {:?}",
                frame.size,
                frame.data.len(),
                self.size
            )));
        }
        self.data.copy_from_slice(&frame.data);
        self.dirty = true;
        Ok(())
    }
}

/// One landmark in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenLandmark {
    pub index: usize,
    pub position: Vec3<f32>,
}

/// Shows what the graph produced: images go to the texture, landmarks are
/// mapped onto the screen rectangle and logged.
#[derive(Debug)]
pub struct Presenter {
    texture: Texture,
    screen: Rect<f32>,
    origin: Origin,
    range: LandmarkRange,
    landmarks: Vec<ScreenLandmark>,
    landmarks_at: Option<Timestamp>,
}

impl Presenter {
    pub fn new(
        frame_size: Vec2<usize>,
        screen: Rect<f32>,
        origin: Origin,
        range: LandmarkRange,
    ) -> Self {
        Self {
            texture: Texture::new(frame_size),
            screen,
            origin,
            range,
            landmarks: Vec::with_capacity(range.len().min(POSE_LANDMARK_COUNT)),
            landmarks_at: None,
        }
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn texture_mut(&mut self) -> &mut Texture {
        &mut self.texture
    }

    pub fn screen(&self) -> Rect<f32> {
        self.screen
    }

    /// Landmarks already presented keep their old coordinates until the
    /// next landmark packet.
    pub fn set_screen(&mut self, screen: Rect<f32>) {
        self.screen = screen;
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn range(&self) -> LandmarkRange {
        self.range
    }

    /// Landmarks from the most recent landmark packet.
    pub fn landmarks(&self) -> &[ScreenLandmark] {
        &self.landmarks
    }

    pub fn landmarks_timestamp(&self) -> Option<Timestamp> {
        self.landmarks_at
    }

    pub fn present_image(&mut self, packet: &Packet<ImageFrame>) -> Result<(), PipelineError> {
        self.texture.upload(&packet.value)?;
        log::trace!("image {} uploaded", packet.timestamp);
        Ok(())
    }

    pub fn present_landmarks(
        &mut self,
        packet: &Packet<LandmarkList>,
    ) -> Result<&[ScreenLandmark], PipelineError> {
        let list = &packet.value;
        if list.len() <= self.range.last {
            return Err(PipelineError::Present(format!(
                "landmark list has {} points, range needs index {}",
                list.len(),
                self.range.last
            )));
        }

        self.landmarks.clear();
        for index in self.range.indices() {
            let position = self.screen.point_at(list[index].position(), self.origin);
            log::info!("landmark {index} at {}: {position}", packet.timestamp);
            self.landmarks.push(ScreenLandmark { index, position });
        }
        self.landmarks_at = Some(packet.timestamp);
        Ok(&self.landmarks)
    }
}
