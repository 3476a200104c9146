use crate::{Engine, GraphError, ImageFrame, LandmarkList, Packet, PacketPayload, StreamNames};
use std::marker::PhantomData;

/// Typed view of one named output stream.
#[derive(Debug)]
pub struct OutputStream<T> {
    name: String,
    _payload: PhantomData<fn() -> T>,
}

impl<T: PacketPayload> OutputStream<T> {
    /// Register the stream with `engine`; call before the engine starts.
    pub fn observe<E: Engine + ?Sized>(
        engine: &mut E,
        name: impl Into<String>,
    ) -> Result<Self, GraphError> {
        let name = name.into();
        engine.observe(&name)?;
        Ok(Self {
            name,
            _payload: PhantomData,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn try_next<E: Engine + ?Sized>(
        &self,
        engine: &mut E,
    ) -> Result<Option<Packet<T>>, GraphError> {
        match engine.poll_next(&self.name)? {
            None => Ok(None),
            Some(packet) => T::from_output(packet).map(Some).map_err(|other| {
                GraphError::PacketType {
                    stream: self.name.clone(),
                    expected: T::KIND,
                    got: other.kind(),
                }
            }),
        }
    }
}

/// What one tick's poll produced. Either side may be missing.
#[derive(Debug, Default)]
pub struct Polled {
    pub image: Option<Packet<ImageFrame>>,
    pub landmarks: Option<Packet<LandmarkList>>,
}

impl Polled {
    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.landmarks.is_none()
    }
}

/// Polls the rendered image and the landmark stream once per tick.
#[derive(Debug)]
pub struct OutputPoller {
    image: OutputStream<ImageFrame>,
    landmarks: OutputStream<LandmarkList>,
}

impl OutputPoller {
    pub fn observe<E: Engine + ?Sized>(
        engine: &mut E,
        names: &StreamNames,
    ) -> Result<Self, GraphError> {
        Ok(Self {
            image: OutputStream::observe(engine, names.output_video.clone())?,
            landmarks: OutputStream::observe(engine, names.landmarks.clone())?,
        })
    }

    pub fn poll<E: Engine + ?Sized>(&self, engine: &mut E) -> Result<Polled, GraphError> {
        Ok(Polled {
            image: self.image.try_next(engine)?,
            landmarks: self.landmarks.try_next(engine)?,
        })
    }
}
