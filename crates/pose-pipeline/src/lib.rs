//! Acquire → submit → poll → present, once per tick.
//!
//! [`Pipeline`] owns a frame source, an engine and a [`Presenter`]. The
//! host drives it by calling [`Pipeline::tick`] from its render loop and
//! tears it down with [`Pipeline::stop`].

pub mod clock;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod presenter;

pub use clock::MonotonicClock;
pub use config::{PipelineConfig, ScreenOrigin};
pub use error::PipelineError;
pub use pipeline::{MIN_VALID_SIZE, Pipeline, TickReport};
pub use presenter::{DEFAULT_LANDMARK_RANGE, LandmarkRange, Presenter, ScreenLandmark, Texture};
