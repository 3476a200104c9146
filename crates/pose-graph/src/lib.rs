//! Boundary to the pose estimation graph.
//!
//! The graph itself is opaque. This crate defines the [`Engine`] capability
//! it is driven through, the packets that cross that boundary, the
//! [`StreamAdapter`] on the input side and the [`OutputPoller`] on the
//! output side. [`LoopbackEngine`] is an in-process engine that echoes
//! frames and emits generated landmarks.

pub mod adapter;
pub mod assets;
pub mod config;
pub mod engine;
pub mod error;
pub mod loopback;
pub mod packet;
pub mod poller;

pub use adapter::StreamAdapter;
pub use assets::{DEFAULT_ASSETS, ModelAssets};
pub use config::{GraphConfig, StreamNames};
pub use engine::{Engine, EngineFactory, EngineSetup};
pub use error::GraphError;
pub use loopback::{LandmarkGenerator, LoopbackEngine, fixed_pose};
pub use packet::{
    ImageFormat, ImageFrame, InputPacket, LandmarkList, NormalizedLandmark, OutputPacket, Packet,
    PacketPayload, POSE_LANDMARK_COUNT, Timestamp,
};
pub use poller::{OutputPoller, OutputStream, Polled};
