pub mod logging;
pub mod rect;
pub mod vec2;
pub mod vec3;

pub use logging::{FileLogger, StdoutLogger, init_file_logger, init_stdout_logger};
pub use rect::{Origin, Rect};
pub use vec2::Vec2;
pub use vec3::Vec3;

// Re-export log crate so downstream crates can use pose_base::log::*
pub use log;
