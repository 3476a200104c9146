use std::fmt;

#[derive(Debug)]
pub enum VideoError {
    /// Enumeration found no capture device at all.
    NoDevices,
    Device(String),
    Stream(String),
    Decode(String),
    Channel(String),
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::NoDevices => write!(f, "no capture devices found"),
            VideoError::Device(msg) => write!(f, "device error: {msg}"),
            VideoError::Stream(msg) => write!(f, "stream error: {msg}"),
            VideoError::Decode(msg) => write!(f, "decode error: {msg}"),
            VideoError::Channel(msg) => write!(f, "channel error: {msg}"),
        }
    }
}

impl std::error::Error for VideoError {}

impl From<std::io::Error> for VideoError {
    fn from(err: std::io::Error) -> Self {
        VideoError::Device(err.to_string())
    }
}

impl From<crates_image::ImageError> for VideoError {
    fn from(err: crates_image::ImageError) -> Self {
        VideoError::Decode(err.to_string())
    }
}
