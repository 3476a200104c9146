use crate::Timestamp;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// Graph description unusable.
    Config(String),
    /// Model asset missing or unreadable.
    Asset(String),
    /// The engine reported a failure.
    Engine(String),
    UnknownStream(String),
    /// Submission to an input stream that was already closed.
    StreamClosed(String),
    TimestampNotMonotonic {
        previous: Timestamp,
        got: Timestamp,
    },
    FrameSize {
        expected: usize,
        got: usize,
    },
    /// An output stream yielded a packet of another kind than it carries.
    PacketType {
        stream: String,
        expected: &'static str,
        got: &'static str,
    },
    Io(String),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::Config(msg) => write!(f, "graph config error: {msg}"),
            GraphError::Asset(msg) => write!(f, "asset error: {msg}"),
            GraphError::Engine(msg) => write!(f, "engine error: {msg}"),
            GraphError::UnknownStream(name) => write!(f, "unknown stream: {name}"),
            GraphError::StreamClosed(name) => write!(f, "stream closed: {name}"),
            GraphError::TimestampNotMonotonic { previous, got } => write!(
                f,
                "timestamp {got} is not after previous timestamp {previous}"
            ),
            GraphError::FrameSize { expected, got } => {
                write!(f, "frame size mismatch: expected {expected} bytes, got {got}")
            }
            GraphError::PacketType {
                stream,
                expected,
                got,
            } => write!(f, "stream {stream} carries {expected} packets, got {got}"),
            GraphError::Io(msg) => write!(f, "io error: {msg}"),
        }
    }
}

impl std::error::Error for GraphError {}

impl From<std::io::Error> for GraphError {
    fn from(err: std::io::Error) -> Self {
        GraphError::Io(err.to_string())
    }
}
