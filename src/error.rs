//! Error types for frame construction, analysis, and the tracking loop.

use thiserror::Error;

/// Errors raised when building a [`Frame`](crate::Frame) from raw data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// The pixel array does not have exactly three (BGR) channels.
    #[error("frame must have 3 channels, got {channels}")]
    BadChannels { channels: usize },
    /// The raw buffer length does not match `width * height * 3`.
    #[error("frame buffer has {got} bytes, expected {expected}")]
    BufferSize { expected: usize, got: usize },
}

/// Errors raised by [`analyze`](crate::analyze).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error(
        "frame is {width}x{height}, analysis needs at least {min_width}x{min_height}"
    )]
    FrameTooSmall {
        width: usize,
        height: usize,
        min_width: usize,
        min_height: usize,
    },
}

/// Errors raised by [`LineTracker`](crate::LineTracker).
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The frame source advertises a size tag the tracker cannot work with.
    #[error("frame source size must equal {required}, got {size}")]
    Configuration { size: u32, required: u32 },
    /// The background thread could not be created.
    #[error("failed to spawn tracking thread: {0}")]
    Spawn(#[from] std::io::Error),
}
