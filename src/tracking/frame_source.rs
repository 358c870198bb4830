//! Trait for camera backends feeding the tracker.

use crate::vision::Frame;

/// Size tag a frame source must advertise to be accepted by
/// [`LineTracker`](crate::LineTracker).
///
/// The analyzer's region layout assumes the 128x96 capture mode that cameras
/// report as size 2.
pub const REQUIRED_SOURCE_SIZE: u32 = 2;

/// Trait for camera backends.
///
/// Implement this trait to connect any camera to the tracker. The source is
/// moved into the tracker and driven from its background thread.
///
/// # Example
///
/// ```ignore
/// use linetrack_rs::{Frame, FrameSource};
///
/// struct MyCamera {
///     // Your device handle here
/// }
///
/// impl FrameSource for MyCamera {
///     type Error = std::io::Error;
///
///     fn size(&self) -> u32 {
///         2
///     }
///
///     fn get_frame(&mut self) -> Result<Frame, Self::Error> {
///         // Grab a BGR image from the device
///         Ok(Frame::black(128, 96))
///     }
/// }
/// ```
pub trait FrameSource: Send + 'static {
    /// Error type for acquisition failures.
    type Error: std::error::Error + Send + 'static;

    /// Capture size tag of the camera.
    fn size(&self) -> u32;

    /// Capture a fresh BGR frame. May block until one is available.
    fn get_frame(&mut self) -> Result<Frame, Self::Error>;
}
