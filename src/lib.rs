//! Line and maze intersection tracking for line-following robots.
//!
//! [`vision::analyze`] turns one BGR camera frame into an
//! [`IntersectionReading`]: which paths (left, forward, right) are visible,
//! whether the finish marker is in view, and how far the line sits from the
//! center at the bottom of the frame. [`LineTracker`] runs that analysis
//! continuously on a background thread and keeps the latest reading
//! available to a steering controller.

pub mod error;
pub mod tracking;
pub mod vision;

pub use error::{AnalysisError, FrameError, TrackerError};
pub use tracking::{FrameSource, LineTracker, TrackerConfig, TrackerState};
pub use vision::{
    Contour, Frame, FrameBuilder, IntersectionCode, IntersectionReading, analyze,
    find_largest_contour,
};
