//! Continuous line tracking on a background thread.
//!
//! A [`LineTracker`] pulls frames from any [`FrameSource`], runs
//! [`analyze`](crate::analyze) on each one, and publishes the result so a
//! steering loop can poll it without waiting on the camera.

mod frame_source;
mod line_tracker;
mod tracker_state;

pub use frame_source::{FrameSource, REQUIRED_SOURCE_SIZE};
pub use line_tracker::{LineTracker, TrackerConfig};
pub use tracker_state::TrackerState;
