/// Lifecycle of a [`LineTracker`](crate::LineTracker).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackerState {
    /// No background thread
    #[default]
    Idle,
    /// Background thread acquiring and analyzing frames
    Running,
}
