//! LineTracker: frame acquisition and analysis on a background thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::error::TrackerError;
use crate::tracking::frame_source::{FrameSource, REQUIRED_SOURCE_SIZE};
use crate::tracking::tracker_state::TrackerState;
use crate::vision::{IntersectionReading, analyze};

const THREAD_NAME: &str = "line-tracker";

/// Configuration for the LineTracker.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Time an in-flight iteration is expected to need to wind down after
    /// `stop()`; longer waits are logged
    pub grace_period: Duration,
    /// Pause before the next attempt after a failed frame
    pub retry_delay: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            grace_period: Duration::from_millis(100),
            retry_delay: Duration::from_millis(10),
        }
    }
}

/// State shared between the tracker handle and its background thread.
struct SharedState {
    /// Cleared by `stop()`; checked once per iteration.
    running: AtomicBool,
    /// Code and offset from the same frame, replaced as one value.
    latest: RwLock<IntersectionReading>,
    frames_processed: AtomicU64,
}

impl SharedState {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            running: AtomicBool::new(false),
            latest: RwLock::new(IntersectionReading::default()),
            frames_processed: AtomicU64::new(0),
        })
    }

    fn publish(&self, reading: IntersectionReading) {
        *self.latest.write() = reading;
        self.frames_processed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Keeps the latest [`IntersectionReading`] for a camera up to date.
///
/// The tracker owns one background thread while running. It repeatedly grabs
/// a frame, analyzes it and publishes the result; the getters never block on
/// that work.
pub struct LineTracker<S: FrameSource> {
    source: Arc<Mutex<S>>,
    shared: Arc<SharedState>,
    config: TrackerConfig,
    handle: Option<JoinHandle<()>>,
}

impl<S: FrameSource> LineTracker<S> {
    /// Create an idle tracker for `source` with the default configuration.
    ///
    /// # Errors
    /// Returns [`TrackerError::Configuration`] if the source's size tag is not
    /// [`REQUIRED_SOURCE_SIZE`].
    pub fn new(source: S) -> Result<Self, TrackerError> {
        Self::with_config(source, TrackerConfig::default())
    }

    /// Create an idle tracker with an explicit configuration.
    pub fn with_config(source: S, config: TrackerConfig) -> Result<Self, TrackerError> {
        let size = source.size();
        if size != REQUIRED_SOURCE_SIZE {
            return Err(TrackerError::Configuration {
                size,
                required: REQUIRED_SOURCE_SIZE,
            });
        }

        Ok(Self {
            source: Arc::new(Mutex::new(source)),
            shared: SharedState::new(),
            config,
            handle: None,
        })
    }

    /// Create a tracker and start it right away.
    pub fn spawn(source: S) -> Result<Self, TrackerError> {
        let mut tracker = Self::new(source)?;
        tracker.start()?;
        Ok(tracker)
    }

    /// Start the background thread.
    ///
    /// Calling this while already running only logs a warning.
    pub fn start(&mut self) -> Result<(), TrackerError> {
        if self.is_running() {
            warn!("line tracker is already running");
            return Ok(());
        }
        self.reap();

        self.shared.running.store(true, Ordering::SeqCst);
        let source = Arc::clone(&self.source);
        let shared = Arc::clone(&self.shared);
        let retry_delay = self.config.retry_delay;

        let spawned = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || run(source, shared, retry_delay));

        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                Ok(())
            }
            Err(err) => {
                self.shared.running.store(false, Ordering::SeqCst);
                Err(TrackerError::Spawn(err))
            }
        }
    }

    /// Stop the background thread and reset the latest reading.
    ///
    /// The thread finishes its current iteration first; this call waits for
    /// it, so no reading published after the reset can survive. Does nothing
    /// when idle.
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.shared.running.store(false, Ordering::SeqCst);

        let started = Instant::now();
        if handle.join().is_err() {
            error!("line tracker thread panicked");
        }
        let waited = started.elapsed();
        if waited > self.config.grace_period {
            warn!(
                waited_ms = waited.as_millis() as u64,
                "line tracker thread exceeded its grace period"
            );
        }

        *self.shared.latest.write() = IntersectionReading::default();
    }

    pub fn state(&self) -> TrackerState {
        match &self.handle {
            Some(handle) if !handle.is_finished() => TrackerState::Running,
            _ => TrackerState::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == TrackerState::Running
    }

    /// Most recent reading; code and offset always come from the same frame.
    pub fn latest_reading(&self) -> IntersectionReading {
        *self.shared.latest.read()
    }

    /// Most recent intersection code (0 to 8).
    pub fn latest_code(&self) -> u8 {
        self.latest_reading().code.value()
    }

    /// Most recent bottom offset, from 1.0 (line at far left) to -1.0 (far
    /// right).
    pub fn latest_offset(&self) -> f32 {
        self.latest_reading().bottom_offset
    }

    /// Number of readings published since the tracker was created.
    pub fn frames_processed(&self) -> u64 {
        self.shared.frames_processed.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Run `f` with exclusive access to the frame source.
    ///
    /// While running, this waits for any acquisition in progress, and the
    /// background loop is paused until `f` returns.
    pub fn with_source<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut source = self.source.lock();
        f(&mut *source)
    }

    /// Collect a thread that exited without `stop()`.
    fn reap(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("line tracker thread panicked");
            }
        }
    }
}

impl<S: FrameSource> Drop for LineTracker<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Consecutive failures of one kind. The first of a streak is logged at warn
/// level and the rest at debug level.
#[derive(Debug, Default)]
struct FailureStreak {
    count: u64,
}

impl FailureStreak {
    /// Count a failure. Returns `true` if it starts a new streak.
    fn record(&mut self) -> bool {
        self.count += 1;
        self.count == 1
    }

    /// End the streak, returning how many failures it held.
    fn reset(&mut self) -> u64 {
        std::mem::take(&mut self.count)
    }

    fn count(&self) -> u64 {
        self.count
    }
}

/// Background loop: acquire, analyze, publish until `running` is cleared.
fn run<S: FrameSource>(source: Arc<Mutex<S>>, shared: Arc<SharedState>, retry_delay: Duration) {
    info!("line tracker thread started");
    let mut acquisition_failures = FailureStreak::default();
    let mut analysis_failures = FailureStreak::default();

    while shared.running.load(Ordering::SeqCst) {
        let acquired = source.lock().get_frame();
        let frame = match acquired {
            Ok(frame) => {
                let failed = acquisition_failures.reset();
                if failed > 0 {
                    info!(failures = failed, "frame acquisition recovered");
                }
                frame
            }
            Err(err) => {
                if acquisition_failures.record() {
                    warn!(error = %err, "frame acquisition failed");
                } else {
                    debug!(
                        error = %err,
                        failures = acquisition_failures.count(),
                        "frame acquisition still failing"
                    );
                }
                thread::sleep(retry_delay);
                continue;
            }
        };

        match analyze(&frame) {
            Ok(reading) => {
                let failed = analysis_failures.reset();
                if failed > 0 {
                    info!(failures = failed, "frame analysis recovered");
                }
                debug!(
                    code = reading.code.value(),
                    offset = reading.bottom_offset,
                    "published reading"
                );
                shared.publish(reading);
            }
            Err(err) => {
                if analysis_failures.record() {
                    warn!(error = %err, "frame analysis failed");
                } else {
                    debug!(
                        error = %err,
                        failures = analysis_failures.count(),
                        "frame analysis still failing"
                    );
                }
                thread::sleep(retry_delay);
            }
        }
    }

    info!("line tracker thread stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::{Frame, FrameBuilder};
    use std::collections::HashSet;
    use std::thread::ThreadId;

    #[derive(Debug, thiserror::Error)]
    #[error("camera disconnected")]
    struct CameraError;

    struct MockCamera {
        size: u32,
        frame: Frame,
        /// Fail every n-th call when set
        fail_every: Option<u64>,
        calls: u64,
        threads: Arc<Mutex<HashSet<ThreadId>>>,
    }

    impl MockCamera {
        fn new(frame: Frame) -> Self {
            Self {
                size: REQUIRED_SOURCE_SIZE,
                frame,
                fail_every: None,
                calls: 0,
                threads: Arc::default(),
            }
        }
    }

    impl FrameSource for MockCamera {
        type Error = CameraError;

        fn size(&self) -> u32 {
            self.size
        }

        fn get_frame(&mut self) -> Result<Frame, Self::Error> {
            self.threads.lock().insert(thread::current().id());
            self.calls += 1;
            thread::sleep(Duration::from_millis(1));
            match self.fail_every {
                Some(n) if self.calls % n == 0 => Err(CameraError),
                _ => Ok(self.frame.clone()),
            }
        }
    }

    fn finish_frame() -> Frame {
        FrameBuilder::new(128, 96).fill([0, 255, 0]).build()
    }

    fn wait_for(cond: impl Fn() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        cond()
    }

    #[test]
    fn test_tracker_config_default() {
        let config = TrackerConfig::default();
        assert_eq!(config.grace_period, Duration::from_millis(100));
        assert_eq!(config.retry_delay, Duration::from_millis(10));
    }

    #[test]
    fn test_rejects_wrong_source_size() {
        let mut camera = MockCamera::new(finish_frame());
        camera.size = 1;
        let err = LineTracker::new(camera).err().unwrap();
        assert!(matches!(
            err,
            TrackerError::Configuration {
                size: 1,
                required: 2
            }
        ));
    }

    #[test]
    fn test_new_tracker_is_idle() {
        let tracker = LineTracker::new(MockCamera::new(finish_frame())).unwrap();
        assert_eq!(tracker.state(), TrackerState::Idle);
        assert_eq!(tracker.latest_code(), 0);
        assert_eq!(tracker.latest_offset(), 0.0);
        assert_eq!(tracker.with_source(|camera| camera.calls), 0);
    }

    #[test]
    fn test_start_publishes_and_stop_resets() {
        let mut tracker = LineTracker::new(MockCamera::new(finish_frame())).unwrap();
        tracker.start().unwrap();
        assert!(tracker.is_running());
        assert!(wait_for(|| tracker.latest_code() == 8));

        tracker.stop();
        assert_eq!(tracker.state(), TrackerState::Idle);
        assert_eq!(tracker.latest_reading(), IntersectionReading::default());

        // Nothing publishes once stopped.
        let processed = tracker.frames_processed();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(tracker.frames_processed(), processed);
        assert_eq!(tracker.latest_code(), 0);
    }

    #[test]
    fn test_redundant_start_keeps_single_thread() {
        let camera = MockCamera::new(finish_frame());
        let threads = Arc::clone(&camera.threads);
        let mut tracker = LineTracker::spawn(camera).unwrap();
        tracker.start().unwrap();
        tracker.start().unwrap();

        assert!(wait_for(|| tracker.frames_processed() >= 5));
        assert_eq!(threads.lock().len(), 1);
        tracker.stop();
    }

    #[test]
    fn test_restart_after_stop() {
        let mut tracker = LineTracker::new(MockCamera::new(finish_frame())).unwrap();
        tracker.stop();
        assert_eq!(tracker.state(), TrackerState::Idle);

        tracker.start().unwrap();
        assert!(wait_for(|| tracker.latest_code() == 8));
        tracker.stop();
        tracker.start().unwrap();
        assert!(wait_for(|| tracker.latest_code() == 8));
        tracker.stop();
        assert_eq!(tracker.latest_code(), 0);
    }

    #[test]
    fn test_acquisition_failures_do_not_stop_loop() {
        let mut camera = MockCamera::new(finish_frame());
        camera.fail_every = Some(2);
        let mut tracker = LineTracker::spawn(camera).unwrap();

        assert!(wait_for(|| tracker.frames_processed() >= 3));
        assert!(tracker.is_running());
        assert_eq!(tracker.latest_code(), 8);
        tracker.stop();
        assert!(tracker.with_source(|camera| camera.calls) >= 5);
    }

    #[test]
    fn test_analysis_failures_keep_last_reading() {
        let camera = MockCamera::new(Frame::black(32, 32));
        let tracker = LineTracker::spawn(camera).unwrap();

        assert!(wait_for(|| tracker.with_source(|camera| camera.calls) >= 3));
        assert!(tracker.is_running());
        assert_eq!(tracker.frames_processed(), 0);
        assert_eq!(tracker.latest_reading(), IntersectionReading::default());
    }

    #[test]
    fn test_with_source_pauses_loop() {
        let tracker = LineTracker::spawn(MockCamera::new(finish_frame())).unwrap();
        assert!(wait_for(|| tracker.frames_processed() >= 1));

        tracker.with_source(|camera| {
            let calls = camera.calls;
            thread::sleep(Duration::from_millis(30));
            // The loop cannot reach the camera while it is borrowed here.
            assert_eq!(camera.calls, calls);
            camera.frame = Frame::black(128, 96);
        });
        assert!(wait_for(|| tracker.latest_code() == 0));
    }

    #[test]
    fn test_failure_streak_warns_once() {
        let mut streak = FailureStreak::default();
        assert!(streak.record());
        assert!(!streak.record());
        assert!(!streak.record());
        assert_eq!(streak.count(), 3);

        assert_eq!(streak.reset(), 3);
        assert_eq!(streak.reset(), 0);
        assert!(streak.record());
    }
}
