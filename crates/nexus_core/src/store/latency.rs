//! Simulated remote-service latency.
//!
//! The Store calls `Delay::wait` with a per-operation duration taken from a
//! `LatencyProfile`. Production wiring sleeps the thread; tests inject
//! `NoDelay` or `RecordingDelay`.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

pub trait Delay {
    fn wait(&self, duration: Duration);
}

/// Blocks the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn wait(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Delay for NoDelay {
    fn wait(&self, _duration: Duration) {}
}

/// Records requested waits without sleeping. Clones share one log.
#[derive(Debug, Clone, Default)]
pub struct RecordingDelay {
    waits: Rc<RefCell<Vec<Duration>>>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waits(&self) -> Vec<Duration> {
        self.waits.borrow().clone()
    }

    pub fn total(&self) -> Duration {
        self.waits.borrow().iter().sum()
    }
}

impl Delay for RecordingDelay {
    fn wait(&self, duration: Duration) {
        self.waits.borrow_mut().push(duration);
    }
}

/// Per-operation-class delays.
///
/// Activity appends and notification read-marks are never delayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    pub init: Duration,
    pub read: Duration,
    pub write: Duration,
    pub task_write: Duration,
    pub profile_write: Duration,
}

impl LatencyProfile {
    /// Delays emulating a remote CRM backend.
    pub fn simulated() -> Self {
        Self {
            init: Duration::from_millis(500),
            read: Duration::from_millis(200),
            write: Duration::from_millis(300),
            task_write: Duration::from_millis(200),
            profile_write: Duration::from_millis(500),
        }
    }

    pub fn none() -> Self {
        Self {
            init: Duration::ZERO,
            read: Duration::ZERO,
            write: Duration::ZERO,
            task_write: Duration::ZERO,
            profile_write: Duration::ZERO,
        }
    }
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self::none()
    }
}
