use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared state of the background registration run.
///
/// The session only reads `is_active` to gate tools and raises
/// `stop_requested`; the worker polls it and stops cooperatively.
#[derive(Debug, Clone, Default)]
pub struct RunFlag {
    inner: Arc<RunFlagInner>,
}

#[derive(Debug, Default)]
struct RunFlagInner {
    active: AtomicBool,
    stop_requested: AtomicBool,
}

impl RunFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a run as started. False if one was already active.
    pub fn start(&self) -> bool {
        let started = !self.inner.active.swap(true, Ordering::AcqRel);
        if started {
            self.inner.stop_requested.store(false, Ordering::Release);
        }
        started
    }

    pub fn finish(&self) {
        self.inner.active.store(false, Ordering::Release);
        self.inner.stop_requested.store(false, Ordering::Release);
    }

    /// Asks the running worker to stop. False when nothing is running.
    pub fn request_stop(&self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.inner.stop_requested.store(true, Ordering::Release);
        true
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.inner.active.load(Ordering::Acquire)
    }

    #[inline]
    pub fn stop_requested(&self) -> bool {
        self.inner.stop_requested.load(Ordering::Acquire)
    }
}
