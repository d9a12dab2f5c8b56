//! Per-invocation scan state.
//!
//! All mutable state of one scan lives here: the cancellation flag, the
//! running counters and the progress callback. The engine itself holds only
//! immutable configuration, so independent sessions can run concurrently on
//! separate engines.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Progress observer: `(current, total, message)`
pub type ProgressFn = dyn Fn(usize, usize, &str) + Send + Sync;

/// Throttle interval for intermediate progress updates
const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// Handle for requesting cancellation from outside the scan
#[derive(Debug, Clone)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// State shared between the scan control path and its observers.
///
/// Counters and the cancellation flag are the only values touched from more
/// than one thread; both are atomic. Everything else mutates only on the
/// orchestrator's own control path.
pub struct ScanSession {
    cancel: Arc<AtomicBool>,
    progress: Option<Box<ProgressFn>>,
    last_progress: Mutex<Option<Instant>>,

    files_analyzed: AtomicUsize,
    comparisons: AtomicUsize,
    duplicate_files: AtomicUsize,
    recoverable_bytes: AtomicU64,
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanSession {
    pub fn new() -> Self {
        Self {
            cancel: Arc::new(AtomicBool::new(false)),
            progress: None,
            last_progress: Mutex::new(None),
            files_analyzed: AtomicUsize::new(0),
            comparisons: AtomicUsize::new(0),
            duplicate_files: AtomicUsize::new(0),
            recoverable_bytes: AtomicU64::new(0),
        }
    }

    /// Attach a progress observer, invoked synchronously from the scan thread
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Obtain a handle that can cancel this session from another thread
    pub fn cancel_token(&self) -> CancelToken {
        CancelToken(self.cancel.clone())
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Report progress unconditionally; used for the mandatory 0% and
    /// completion notifications
    pub fn report(&self, current: usize, total: usize, message: &str) {
        if let Some(callback) = &self.progress {
            callback(current, total, message);
        }
        *self.last_progress.lock().unwrap() = Some(Instant::now());
    }

    /// Report progress unless an update fired within the throttle interval
    pub fn report_throttled(&self, current: usize, total: usize, message: &str) {
        if self.progress.is_none() {
            return;
        }
        {
            let last = self.last_progress.lock().unwrap();
            if let Some(at) = *last {
                if at.elapsed() < PROGRESS_INTERVAL {
                    return;
                }
            }
        }
        self.report(current, total, message);
    }

    pub fn set_files_analyzed(&self, count: usize) {
        self.files_analyzed.store(count, Ordering::Relaxed);
    }

    pub fn add_comparison(&self) -> usize {
        self.comparisons.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn comparisons(&self) -> usize {
        self.comparisons.load(Ordering::Relaxed)
    }

    pub fn add_duplicates(&self, count: usize, recoverable: u64) {
        self.duplicate_files.fetch_add(count, Ordering::Relaxed);
        self.recoverable_bytes
            .fetch_add(recoverable, Ordering::Relaxed);
    }

    pub fn files_analyzed(&self) -> usize {
        self.files_analyzed.load(Ordering::Relaxed)
    }

    pub fn duplicate_files(&self) -> usize {
        self.duplicate_files.load(Ordering::Relaxed)
    }

    pub fn recoverable_bytes(&self) -> u64 {
        self.recoverable_bytes.load(Ordering::Relaxed)
    }
}

// -- Tests --

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_token_flips_the_shared_flag() {
        let session = ScanSession::new();
        let token = session.cancel_token();
        assert!(!session.is_cancelled());

        token.cancel();
        assert!(session.is_cancelled());
        assert!(token.is_cancelled());
    }

    #[test]
    fn counters_accumulate() {
        let session = ScanSession::new();
        session.set_files_analyzed(5);
        session.add_comparison();
        session.add_comparison();
        session.add_duplicates(3, 1024);

        assert_eq!(session.files_analyzed(), 5);
        assert_eq!(session.comparisons(), 2);
        assert_eq!(session.duplicate_files(), 3);
        assert_eq!(session.recoverable_bytes(), 1024);
    }

    #[test]
    fn unthrottled_reports_always_fire() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let session = ScanSession::new().with_progress(move |current, total, msg| {
            sink.lock().unwrap().push((current, total, msg.to_string()));
        });

        session.report(0, 10, "start");
        session.report(10, 10, "done");
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn throttled_reports_are_coalesced() {
        let seen = Arc::new(Mutex::new(0usize));
        let sink = seen.clone();
        let session = ScanSession::new().with_progress(move |_, _, _| {
            *sink.lock().unwrap() += 1;
        });

        session.report(0, 100, "start");
        for i in 1..50 {
            session.report_throttled(i, 100, "tick");
        }
        // Burst within the interval collapses to the initial report
        assert_eq!(*seen.lock().unwrap(), 1);
    }
}
