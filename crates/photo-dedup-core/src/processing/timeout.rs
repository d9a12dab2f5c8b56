//! Bounded execution of per-file work.
//!
//! Heavy work (hashing, image decode) runs on a dedicated worker thread and
//! the caller waits on a channel with a deadline. On timeout the worker is
//! flagged as abandoned: it finishes in the background but never publishes
//! its result, so a timed-out unit of work can never write shared state.

use log::warn;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

/// Run `task` on a worker thread, waiting at most `deadline` for the result.
///
/// Returns `ErrorKind::TimedOut` when the deadline expires; the abandoned
/// worker is detached and its result discarded.
pub fn run_with_deadline<T, F>(
    path: &Path,
    operation: &str,
    deadline: Duration,
    task: F,
) -> io::Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let abandoned = Arc::new(AtomicBool::new(false));
    let abandoned_flag = abandoned.clone();
    let (tx, rx) = mpsc::channel();

    let worker = thread::Builder::new()
        .name(format!("{}-worker", operation))
        .spawn(move || {
            let result = task();
            // A timed-out caller is no longer listening; drop the result
            if !abandoned_flag.load(Ordering::SeqCst) {
                let _ = tx.send(result);
            }
        })?;

    match rx.recv_timeout(deadline) {
        Ok(result) => {
            let _ = worker.join();
            Ok(result)
        }
        Err(_) => {
            abandoned.store(true, Ordering::SeqCst);
            warn!(
                "{} timed out after {}s for '{}'",
                operation,
                deadline.as_secs(),
                path.display()
            );
            Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("{} timed out after {:?}", operation, deadline),
            ))
        }
    }
}

// -- Tests --
