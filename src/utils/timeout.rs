use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Runs `work` on a helper thread and waits at most `timeout` for its result
///
/// Returns `None` on timeout or if the worker panicked. A timed-out worker is left to finish
/// in the background; its result is discarded.
pub fn run_with_timeout<T, F>(timeout: Duration, work: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        // Receiver may already be gone after a timeout
        let _ = tx.send(work());
    });

    rx.recv_timeout(timeout).ok()
}
