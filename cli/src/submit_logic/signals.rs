use std::future::Future;
use std::io;
use std::sync::Arc;

use lib_predict::ProgressTracker;

/// Exit status of a process ended by SIGINT.
pub const INTERRUPT_EXIT_CODE: i32 = 130;

/// Waits for interrupts from `next_interrupt`.
///
/// The first one requests a cooperative stop on `progress`. Both sides may be
/// parked in a blocking read at that point, so a second interrupt calls `exit`
/// with `INTERRUPT_EXIT_CODE` instead of waiting for them.
pub async fn handle_interrupts<S, Fut, X>(mut next_interrupt: S, progress: Arc<ProgressTracker>, exit: X)
where
    S: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
    X: FnOnce(i32),
{
    if let Err(e) = next_interrupt().await {
        log::warn!("Unable to listen for Ctrl-C: {}", e);
        return;
    }
    log::info!("Ctrl-C received, stopping after the current example. Press Ctrl-C again to exit immediately.");
    progress.request_stop();

    if next_interrupt().await.is_err() {
        return;
    }
    log::warn!("Second Ctrl-C received, exiting without waiting for the run to finish.");
    exit(INTERRUPT_EXIT_CODE);
}
