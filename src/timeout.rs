//! Download Timeout Manager
//!
//! A process-wide (per-`Engine`) one-shot timer restarted by every
//! `ONDOWNLOAD`, cancelled on `notifyDownloadStarted` or macro end. On fire,
//! it writes `EngineError::DownloadTimeout` into the shared pending-error
//! slot the executor reads between commands — the one asynchronous fault
//! this engine consumes (see `executor`'s pending-error loop check).

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::EngineError;

pub struct DownloadTimeoutManager {
    pending_error: Arc<Mutex<Option<EngineError>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
    floor_secs: u64,
}

impl DownloadTimeoutManager {
    pub fn new(pending_error: Arc<Mutex<Option<EngineError>>>, floor_secs: u64) -> Self {
        Self { pending_error, handle: Mutex::new(None), floor_secs }
    }

    /// Starts (or restarts) the timer for `!TIMEOUT_TAG` seconds, clamped to
    /// `max(floor_secs, 4 * timeout_tag_secs)` per the Cancellation and
    /// Timeouts contract. Any previously running timer is cancelled first.
    pub async fn start(&self, timeout_tag_secs: f64) {
        self.cancel().await;
        let wait_secs = (4.0 * timeout_tag_secs).max(self.floor_secs as f64);
        let pending_error = Arc::clone(&self.pending_error);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_secs_f64(wait_secs)).await;
            let mut slot = pending_error.lock().await;
            if slot.is_none() {
                *slot = Some(EngineError::DownloadTimeout);
            }
        });
        *self.handle.lock().await = Some(handle);
    }

    /// Cancels any running timer without touching the pending-error slot.
    /// Called by `notifyDownloadStarted` and on macro end.
    pub async fn cancel(&self) {
        if let Some(handle) = self.handle.lock().await.take() {
            handle.abort();
        }
    }
}
