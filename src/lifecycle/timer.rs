//! Timer Set - Cancellable deferred callbacks grouped by key
//!
//! Each scheduled callback runs on its own tokio task after a delay.
//! Cancelling a key aborts every task still waiting under it; a callback
//! that has already started is left to finish.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

/// Deferred callbacks keyed by owner id (a scan id)
#[derive(Default)]
pub struct TimerSet {
    timers: Mutex<HashMap<String, Vec<JoinHandle<()>>>>,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `callback` once `delay` has elapsed, unless `key` is cancelled first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, key: &str, delay: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });

        self.timers
            .lock()
            .entry(key.to_string())
            .or_default()
            .push(handle);
    }

    /// Abort all pending callbacks for `key`. Returns how many were still waiting.
    ///
    /// Unknown or already-cancelled keys are a no-op.
    pub fn cancel(&self, key: &str) -> usize {
        let Some(handles) = self.timers.lock().remove(key) else {
            return 0;
        };

        let mut aborted = 0;
        for handle in handles {
            if !handle.is_finished() {
                aborted += 1;
            }
            handle.abort();
        }
        aborted
    }

    /// Forget the handles for `key` without aborting them
    pub fn release(&self, key: &str) {
        self.timers.lock().remove(key);
    }

    /// Whether any callback under `key` has yet to run to completion
    pub fn is_pending(&self, key: &str) -> bool {
        self.timers
            .lock()
            .get(key)
            .is_some_and(|handles| handles.iter().any(|h| !h.is_finished()))
    }

    /// Keys that still hold timers
    pub fn keys(&self) -> Vec<String> {
        self.timers.lock().keys().cloned().collect()
    }

    /// Abort everything
    pub fn cancel_all(&self) {
        let drained: Vec<_> = self.timers.lock().drain().collect();
        for (_, handles) in drained {
            for handle in handles {
                handle.abort();
            }
        }
    }
}

impl std::fmt::Debug for TimerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerSet")
            .field("keys", &self.timers.lock().len())
            .finish()
    }
}
