//! Scan Lifecycle - Simulated scans driven by timed transitions
//!
//! A started scan is inserted as `Queued`, becomes `Scanning` after the
//! queue delay and `Completed` after the profile's scan duration. Both
//! transitions are guarded by an existence check against the store, so a
//! cancelled scan is never touched again.
//!
//! None of the controller's operations fail: invalid input and stale
//! timers are silent no-ops. There is no real scan process that could fail.

pub mod profile;
pub mod simulation;
pub mod timer;

use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::report::ScanReport;
use crate::store::ReportStore;

pub use profile::{LifecycleConfig, ScanProfile};
pub use simulation::simulated_findings;
pub use timer::TimerSet;

/// Drives queued scans through their lifecycle and owns cancellation
pub struct ScanController {
    store: Arc<ReportStore>,
    timers: Arc<TimerSet>,
    config: LifecycleConfig,
    /// Serializes id allocation with insertion
    start_lock: Mutex<()>,
}

impl ScanController {
    pub fn new(store: Arc<ReportStore>) -> Self {
        Self::with_config(store, LifecycleConfig::default())
    }

    pub fn with_config(store: Arc<ReportStore>, config: LifecycleConfig) -> Self {
        Self {
            store,
            timers: Arc::new(TimerSet::new()),
            config,
            start_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Queue a simulated scan of `target_url`.
    ///
    /// Returns the new scan id, or `None` (leaving the store untouched) when
    /// the target is blank. Must be called from within a tokio runtime.
    pub fn start_scan(&self, target_url: &str, profile: ScanProfile) -> Option<String> {
        let target = target_url.trim();
        if target.is_empty() {
            debug!("Ignoring scan request with empty target");
            return None;
        }

        let scan_id = {
            let _guard = self.start_lock.lock();
            let scan_id = self.next_scan_id();
            self.store.prepend(ScanReport::queued(
                &scan_id,
                format!("Scan for {}", target),
                Some(target.to_string()),
                Utc::now(),
            ));
            scan_id
        };

        info!("Queued {} scan {} for {}", profile, scan_id, target);
        self.schedule_transitions(&scan_id, target, profile);
        Some(scan_id)
    }

    fn schedule_transitions(&self, scan_id: &str, target: &str, profile: ScanProfile) {
        let store = Arc::clone(&self.store);
        let id = scan_id.to_string();
        self.timers
            .schedule(scan_id, self.config.queue_delay(), move || {
                if store.replace_with(&id, |report| report.start_scanning()) {
                    debug!("Scan {} is now scanning", id);
                } else {
                    debug!("Scan {} vanished before scanning started", id);
                }
            });

        let store = Arc::clone(&self.store);
        let timers = Arc::clone(&self.timers);
        let id = scan_id.to_string();
        let target = target.to_string();
        self.timers
            .schedule(scan_id, self.config.completion_delay(profile), move || {
                let findings = simulated_findings(&id, &target, profile);
                let completed = store.replace_with(&id, |report| {
                    report.start_scanning();
                    report.complete(findings)
                });
                if completed {
                    info!("Scan {} completed", id);
                } else {
                    debug!("Scan {} vanished before completion", id);
                }
                timers.release(&id);
            });
    }

    /// `scan-NNN` from the store size, skipping ids still in use
    fn next_scan_id(&self) -> String {
        let mut n = self.store.len() + 1;
        loop {
            let candidate = format!("scan-{:03}", n);
            if !self.store.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Stop a scan's pending transitions and drop its report.
    ///
    /// Idempotent; unknown ids are ignored.
    pub fn cancel_scan(&self, scan_id: &str) {
        let aborted = self.timers.cancel(scan_id);
        match self.store.remove(scan_id) {
            Some(report) => info!(
                "Cancelled scan {} ({}, {} pending transitions)",
                scan_id,
                report.status(),
                aborted
            ),
            None => debug!("Cancel requested for unknown scan {}", scan_id),
        }
    }

    /// Whether the scan still has transitions waiting to fire
    pub fn is_pending(&self, scan_id: &str) -> bool {
        self.timers.is_pending(scan_id)
    }

    /// Reports that have not completed yet, in store order
    pub fn pending_scans(&self) -> Vec<ScanReport> {
        self.store
            .list()
            .into_iter()
            .filter(|r| !r.is_completed())
            .collect()
    }
}

impl Drop for ScanController {
    fn drop(&mut self) {
        self.timers.cancel_all();
    }
}

impl std::fmt::Debug for ScanController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanController")
            .field("config", &self.config)
            .field("timers", &self.timers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::report::{ScanStatus, Severity};

    fn controller() -> (Arc<ReportStore>, ScanController) {
        let store = Arc::new(ReportStore::new());
        let controller = ScanController::new(Arc::clone(&store));
        (store, controller)
    }

    #[tokio::test(start_paused = true)]
    async fn blank_target_is_rejected() {
        let (store, controller) = controller();
        assert!(controller.start_scan("", ScanProfile::Quick).is_none());
        assert!(controller.start_scan("   ", ScanProfile::Full).is_none());
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn target_is_trimmed() {
        let (store, controller) = controller();
        let id = controller.start_scan("  foo.com ", ScanProfile::Quick).unwrap();
        let report = store.get(&id).unwrap();
        assert_eq!(report.target_url.as_deref(), Some("foo.com"));
        assert_eq!(report.name, "Scan for foo.com");
    }

    #[tokio::test(start_paused = true)]
    async fn quick_scan_walks_through_lifecycle() {
        let (store, controller) = controller();
        let id = controller.start_scan("foo.com", ScanProfile::Quick).unwrap();
        assert_eq!(id, "scan-001");
        assert_eq!(store.get(&id).unwrap().status(), ScanStatus::Queued);
        assert!(controller.is_pending(&id));

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(store.get(&id).unwrap().status(), ScanStatus::Scanning);
        assert!(store.get(&id).unwrap().vulnerabilities().is_empty());

        tokio::time::sleep(Duration::from_millis(8_000)).await;
        let report = store.get(&id).unwrap();
        assert_eq!(report.status(), ScanStatus::Completed);
        assert_eq!(report.summary().high, 1);
        assert_eq!(report.summary().medium, 1);
        assert_eq!(report.vulnerabilities()[1].severity, Severity::Medium);
        assert!(!controller.is_pending(&id));
        assert!(controller.pending_scans().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_scan_is_never_revived() {
        let (store, controller) = controller();
        let id = controller.start_scan("foo.com", ScanProfile::Full).unwrap();

        tokio::time::sleep(Duration::from_millis(3_000)).await;
        assert_eq!(store.get(&id).unwrap().status(), ScanStatus::Scanning);

        controller.cancel_scan(&id);
        assert!(!store.contains(&id));
        assert!(!controller.is_pending(&id));

        tokio::time::sleep(Duration::from_millis(20_000)).await;
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn ids_stay_unique_after_cancellation() {
        let (store, controller) = controller();
        let first = controller.start_scan("a.com", ScanProfile::Quick).unwrap();
        let second = controller.start_scan("b.com", ScanProfile::Quick).unwrap();
        assert_eq!((first.as_str(), second.as_str()), ("scan-001", "scan-002"));

        controller.cancel_scan(&first);
        let third = controller.start_scan("c.com", ScanProfile::Quick).unwrap();
        assert_ne!(third, second);
        assert_eq!(store.ids(), vec![third, second]);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_timings_are_honoured() {
        let store = Arc::new(ReportStore::new());
        let controller = ScanController::with_config(
            Arc::clone(&store),
            LifecycleConfig {
                queue_delay_ms: 10,
                quick_scan_ms: 20,
                full_scan_ms: 40,
            },
        );
        let id = controller.start_scan("x.io", ScanProfile::Quick).unwrap();

        tokio::time::sleep(Duration::from_millis(35)).await;
        assert!(store.get(&id).unwrap().is_completed());
    }
}
