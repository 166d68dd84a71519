//! Report Store - The authoritative, observable collection of scan reports
//!
//! All mutation goes through [`ReportStore::prepend`], [`ReportStore::upsert`],
//! [`ReportStore::replace_with`] or [`ReportStore::remove`]. Every real mutation
//! pushes a full snapshot to each observer, synchronously and in mutation order.
//!
//! Observers are called after the state lock is released, so they may read
//! the store (or anything resolving against it, such as the selection).
//! Delivery is serialised by a separate reentrant lock: snapshots arrive in
//! mutation order, and an observer that mutates the store from its own thread
//! does not deadlock.

use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex};

use crate::report::ScanReport;

/// Callback receiving the full ordered snapshot after each mutation
pub type Observer = Arc<dyn Fn(&[ScanReport]) + Send + Sync>;

/// Handle returned by [`ReportStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct StoreState {
    reports: Vec<ScanReport>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl StoreState {
    fn position(&self, id: &str) -> Option<usize> {
        self.reports.iter().position(|r| r.id == id)
    }

    fn observers(&self) -> Vec<Observer> {
        self.observers.iter().map(|(_, o)| Arc::clone(o)).collect()
    }
}

/// Ordered in-memory report collection
pub struct ReportStore {
    state: Mutex<StoreState>,
    delivery: ReentrantMutex<()>,
}

impl Default for ReportStore {
    fn default() -> Self {
        Self::with_reports(Vec::new())
    }
}

impl ReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with reports, in the given order
    pub fn with_reports(reports: Vec<ScanReport>) -> Self {
        Self {
            state: Mutex::new(StoreState {
                reports,
                ..Default::default()
            }),
            delivery: ReentrantMutex::new(()),
        }
    }

    /// Current snapshot
    pub fn list(&self) -> Vec<ScanReport> {
        self.state.lock().reports.clone()
    }

    pub fn get(&self, id: &str) -> Option<ScanReport> {
        let state = self.state.lock();
        state.position(id).map(|idx| state.reports[idx].clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.lock().position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.state.lock().reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().reports.is_empty()
    }

    /// Report ids in store order
    pub fn ids(&self) -> Vec<String> {
        self.state.lock().reports.iter().map(|r| r.id.clone()).collect()
    }

    /// Register an observer. The current snapshot is replayed immediately.
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&[ScanReport]) + Send + Sync + 'static,
    {
        let _delivery = self.delivery.lock();
        let observer: Observer = Arc::new(observer);
        let (id, snapshot) = {
            let mut state = self.state.lock();
            let id = SubscriptionId(state.next_subscription);
            state.next_subscription += 1;
            state.observers.push((id, Arc::clone(&observer)));
            (id, state.reports.clone())
        };

        tracing::trace!("Observer {:?} subscribed", id);
        observer(&snapshot);
        id
    }

    /// Drop an observer. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.state.lock();
        let before = state.observers.len();
        state.observers.retain(|(sub, _)| *sub != id);
        state.observers.len() != before
    }

    /// Insert at the end, or replace in place when the id already exists
    pub fn upsert(&self, report: ScanReport) {
        self.mutate(|state| {
            match state.position(&report.id) {
                Some(idx) => {
                    tracing::debug!("Replacing report {} at position {}", report.id, idx);
                    state.reports[idx] = report;
                }
                None => {
                    tracing::debug!("Appending report {}", report.id);
                    state.reports.push(report);
                }
            }
            Some(())
        });
    }

    /// Insert at the front, or replace in place when the id already exists
    pub fn prepend(&self, report: ScanReport) {
        self.mutate(|state| {
            match state.position(&report.id) {
                Some(idx) => {
                    tracing::debug!("Replacing report {} at position {}", report.id, idx);
                    state.reports[idx] = report;
                }
                None => {
                    tracing::debug!("Prepending report {}", report.id);
                    state.reports.insert(0, report);
                }
            }
            Some(())
        });
    }

    /// Replace the report with `id` by a modified copy, keeping its position.
    ///
    /// The existence check and the replacement happen under one lock, so a
    /// concurrent [`remove`](Self::remove) either wins entirely or not at all.
    /// Returns false, without notifying, when the id is absent or `update`
    /// reports no change.
    pub fn replace_with<F>(&self, id: &str, update: F) -> bool
    where
        F: FnOnce(&mut ScanReport) -> bool,
    {
        self.mutate(|state| {
            let idx = state.position(id)?;
            let mut updated = state.reports[idx].clone();
            if !update(&mut updated) {
                return None;
            }

            tracing::debug!("Replacing report {} at position {}", id, idx);
            state.reports[idx] = updated;
            Some(())
        })
        .is_some()
    }

    /// Remove the report with `id`. Absent ids are a silent no-op.
    pub fn remove(&self, id: &str) -> Option<ScanReport> {
        self.mutate(|state| {
            let idx = state.position(id)?;
            let removed = state.reports.remove(idx);
            tracing::debug!("Removed report {}", id);
            Some(removed)
        })
    }

    /// Apply `change` under the state lock, then deliver the resulting
    /// snapshot with the lock released. `None` means nothing changed.
    fn mutate<R>(&self, change: impl FnOnce(&mut StoreState) -> Option<R>) -> Option<R> {
        let _delivery = self.delivery.lock();
        let (result, snapshot, observers) = {
            let mut state = self.state.lock();
            let result = change(&mut *state)?;
            (result, state.reports.clone(), state.observers())
        };

        for observer in &observers {
            observer(&snapshot);
        }
        Some(result)
    }
}

impl std::fmt::Debug for ReportStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ReportStore")
            .field("reports", &state.reports.len())
            .field("observers", &state.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use chrono::Utc;

    use crate::report::ScanStatus;

    fn report(id: &str) -> ScanReport {
        ScanReport::queued(id, format!("Scan {id}"), None, Utc::now())
    }

    fn ids(reports: &[ScanReport]) -> Vec<String> {
        reports.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn upsert_appends_then_replaces_in_place() {
        let store = ReportStore::new();
        store.upsert(report("a"));
        store.upsert(report("b"));
        store.upsert(report("c"));

        let mut updated = report("b");
        updated.start_scanning();
        store.upsert(updated);

        assert_eq!(store.ids(), vec!["a", "b", "c"]);
        assert_eq!(store.get("b").unwrap().status(), ScanStatus::Scanning);
    }

    #[test]
    fn prepend_puts_new_reports_first() {
        let store = ReportStore::with_reports(vec![report("old")]);
        store.prepend(report("new"));
        assert_eq!(store.ids(), vec!["new", "old"]);

        // Existing id keeps its position
        store.prepend(report("old"));
        assert_eq!(store.ids(), vec!["new", "old"]);
    }

    #[test]
    fn remove_absent_id_is_silent() {
        let store = ReportStore::with_reports(vec![report("a")]);
        let calls = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&calls);
        store.subscribe(move |_| *counter.lock() += 1);

        assert!(store.remove("missing").is_none());
        assert_eq!(store.len(), 1);
        // Only the replay on subscribe
        assert_eq!(*calls.lock(), 1);

        assert!(store.remove("a").is_some());
        assert!(store.is_empty());
        assert_eq!(*calls.lock(), 2);
    }

    #[test]
    fn subscribe_replays_and_receives_every_snapshot_in_order() {
        let store = ReportStore::with_reports(vec![report("seed")]);
        let seen: Arc<Mutex<Vec<Vec<String>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |reports| sink.lock().push(ids(reports)));

        store.prepend(report("x"));
        store.upsert(report("y"));
        store.remove("seed");

        let seen = seen.lock();
        assert_eq!(
            *seen,
            vec![
                vec!["seed".to_string()],
                vec!["x".to_string(), "seed".to_string()],
                vec!["x".to_string(), "seed".to_string(), "y".to_string()],
                vec!["x".to_string(), "y".to_string()],
            ]
        );
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let store = ReportStore::new();
        let calls = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&calls);
        let sub = store.subscribe(move |_| *counter.lock() += 1);

        assert!(store.unsubscribe(sub));
        assert!(!store.unsubscribe(sub));
        store.upsert(report("a"));
        assert_eq!(*calls.lock(), 1);
    }

    #[test]
    fn replace_with_is_guarded() {
        let store = ReportStore::with_reports(vec![report("a")]);

        assert!(!store.replace_with("missing", |r| r.start_scanning()));
        assert!(store.replace_with("a", |r| r.start_scanning()));
        // Already scanning: update reports no change
        assert!(!store.replace_with("a", |r| r.start_scanning()));
        assert_eq!(store.get("a").unwrap().status(), ScanStatus::Scanning);
    }

    #[test]
    fn observers_may_read_the_store() {
        let store = Arc::new(ReportStore::with_reports(vec![report("a")]));
        let seen: Arc<Mutex<Vec<(usize, Vec<String>)>>> = Arc::new(Mutex::new(Vec::new()));

        let reader = Arc::clone(&store);
        let sink = Arc::clone(&seen);
        store.subscribe(move |reports| {
            sink.lock().push((reader.len(), reader.ids()));
            assert_eq!(reader.list().len(), reports.len());
        });

        let (tx, rx) = mpsc::channel();
        let writer = Arc::clone(&store);
        thread::spawn(move || {
            writer.upsert(report("b"));
            writer.remove("a");
            let _ = tx.send(());
        });
        rx.recv_timeout(Duration::from_secs(3))
            .expect("mutation returned while observer read the store");

        assert_eq!(
            *seen.lock(),
            vec![
                (1, vec!["a".to_string()]),
                (2, vec!["a".to_string(), "b".to_string()]),
                (1, vec!["b".to_string()]),
            ]
        );
    }

    #[test]
    fn observer_may_mutate_from_its_own_thread() {
        let store = Arc::new(ReportStore::new());
        let writer = Arc::clone(&store);
        store.subscribe(move |reports| {
            if reports.iter().any(|r| r.id == "trigger") {
                writer.remove("trigger");
            }
        });

        let (tx, rx) = mpsc::channel();
        let handle = Arc::clone(&store);
        thread::spawn(move || {
            handle.upsert(report("trigger"));
            let _ = tx.send(());
        });
        rx.recv_timeout(Duration::from_secs(3))
            .expect("nested mutation returned");

        assert!(store.is_empty());
    }
}
