//! Selection State - The single report currently open for detailed viewing
//!
//! Only the id is held. [`SelectionState::current`] resolves it against the
//! store on every read, so callers always see the latest report content and
//! a removed report simply reads back as no selection.
//!
//! Observers are called with no selection lock held, so they may read or
//! change the selection themselves.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::report::ScanReport;
use crate::store::ReportStore;

/// Callback receiving the resolved selection whenever it changes
pub type SelectionObserver = Arc<dyn Fn(Option<&ScanReport>) + Send + Sync>;

pub struct SelectionState {
    store: Arc<ReportStore>,
    selected: Mutex<Option<String>>,
    observers: Mutex<Vec<SelectionObserver>>,
}

impl SelectionState {
    pub fn new(store: Arc<ReportStore>) -> Self {
        Self {
            store,
            selected: Mutex::new(None),
            observers: Mutex::new(Vec::new()),
        }
    }

    /// Open `report`. Reports that are not Completed are ignored.
    pub fn select(&self, report: &ScanReport) -> bool {
        if !report.is_completed() {
            tracing::debug!(
                "Ignoring selection of {} report {}",
                report.status(),
                report.id
            );
            return false;
        }
        self.set(Some(report.id.clone()));
        true
    }

    /// Open the report with `id`, as stored right now
    pub fn select_id(&self, id: &str) -> bool {
        match self.store.get(id) {
            Some(report) => self.select(&report),
            None => false,
        }
    }

    pub fn clear(&self) {
        self.set(None);
    }

    /// The selected report as it currently exists in the store
    pub fn current(&self) -> Option<ScanReport> {
        let id = self.selected.lock().clone()?;
        self.store.get(&id)
    }

    pub fn selected_id(&self) -> Option<String> {
        self.selected.lock().clone()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.lock().as_deref() == Some(id)
    }

    pub fn subscribe<F>(&self, observer: F)
    where
        F: Fn(Option<&ScanReport>) + Send + Sync + 'static,
    {
        self.observers.lock().push(Arc::new(observer));
    }

    fn set(&self, id: Option<String>) {
        {
            let mut selected = self.selected.lock();
            if *selected == id {
                return;
            }
            *selected = id;
        }

        let current = self.current();
        let observers: Vec<SelectionObserver> = self.observers.lock().iter().cloned().collect();
        for observer in &observers {
            observer(current.as_ref());
        }
    }
}

impl std::fmt::Debug for SelectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionState")
            .field("selected", &*self.selected.lock())
            .finish()
    }
}
