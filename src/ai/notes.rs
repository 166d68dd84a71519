//! Analysis Notes - Remediation analyses attached to vulnerabilities

use std::collections::HashMap;

use parking_lot::RwLock;

/// State of one vulnerability's analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisNote {
    Pending,
    Ready(String),
}

impl AnalysisNote {
    pub fn text(&self) -> Option<&str> {
        match self {
            AnalysisNote::Pending => None,
            AnalysisNote::Ready(text) => Some(text),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, AnalysisNote::Pending)
    }
}

impl std::fmt::Display for AnalysisNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisNote::Pending => write!(f, "Analyzing..."),
            AnalysisNote::Ready(text) => write!(f, "{}", text),
        }
    }
}

/// Notes keyed by vulnerability id
#[derive(Debug, Default)]
pub struct AnalysisNotes {
    notes: RwLock<HashMap<String, AnalysisNote>>,
}

impl AnalysisNotes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_pending(&self, vulnerability_id: &str) {
        self.notes
            .write()
            .insert(vulnerability_id.to_string(), AnalysisNote::Pending);
    }

    pub fn set_ready(&self, vulnerability_id: &str, text: impl Into<String>) {
        self.notes
            .write()
            .insert(vulnerability_id.to_string(), AnalysisNote::Ready(text.into()));
    }

    pub fn get(&self, vulnerability_id: &str) -> Option<AnalysisNote> {
        self.notes.read().get(vulnerability_id).cloned()
    }

    /// Finished analysis text, if any
    pub fn ready_text(&self, vulnerability_id: &str) -> Option<String> {
        self.get(vulnerability_id)
            .and_then(|note| note.text().map(str::to_string))
    }

    pub fn remove(&self, vulnerability_id: &str) -> Option<AnalysisNote> {
        self.notes.write().remove(vulnerability_id)
    }

    pub fn len(&self) -> usize {
        self.notes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.read().is_empty()
    }
}
