//! Dashboard - Wires the store, scan controller, selection and AI gateway
//!
//! The [`Dashboard`] is what a front end talks to. It owns every component
//! and exposes the user-level operations across them.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use crate::ai::{AnalysisGateway, AnalysisNotes};
use crate::config::AppConfig;
use crate::lifecycle::{LifecycleConfig, ScanController, ScanProfile};
use crate::report::{seed_reports, ScanReport, SeveritySummary};
use crate::selection::SelectionState;
use crate::store::ReportStore;

/// Aggregate counts over the whole store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub total_reports: usize,
    pub completed: usize,
    pub in_progress: usize,
    /// Summed over completed reports
    pub severity: SeveritySummary,
}

pub struct Dashboard {
    store: Arc<ReportStore>,
    controller: ScanController,
    selection: SelectionState,
    gateway: Arc<AnalysisGateway>,
    notes: AnalysisNotes,
}

impl Dashboard {
    /// Seed reports plus the gateway described by `config`
    pub fn seeded(config: &AppConfig) -> Result<Self> {
        let reports = seed_reports().context("Seed data is inconsistent")?;
        Ok(Self::with_gateway(
            reports,
            config.lifecycle,
            AnalysisGateway::from_config(&config.ai),
        ))
    }

    pub fn with_gateway(
        reports: Vec<ScanReport>,
        lifecycle: LifecycleConfig,
        gateway: AnalysisGateway,
    ) -> Self {
        let store = Arc::new(ReportStore::with_reports(reports));
        Self {
            controller: ScanController::with_config(Arc::clone(&store), lifecycle),
            selection: SelectionState::new(Arc::clone(&store)),
            gateway: Arc::new(gateway),
            notes: AnalysisNotes::new(),
            store,
        }
    }

    pub fn store(&self) -> &Arc<ReportStore> {
        &self.store
    }

    pub fn controller(&self) -> &ScanController {
        &self.controller
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn gateway(&self) -> &Arc<AnalysisGateway> {
        &self.gateway
    }

    pub fn notes(&self) -> &AnalysisNotes {
        &self.notes
    }

    /// Queue a scan; `None` for a blank target
    pub fn start_scan(&self, target_url: &str, profile: ScanProfile) -> Option<String> {
        self.controller.start_scan(target_url, profile)
    }

    /// Cancel a scan, dropping the selection if it pointed at it
    pub fn cancel_scan(&self, scan_id: &str) {
        self.controller.cancel_scan(scan_id);
        if self.selection.is_selected(scan_id) {
            self.selection.clear();
        }
    }

    /// Open a completed report
    pub fn select(&self, report_id: &str) -> bool {
        self.selection.select_id(report_id)
    }

    /// Ask the gateway for a remediation plan and keep it as a note.
    ///
    /// Returns `None` when the report or vulnerability does not exist.
    pub async fn analyze(&self, report_id: &str, vulnerability_id: &str) -> Option<String> {
        let report = self.store.get(report_id)?;
        let vulnerability = report.vulnerability(vulnerability_id)?.clone();

        self.notes.mark_pending(&vulnerability.id);
        let analysis = self.gateway.request_analysis(&vulnerability, &report).await;
        self.notes.set_ready(&vulnerability.id, analysis.clone());
        debug!("Stored analysis for {}", vulnerability.id);
        Some(analysis)
    }

    /// Chat about the selected report, or generally when nothing is selected
    pub async fn chat(&self, message: &str) -> String {
        let report = self.selection.current();
        self.gateway.send_chat_message(report.as_ref(), message).await
    }

    pub fn overview(&self) -> DashboardOverview {
        let reports = self.store.list();
        let mut overview = DashboardOverview {
            total_reports: reports.len(),
            ..Default::default()
        };

        for report in &reports {
            if report.is_completed() {
                overview.completed += 1;
                overview.severity.merge(report.summary());
            } else {
                overview.in_progress += 1;
            }
        }
        overview
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("store", &self.store)
            .field("selection", &self.selection)
            .field("gateway", &self.gateway)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockProvider;

    fn dashboard() -> (Arc<MockProvider>, Dashboard) {
        let mock = Arc::new(MockProvider::new());
        let dashboard = Dashboard::with_gateway(
            seed_reports().unwrap(),
            LifecycleConfig::default(),
            AnalysisGateway::with_provider(mock.clone()),
        );
        (mock, dashboard)
    }

    #[tokio::test]
    async fn overview_of_seed_data() {
        let (_mock, dashboard) = dashboard();
        let overview = dashboard.overview();
        assert_eq!(overview.total_reports, 2);
        assert_eq!(overview.completed, 2);
        assert_eq!(overview.in_progress, 0);
        assert_eq!(overview.severity.critical, 2);
        assert_eq!(overview.severity.total(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn overview_counts_running_scans() {
        let (_mock, dashboard) = dashboard();
        dashboard.start_scan("foo.com", ScanProfile::Quick).unwrap();
        let overview = dashboard.overview();
        assert_eq!(overview.total_reports, 3);
        assert_eq!(overview.in_progress, 1);
        assert_eq!(overview.severity.total(), 5);
    }

    #[tokio::test]
    async fn analyze_stores_note() {
        let (mock, dashboard) = dashboard();
        mock.add_response("Rotate credentials.").await;

        let analysis = dashboard.analyze("scan-001", "vuln-002").await;
        assert_eq!(analysis.as_deref(), Some("Rotate credentials."));
        assert_eq!(
            dashboard.notes().ready_text("vuln-002").as_deref(),
            Some("Rotate credentials.")
        );
    }

    #[tokio::test]
    async fn analyze_unknown_targets() {
        let (mock, dashboard) = dashboard();
        assert!(dashboard.analyze("scan-404", "vuln-001").await.is_none());
        assert!(dashboard.analyze("scan-001", "vuln-404").await.is_none());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn chat_uses_selected_report() {
        let (mock, dashboard) = dashboard();
        dashboard.select("scan-002");
        dashboard.chat("Summarize").await;

        let request = mock.last_request().await.unwrap();
        assert!(request
            .system
            .unwrap()
            .contains("Staging Environment Web App Scan"));
        assert!(dashboard.gateway().history("scan-002").await.len() == 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_clears_matching_selection() {
        let (_mock, dashboard) = dashboard();
        dashboard.select("scan-001");
        dashboard.cancel_scan("scan-001");
        assert!(dashboard.selection().selected_id().is_none());
        assert!(!dashboard.store().contains("scan-001"));
    }
}
