//! Scan Report - One scan's result or in-progress placeholder

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::attack_path::AttackPath;
use super::vulnerability::{SeveritySummary, Vulnerability};

/// Lifecycle status of a scan. Ordered; transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScanStatus {
    Queued,
    Scanning,
    Completed,
}

impl ScanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Queued => "Queued",
            ScanStatus::Scanning => "Scanning",
            ScanStatus::Completed => "Completed",
        }
    }

    /// Queued and Scanning reports may still be cancelled
    pub fn is_cancellable(&self) -> bool {
        !matches!(self, ScanStatus::Completed)
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScanReport {
    id: String,
    name: String,
    timestamp: DateTime<Utc>,
    status: ScanStatus,
    #[serde(default)]
    target_url: Option<String>,
    #[serde(default)]
    vulnerabilities: Vec<Vulnerability>,
    #[serde(default)]
    attack_paths: Vec<AttackPath>,
}

impl From<RawScanReport> for ScanReport {
    fn from(mut raw: RawScanReport) -> Self {
        // Findings only exist once a scan has completed.
        if raw.status != ScanStatus::Completed {
            if !raw.vulnerabilities.is_empty() || !raw.attack_paths.is_empty() {
                tracing::warn!(
                    "Dropping findings from {} report {}",
                    raw.status,
                    raw.id
                );
            }
            raw.vulnerabilities.clear();
            raw.attack_paths.clear();
        }

        // Summary is never trusted from input; it is derived.
        ScanReport {
            summary: SeveritySummary::from_vulnerabilities(&raw.vulnerabilities),
            id: raw.id,
            name: raw.name,
            timestamp: raw.timestamp,
            status: raw.status,
            target_url: raw.target_url,
            vulnerabilities: raw.vulnerabilities,
            attack_paths: raw.attack_paths,
        }
    }
}

/// A scan report
///
/// `summary` always equals the severity counts of `vulnerabilities`; the two
/// are only changed together through [`ScanReport::complete`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawScanReport")]
pub struct ScanReport {
    pub id: String,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    status: ScanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    summary: SeveritySummary,
    vulnerabilities: Vec<Vulnerability>,
    attack_paths: Vec<AttackPath>,
}

impl ScanReport {
    /// A freshly requested scan: no findings, zeroed summary
    pub fn queued(
        id: impl Into<String>,
        name: impl Into<String>,
        target_url: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            timestamp,
            status: ScanStatus::Queued,
            target_url,
            summary: SeveritySummary::default(),
            vulnerabilities: Vec::new(),
            attack_paths: Vec::new(),
        }
    }

    /// A completed report with the given findings
    pub fn completed(
        id: impl Into<String>,
        name: impl Into<String>,
        target_url: Option<String>,
        timestamp: DateTime<Utc>,
        vulnerabilities: Vec<Vulnerability>,
        attack_paths: Vec<AttackPath>,
    ) -> Self {
        let mut report = Self::queued(id, name, target_url, timestamp);
        report.attack_paths = attack_paths;
        report.complete(vulnerabilities);
        report
    }

    pub fn status(&self) -> ScanStatus {
        self.status
    }

    pub fn summary(&self) -> &SeveritySummary {
        &self.summary
    }

    pub fn vulnerabilities(&self) -> &[Vulnerability] {
        &self.vulnerabilities
    }

    pub fn attack_paths(&self) -> &[AttackPath] {
        &self.attack_paths
    }

    pub fn vulnerability(&self, id: &str) -> Option<&Vulnerability> {
        self.vulnerabilities.iter().find(|v| v.id == id)
    }

    pub fn is_completed(&self) -> bool {
        self.status == ScanStatus::Completed
    }

    /// Move from Queued to Scanning. Returns false if the report is past Queued.
    pub fn start_scanning(&mut self) -> bool {
        if self.status != ScanStatus::Queued {
            return false;
        }
        self.status = ScanStatus::Scanning;
        true
    }

    /// Attach findings, recompute the summary and mark Completed.
    /// Returns false if the report was already Completed.
    pub fn complete(&mut self, vulnerabilities: Vec<Vulnerability>) -> bool {
        if self.status == ScanStatus::Completed {
            return false;
        }
        self.summary = SeveritySummary::from_vulnerabilities(&vulnerabilities);
        self.vulnerabilities = vulnerabilities;
        self.status = ScanStatus::Completed;
        true
    }

    pub fn with_attack_path(mut self, path: AttackPath) -> Self {
        self.attack_paths.push(path);
        self
    }

    /// Whether the summary agrees with the vulnerability list
    pub fn is_consistent(&self) -> bool {
        self.summary == SeveritySummary::from_vulnerabilities(&self.vulnerabilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Severity;

    fn queued() -> ScanReport {
        ScanReport::queued("scan-009", "Scan for a.com", Some("a.com".into()), Utc::now())
    }

    #[test]
    fn queued_report_is_empty() {
        let report = queued();
        assert_eq!(report.status(), ScanStatus::Queued);
        assert_eq!(report.summary().total(), 0);
        assert!(report.vulnerabilities().is_empty());
        assert!(report.attack_paths().is_empty());
        assert!(report.status().is_cancellable());
    }

    #[test]
    fn forward_transitions_only() {
        let mut report = queued();
        assert!(report.start_scanning());
        assert!(!report.start_scanning());

        assert!(report.complete(vec![Vulnerability::new("v", Severity::High, "n", "d")]));
        assert_eq!(report.status(), ScanStatus::Completed);
        assert!(!report.status().is_cancellable());

        // Completed is terminal
        assert!(!report.start_scanning());
        assert!(!report.complete(Vec::new()));
        assert_eq!(report.vulnerabilities().len(), 1);
    }

    #[test]
    fn completion_recomputes_summary() {
        let mut report = queued();
        report.complete(vec![
            Vulnerability::new("v1", Severity::Critical, "n", "d"),
            Vulnerability::new("v2", Severity::Low, "n", "d"),
        ]);
        assert_eq!(report.summary().critical, 1);
        assert_eq!(report.summary().low, 1);
        assert!(report.is_consistent());
    }

    #[test]
    fn deserialization_derives_summary() {
        let json = r#"{
            "id": "scan-001",
            "name": "Imported",
            "timestamp": "2023-10-27T10:00:00Z",
            "status": "Completed",
            "summary": {"critical": 9, "high": 9, "medium": 9, "low": 9},
            "vulnerabilities": [
                {"id": "v1", "severity": "High", "name": "n", "description": "d",
                 "affectedAsset": "a", "remediation": "r"}
            ],
            "attackPaths": []
        }"#;

        let report: ScanReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.summary().high, 1);
        assert_eq!(report.summary().total(), 1);
        assert!(report.target_url.is_none());
    }

    #[test]
    fn unfinished_reports_load_without_findings() {
        let json = r#"{
            "id": "scan-002",
            "name": "Half done",
            "timestamp": "2023-10-27T10:00:00Z",
            "status": "Scanning",
            "summary": {"critical": 1, "high": 0, "medium": 0, "low": 0},
            "vulnerabilities": [
                {"id": "v1", "severity": "Critical", "name": "n", "description": "d",
                 "affectedAsset": "a", "remediation": "r"}
            ]
        }"#;

        let report: ScanReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.status(), ScanStatus::Scanning);
        assert!(report.vulnerabilities().is_empty());
        assert!(report.attack_paths().is_empty());
        assert_eq!(report.summary().total(), 0);
        assert!(report.is_consistent());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let value = serde_json::to_value(queued()).unwrap();
        assert_eq!(value["targetUrl"], "a.com");
        assert_eq!(value["status"], "Queued");
        assert!(value["attackPaths"].as_array().unwrap().is_empty());
    }
}
