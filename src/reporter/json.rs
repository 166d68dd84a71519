//! JSON Reporter

use anyhow::{Context, Result};

use crate::report::ScanReport;

use super::Report;

/// Pretty-printed JSON envelope around `report`
pub fn generate_json(report: &ScanReport) -> Result<String> {
    serde_json::to_string_pretty(&Report::new(report)).context("Failed to serialize report")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::seed_reports;

    #[test]
    fn wraps_report_in_envelope() {
        let report = seed_reports().unwrap().remove(0);
        let json = generate_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["tool"], "reconx");
        assert!(value["generatedAt"].is_string());
        assert_eq!(value["report"]["id"], "scan-001");
        assert_eq!(value["report"]["targetUrl"], "prod.example.com");
        assert_eq!(value["report"]["status"], "Completed");
        assert_eq!(value["report"]["attackPaths"][0]["nodes"][0]["type"], "entry");
    }

    #[test]
    fn exported_report_reads_back() {
        let report = seed_reports().unwrap().remove(1);
        let value: serde_json::Value =
            serde_json::from_str(&generate_json(&report).unwrap()).unwrap();
        let restored: ScanReport = serde_json::from_value(value["report"].clone()).unwrap();
        assert_eq!(restored, report);
    }
}
