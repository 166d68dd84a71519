//! Reporter - Scan report export

pub mod json;
pub mod markdown;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::ai::AnalysisNotes;
use crate::report::ScanReport;

pub use json::generate_json;
pub use markdown::generate_markdown;

/// Export format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Markdown,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Json => "json",
        }
    }
}

/// Envelope stamped on machine-readable exports
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report<T: Serialize> {
    pub tool: String,
    pub version: String,
    pub generated_at: String,
    pub report: T,
}

impl<T: Serialize> Report<T> {
    pub fn new(report: T) -> Self {
        Self {
            tool: "reconx".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            report,
        }
    }
}

/// Render `report` in `format`
pub fn export(report: &ScanReport, notes: &AnalysisNotes, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Markdown => Ok(generate_markdown(report, notes)),
        ExportFormat::Json => generate_json(report),
    }
}

/// Default download name, e.g. `reconx-report-scan-001.md`
pub fn file_name(report: &ScanReport, format: ExportFormat) -> String {
    format!("reconx-report-{}.{}", report.id, format.extension())
}

/// Write the export into `dir` under its default name. Returns the path written.
pub fn write_export(
    report: &ScanReport,
    notes: &AnalysisNotes,
    format: ExportFormat,
    dir: &Path,
) -> Result<PathBuf> {
    let content = export(report, notes, format)?;
    let path = dir.join(file_name(report, format));
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Exported {} to {}", report.id, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::seed_reports;

    #[test]
    fn file_names_follow_format() {
        let report = seed_reports().unwrap().remove(0);
        assert_eq!(file_name(&report, ExportFormat::Markdown), "reconx-report-scan-001.md");
        assert_eq!(file_name(&report, ExportFormat::Json), "reconx-report-scan-001.json");
    }

    #[test]
    fn writes_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let report = seed_reports().unwrap().remove(1);

        let path = write_export(&report, &AnalysisNotes::new(), ExportFormat::Markdown, dir.path())
            .unwrap();
        assert!(path.ends_with("reconx-report-scan-002.md"));
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("Staging Environment Web App Scan"));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let report = seed_reports().unwrap().remove(1);
        let missing = dir.path().join("nope");
        assert!(write_export(&report, &AnalysisNotes::new(), ExportFormat::Json, &missing).is_err());
    }
}
