//! Export command - Write a report to Markdown or JSON

use std::path::Path;

use anyhow::Result;
use reconx::errors::ReconxError;
use reconx::reporter::{self, ExportFormat};
use reconx::ui::{Printer, Spinner};
use reconx::Dashboard;

use crate::cli::find_completed_report;

pub async fn run(
    dashboard: &Dashboard,
    report_id: &str,
    format: ExportFormat,
    output_dir: &Path,
    with_analysis: bool,
) -> Result<()> {
    let printer = Printer::new();
    let report = find_completed_report(dashboard, report_id)?;

    if with_analysis && format == ExportFormat::Markdown {
        let mut spinner = Spinner::new(printer.mode());
        for vuln in report.vulnerabilities() {
            spinner.start(&format!("Analyzing {}", vuln.name));
            dashboard.analyze(&report.id, &vuln.id).await;
            spinner.finish_and_clear();
        }
    }

    let path = reporter::write_export(&report, dashboard.notes(), format, output_dir)
        .map_err(|e| ReconxError::export_failed(&e))?;
    printer.success(&format!("Exported {} to {}", report.id, path.display()));
    Ok(())
}
