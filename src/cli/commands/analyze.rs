//! Analyze command - AI remediation plan for one vulnerability

use anyhow::Result;
use reconx::errors::ReconxError;
use reconx::ui::{Printer, Spinner, Theme};
use reconx::Dashboard;

use crate::cli::find_completed_report;

pub async fn run(dashboard: &Dashboard, report_id: &str, vulnerability_id: &str) -> Result<()> {
    let printer = Printer::new();
    let theme = Theme::new(printer.mode());

    let report = find_completed_report(dashboard, report_id)?;
    let Some(vuln) = report.vulnerability(vulnerability_id) else {
        return Err(ReconxError::unknown_vulnerability(vulnerability_id, &report).into());
    };

    if !dashboard.gateway().is_initialized() {
        printer.warning("No AI provider configured (set GEMINI_API_KEY or choose --provider ollama)");
    }

    println!("{} {}", theme.severity(vuln.severity), vuln.name);
    printer.separator();

    let mut spinner = Spinner::new(printer.mode());
    spinner.start("Analyzing...");
    let analysis = dashboard
        .analyze(&report.id, &vuln.id)
        .await
        .unwrap_or_default();
    spinner.finish_and_clear();

    printer.println(&analysis);
    Ok(())
}
