//! Show command - Full detail of one completed report

use anyhow::Result;
use reconx::ui::{Printer, Theme};
use reconx::{Dashboard, ScanReport};

use crate::cli::{find_completed_report, OutputFormat};

pub fn run(dashboard: &Dashboard, report_id: &str, format: OutputFormat) -> Result<()> {
    let report = find_completed_report(dashboard, report_id)?;
    dashboard.select(&report.id);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report(&report),
    }
    Ok(())
}

pub fn print_report(report: &ScanReport) {
    let printer = Printer::new();
    let theme = Theme::new(printer.mode());
    let summary = report.summary();

    printer.header(&report.name);
    printer.kv("Id", &report.id);
    printer.kv("Scanned", &report.timestamp.format("%Y-%m-%d %H:%M UTC").to_string());
    if let Some(target) = &report.target_url {
        printer.kv("Target", target);
    }
    printer.kv(
        "Summary",
        &format!(
            "{} critical, {} high, {} medium, {} low",
            summary.critical, summary.high, summary.medium, summary.low
        ),
    );
    printer.newline();

    printer.header("Vulnerabilities");
    printer.separator();
    if report.vulnerabilities().is_empty() {
        printer.success("No vulnerabilities found");
    }
    for vuln in report.vulnerabilities() {
        println!("{} {} ({})", theme.severity(vuln.severity), vuln.name, theme.dimmed(&vuln.id));
        println!("  {}", vuln.description);
        if !vuln.affected_asset.is_empty() {
            printer.kv("Asset", &vuln.affected_asset);
        }
        if !vuln.remediation.is_empty() {
            printer.kv("Remediation", &vuln.remediation);
        }
        printer.newline();
    }

    if !report.attack_paths().is_empty() {
        printer.header("Attack Paths");
        printer.separator();
        for path in report.attack_paths() {
            println!("{}", path.name());
            printer.bullet(&path.route());
        }
    }
}
