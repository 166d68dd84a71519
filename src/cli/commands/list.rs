//! List command - All reports with their status and severity counts

use anyhow::Result;
use reconx::ui::{Printer, Theme};
use reconx::{Dashboard, Severity};

use crate::cli::OutputFormat;

pub fn run(dashboard: &Dashboard, format: OutputFormat) -> Result<()> {
    let reports = dashboard.store().list();

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    let printer = Printer::new();
    let theme = Theme::new(printer.mode());
    let overview = dashboard.overview();

    printer.header("Scan Reports");
    printer.separator();
    if reports.is_empty() {
        printer.info("No reports");
    }
    for report in &reports {
        let summary = report.summary();
        println!(
            "{:<10} {:<10} {}",
            report.id,
            theme.status(report.status()),
            report.name
        );
        if report.is_completed() {
            println!(
                "{:<21} C:{} H:{} M:{} L:{}",
                "",
                theme.count(summary.critical, Severity::Critical),
                theme.count(summary.high, Severity::High),
                theme.count(summary.medium, Severity::Medium),
                theme.count(summary.low, Severity::Low),
            );
        } else if let Some(target) = &report.target_url {
            println!("{:<21} {}", "", theme.dimmed(target));
        }
    }
    printer.separator();
    printer.kv(
        "Reports",
        &format!(
            "{} ({} completed, {} in progress)",
            overview.total_reports, overview.completed, overview.in_progress
        ),
    );
    printer.kv(
        "Findings",
        &format!(
            "{} critical, {} high, {} medium, {} low",
            overview.severity.critical,
            overview.severity.high,
            overview.severity.medium,
            overview.severity.low
        ),
    );
    Ok(())
}
