//! Markdown Reporter
//!
//! Human-readable export of a single scan report, including any finished
//! remediation analyses.

use std::fmt::Write;

use crate::ai::AnalysisNotes;
use crate::report::ScanReport;

/// Render `report` as a Markdown document
pub fn generate_markdown(report: &ScanReport, notes: &AnalysisNotes) -> String {
    let mut out = String::new();
    let summary = report.summary();

    // Writing to a String cannot fail
    let _ = writeln!(out, "# Scan Report: {}\n", report.name);
    let _ = writeln!(
        out,
        "**Scanned on:** {}\n",
        report.timestamp.format("%b %-d, %Y, %-I:%M:%S %p UTC")
    );
    if let Some(target) = &report.target_url {
        let _ = writeln!(out, "**Target:** `{}`\n", target);
    }

    out.push_str("## Summary\n");
    let _ = writeln!(out, "- **Critical:** {}", summary.critical);
    let _ = writeln!(out, "- **High:** {}", summary.high);
    let _ = writeln!(out, "- **Medium:** {}", summary.medium);
    let _ = writeln!(out, "- **Low:** {}\n", summary.low);

    out.push_str("## Vulnerabilities\n\n");
    for vuln in report.vulnerabilities() {
        let _ = writeln!(out, "### [{}] {}", vuln.severity, vuln.name);
        let _ = writeln!(out, "**Description:** {}", vuln.description);
        let _ = writeln!(out, "**Affected Asset:** `{}`", vuln.affected_asset);
        let _ = writeln!(out, "**Suggested Remediation:** {}", vuln.remediation);

        if let Some(analysis) = notes.ready_text(&vuln.id) {
            let fence = fence_for(&analysis);
            let _ = writeln!(out, "\n**AI Analysis:**\n{fence}\n{}\n{fence}", analysis);
        }
        out.push_str("\n---\n\n");
    }

    if !report.attack_paths().is_empty() {
        out.push_str("## Attack Paths\n\n");
        for path in report.attack_paths() {
            let _ = writeln!(out, "### {}", path.name());
            let _ = writeln!(out, "*Path:* {}\n", path.route());
        }
    }

    out
}

/// A backtick fence longer than any backtick run inside `text`
fn fence_for(text: &str) -> String {
    let longest = text
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::seed_reports;

    #[test]
    fn renders_sections() {
        let report = seed_reports().unwrap().remove(0);
        let md = generate_markdown(&report, &AnalysisNotes::new());

        assert!(md.starts_with("# Scan Report: Production Kubernetes Cluster Scan\n"));
        assert!(md.contains("**Scanned on:** Oct 27, 2023"));
        assert!(md.contains("- **Critical:** 2"));
        assert!(md.contains("### [Critical] Remote Code Execution in API Gateway"));
        assert!(md.contains("**Affected Asset:** `api-gateway-pod-xyz`"));
        assert!(md.contains(
            "*Path:* Internet -> API Gateway -> RCE Vulnerability -> Internal Network -> Customer DB"
        ));
        assert_eq!(md.matches("\n---\n").count(), report.vulnerabilities().len());
    }

    #[test]
    fn includes_only_ready_analyses() {
        let report = seed_reports().unwrap().remove(0);
        let notes = AnalysisNotes::new();
        notes.set_ready("vuln-001", "Upgrade the gateway.");
        notes.mark_pending("vuln-002");

        let md = generate_markdown(&report, &notes);
        assert_eq!(md.matches("**AI Analysis:**").count(), 1);
        assert!(md.contains("```\nUpgrade the gateway.\n```"));
        assert!(!md.contains("Analyzing..."));
    }

    #[test]
    fn omits_attack_paths_section_when_empty() {
        let report = seed_reports().unwrap().remove(1);
        let md = generate_markdown(&report, &AnalysisNotes::new());
        assert!(!md.contains("## Attack Paths"));
    }

    #[test]
    fn analysis_with_code_blocks_stays_fenced() {
        let report = seed_reports().unwrap().remove(0);
        let notes = AnalysisNotes::new();
        notes.set_ready("vuln-001", "Patch it:\n```yaml\nimage: gateway:2.1\n```\nThen redeploy.");

        let md = generate_markdown(&report, &notes);
        assert!(md.contains(
            "````\nPatch it:\n```yaml\nimage: gateway:2.1\n```\nThen redeploy.\n````"
        ));
    }

    #[test]
    fn fence_outgrows_backtick_runs() {
        assert_eq!(fence_for("plain"), "```");
        assert_eq!(fence_for("`inline`"), "```");
        assert_eq!(fence_for("````nested````"), "`````");
    }
}
