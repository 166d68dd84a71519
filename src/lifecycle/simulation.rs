//! Simulated Findings - The fixed result set of a mock scan

use crate::report::{Severity, Vulnerability};

use super::profile::ScanProfile;

/// Findings produced when a simulated scan of `target` completes.
///
/// Quick scans yield one High and one Medium finding; full scans add a Low one.
pub fn simulated_findings(scan_id: &str, target: &str, profile: ScanProfile) -> Vec<Vulnerability> {
    let mut findings = vec![
        Vulnerability::new(
            format!("vuln-{scan_id}-001"),
            Severity::High,
            "Outdated Web Server Version",
            "Server is running an outdated version with known vulnerabilities.",
        )
        .with_affected_asset(target)
        .with_remediation("Upgrade web server to the latest stable version."),
        Vulnerability::new(
            format!("vuln-{scan_id}-002"),
            Severity::Medium,
            "Missing Security Headers",
            "Important security headers like CSP are not configured.",
        )
        .with_affected_asset(target)
        .with_remediation("Configure appropriate security headers in the web server configuration."),
    ];

    if profile == ScanProfile::Full {
        findings.push(
            Vulnerability::new(
                format!("vuln-{scan_id}-003"),
                Severity::Low,
                "Verbose Server Banners",
                "Server banners reveal too much information about the technology stack.",
            )
            .with_affected_asset(target)
            .with_remediation("Configure the server to minimize information disclosed in banners."),
        );
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quick_profile_findings() {
        let findings = simulated_findings("scan-003", "foo.com", ScanProfile::Quick);
        let severities: Vec<_> = findings.iter().map(|f| f.severity).collect();
        assert_eq!(severities, vec![Severity::High, Severity::Medium]);
        assert_eq!(findings[0].id, "vuln-scan-003-001");
        assert!(findings.iter().all(|f| f.affected_asset == "foo.com"));
    }

    #[test]
    fn full_profile_adds_low_finding() {
        let findings = simulated_findings("scan-004", "bar.org", ScanProfile::Full);
        assert_eq!(findings.len(), 3);
        assert_eq!(findings[2].severity, Severity::Low);
        assert_eq!(findings[2].id, "vuln-scan-004-003");
    }
}
