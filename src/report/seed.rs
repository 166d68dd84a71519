//! Seed Data - Reports present when a dashboard starts

use chrono::{DateTime, TimeZone, Utc};

use super::attack_path::{AttackPath, AttackPathEdge, AttackPathError, AttackPathNode, NodeKind};
use super::scan_report::ScanReport;
use super::vulnerability::{Severity, Vulnerability};

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn crown_jewels_path() -> Result<AttackPath, AttackPathError> {
    AttackPath::new(
        "ap-1",
        "Internet to Crown Jewels DB",
        vec![
            AttackPathNode::new("internet", "Internet", NodeKind::Entry),
            AttackPathNode::new("api-gateway", "API Gateway", NodeKind::Asset),
            AttackPathNode::new("vuln-001-node", "RCE Vulnerability", NodeKind::Vulnerability),
            AttackPathNode::new("internal-network", "Internal Network", NodeKind::Asset),
            AttackPathNode::new("customer-db", "Customer DB", NodeKind::Target),
        ],
        vec![
            AttackPathEdge::new("internet", "api-gateway"),
            AttackPathEdge::new("api-gateway", "vuln-001-node"),
            AttackPathEdge::new("vuln-001-node", "internal-network"),
            AttackPathEdge::new("internal-network", "customer-db"),
        ],
    )
}

/// The two completed reports a fresh dashboard starts with, newest first
pub fn seed_reports() -> Result<Vec<ScanReport>, AttackPathError> {
    let production = ScanReport::completed(
        "scan-001",
        "Production Kubernetes Cluster Scan",
        Some("prod.example.com".to_string()),
        at(2023, 10, 27, 10, 0),
        vec![
            Vulnerability::new(
                "vuln-001",
                Severity::Critical,
                "Remote Code Execution in API Gateway",
                "A deserialization vulnerability in the public-facing API gateway allows unauthenticated attackers to execute arbitrary code.",
            )
            .with_affected_asset("api-gateway-pod-xyz")
            .with_remediation("Update library to version 2.5.1 or newer."),
            Vulnerability::new(
                "vuln-002",
                Severity::Critical,
                "Exposed Kubernetes ETCD Database",
                "The ETCD database is publicly accessible without authentication, exposing cluster secrets.",
            )
            .with_affected_asset("k8s-master-node-1")
            .with_remediation("Apply network policies to restrict access to the ETCD port (2379) to only within the cluster control plane."),
            Vulnerability::new(
                "vuln-003",
                Severity::High,
                "Privileged Container in logging namespace",
                "A container is running with host-level privileges, breaking isolation and allowing potential host compromise.",
            )
            .with_affected_asset("legacy-monitoring-agent-abc")
            .with_remediation("Remove privileged flag and grant specific capabilities using security contexts."),
        ],
        vec![crown_jewels_path()?],
    );

    let staging = ScanReport::completed(
        "scan-002",
        "Staging Environment Web App Scan",
        Some("staging.example.com".to_string()),
        at(2023, 10, 26, 15, 30),
        vec![
            Vulnerability::new(
                "vuln-004",
                Severity::High,
                "Cross-Site Scripting (XSS) in search bar",
                "The search input field is not properly sanitized, allowing for stored XSS attacks.",
            )
            .with_affected_asset("webapp-instance-1")
            .with_remediation("Implement input validation and output encoding on all user-supplied data."),
            Vulnerability::new(
                "vuln-005",
                Severity::High,
                "SQL Injection in user profile page",
                "User profile endpoint is vulnerable to SQL injection via the user ID parameter.",
            )
            .with_affected_asset("user-database-main")
            .with_remediation("Use parameterized queries or prepared statements to access the database."),
        ],
        Vec::new(),
    );

    Ok(vec![production, staging])
}
