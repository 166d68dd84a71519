//! Report Model - Scan reports, vulnerabilities and attack paths
//!
//! Plain data types shared by the store, the lifecycle controller,
//! the exporters and the analysis gateway.

pub mod attack_path;
pub mod scan_report;
pub mod seed;
pub mod vulnerability;

pub use attack_path::{AttackPath, AttackPathEdge, AttackPathError, AttackPathNode, NodeKind};
pub use scan_report::{ScanReport, ScanStatus};
pub use seed::seed_reports;
pub use vulnerability::{Severity, SeveritySummary, Vulnerability};
