//! ReconX - Security scan dashboard core
//!
//! Keeps scan reports in an observable in-memory store, drives simulated
//! scans through `Queued -> Scanning -> Completed` on cancellable timers,
//! tracks the report open for viewing, and asks an AI provider for
//! remediation plans and chat replies.
//!
//! # Modules
//!
//! - `report` - Reports, vulnerabilities, attack paths and seed data
//! - `store` - Observable ordered report collection
//! - `lifecycle` - Simulated scan controller and its timers
//! - `selection` - The currently opened report
//! - `ai` - Analysis gateway and AI providers
//! - `reporter` - Markdown and JSON export
//! - `app` - [`Dashboard`], wiring all of the above
//!
//! # Example
//!
//! ```rust,ignore
//! use reconx::{AppConfig, Dashboard, ScanProfile};
//!
//! let dashboard = Dashboard::seeded(&AppConfig::load_or_default(None))?;
//! let id = dashboard.start_scan("example.com", ScanProfile::Quick);
//!
//! dashboard.store().subscribe(|reports| {
//!     for report in reports {
//!         println!("{} {}", report.id, report.status());
//!     }
//! });
//! ```

pub mod ai;
pub mod app;
pub mod config;
pub mod errors;
pub mod lifecycle;
pub mod report;
pub mod reporter;
pub mod selection;
pub mod store;
pub mod ui;

pub use ai::{AiConfig, AnalysisGateway, AnalysisNotes};
pub use app::{Dashboard, DashboardOverview};
pub use config::{AppConfig, ConfigLoadError};
pub use lifecycle::{LifecycleConfig, ScanController, ScanProfile};
pub use report::{
    AttackPath, AttackPathEdge, AttackPathNode, NodeKind, ScanReport, ScanStatus, Severity,
    SeveritySummary, Vulnerability,
};
pub use selection::SelectionState;
pub use store::{ReportStore, SubscriptionId};
