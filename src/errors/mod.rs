//! CLI Errors - User-facing diagnostics rendered by miette
//!
//! The core never fails on bad user input; it ignores it. The command line
//! turns those silent no-ops into diagnostics with a hint.

pub mod suggestions;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::report::{ScanReport, ScanStatus};

#[derive(Error, Debug, Diagnostic)]
pub enum ReconxError {
    #[error("Unknown report: '{report_id}'")]
    #[diagnostic(code(reconx::unknown_report), help("{suggestion}"))]
    UnknownReport {
        report_id: String,
        suggestion: String,
    },

    #[error("Report '{report_id}' is still {status}")]
    #[diagnostic(
        code(reconx::report_not_completed),
        help("Only completed reports can be opened. Check progress with: reconx list")
    )]
    ReportNotCompleted {
        report_id: String,
        status: ScanStatus,
    },

    #[error("Unknown vulnerability '{vulnerability_id}' in report '{report_id}'")]
    #[diagnostic(code(reconx::unknown_vulnerability), help("{suggestion}"))]
    UnknownVulnerability {
        vulnerability_id: String,
        report_id: String,
        suggestion: String,
    },

    #[error("Scan target is empty")]
    #[diagnostic(
        code(reconx::empty_target),
        help("Pass a host or URL, e.g. reconx scan example.com")
    )]
    EmptyTarget,

    #[error("Environment variable {var_name} not set")]
    #[diagnostic(code(reconx::env::missing), help("{context}"))]
    MissingEnvVar { var_name: String, context: String },

    #[error("Export failed: {message}")]
    #[diagnostic(
        code(reconx::export),
        help("Check that the output directory exists and is writable")
    )]
    ExportFailed { message: String },

    #[error("Invalid configuration: {advice}")]
    #[diagnostic(code(reconx::config::invalid))]
    InvalidConfig {
        #[source_code]
        src: NamedSource<String>,
        #[label("error here")]
        span: SourceSpan,
        advice: String,
    },
}

impl ReconxError {
    pub fn unknown_report(report_id: impl Into<String>, known_ids: &[String]) -> Self {
        let report_id = report_id.into();
        let suggestion = suggestions::suggest_report(&report_id, known_ids);
        Self::UnknownReport {
            report_id,
            suggestion,
        }
    }

    pub fn not_completed(report: &ScanReport) -> Self {
        Self::ReportNotCompleted {
            report_id: report.id.clone(),
            status: report.status(),
        }
    }

    pub fn unknown_vulnerability(vulnerability_id: impl Into<String>, report: &ScanReport) -> Self {
        let vulnerability_id = vulnerability_id.into();
        let known: Vec<_> = report.vulnerabilities().iter().map(|v| v.id.as_str()).collect();
        let suggestion = suggestions::suggest_vulnerability(&vulnerability_id, &report.id, &known);
        Self::UnknownVulnerability {
            vulnerability_id,
            report_id: report.id.clone(),
            suggestion,
        }
    }

    pub fn missing_env_var(var_name: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingEnvVar {
            var_name: var_name.into(),
            context: context.into(),
        }
    }

    pub fn export_failed(err: &anyhow::Error) -> Self {
        Self::ExportFailed {
            message: format!("{:#}", err),
        }
    }

    /// Point at the offending spot of a TOML file
    pub fn invalid_config(path: &str, content: String, err: &toml::de::Error) -> Self {
        let span = err
            .span()
            .map(|r| SourceSpan::from((r.start, r.end.saturating_sub(r.start))))
            .unwrap_or_else(|| SourceSpan::from((0, 0)));
        Self::InvalidConfig {
            src: NamedSource::new(path, content),
            span,
            advice: err.message().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn unknown_report_carries_suggestion() {
        let err = ReconxError::unknown_report("scan-00l", &["scan-001".to_string()]);
        assert_eq!(err.to_string(), "Unknown report: 'scan-00l'");
        let help = err.help().unwrap().to_string();
        assert!(help.contains("scan-001"));
    }

    #[test]
    fn not_completed_names_status() {
        let report = ScanReport::queued("scan-003", "Scan for x", None, Utc::now());
        let err = ReconxError::not_completed(&report);
        assert_eq!(err.to_string(), "Report 'scan-003' is still Queued");
    }

    #[test]
    fn invalid_config_points_at_error() {
        let content = "[ai]\ntemperature = \"hot\"\n".to_string();
        let err = toml::from_str::<crate::config::AppConfig>(&content).unwrap_err();
        let diag = ReconxError::invalid_config("reconx.toml", content, &err);
        assert!(diag.to_string().starts_with("Invalid configuration"));
        assert!(diag.labels().is_some());
    }
}
