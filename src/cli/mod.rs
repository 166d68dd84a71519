//! CLI module - Command implementations

pub mod commands;

use std::path::Path;

use anyhow::Result;
use reconx::errors::ReconxError;
use reconx::{ConfigLoadError, Dashboard, ScanReport};

/// Output format for listing commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Build the dashboard, reporting config problems as diagnostics
pub fn load_dashboard(config_path: Option<&Path>, overrides: &AiOverrides) -> Result<Dashboard> {
    let mut config = match config_path {
        Some(path) => match reconx::AppConfig::load_from_file(path) {
            Ok(config) => config,
            Err(ConfigLoadError::Parse { path, source }) => {
                let content = std::fs::read_to_string(&path).unwrap_or_default();
                return Err(ReconxError::invalid_config(&path, content, &source).into());
            }
            Err(e) => return Err(e.into()),
        },
        None => reconx::AppConfig::load_or_default(None),
    };

    overrides.apply(&mut config.ai);
    Dashboard::seeded(&config)
}

/// `--provider` / `--model` from the command line
#[derive(Debug, Clone, Default)]
pub struct AiOverrides {
    pub provider: Option<reconx::ai::AiProviderKind>,
    pub model: Option<String>,
}

impl AiOverrides {
    fn apply(&self, config: &mut reconx::AiConfig) {
        if let Some(provider) = self.provider {
            if provider != config.provider {
                // A key for one provider is useless for another
                config.api_key = None;
                config.model = None;
            }
            config.provider = provider;
            config.load_api_key_from_env();
        }
        if let Some(model) = &self.model {
            config.model = Some(model.clone());
        }
    }
}

/// Look a report up, with a "did you mean" on a miss
pub fn find_report(dashboard: &Dashboard, report_id: &str) -> Result<ScanReport, ReconxError> {
    dashboard
        .store()
        .get(report_id)
        .ok_or_else(|| ReconxError::unknown_report(report_id, &dashboard.store().ids()))
}

/// Like [`find_report`], but the report must be completed
pub fn find_completed_report(dashboard: &Dashboard, report_id: &str) -> Result<ScanReport, ReconxError> {
    let report = find_report(dashboard, report_id)?;
    if !report.is_completed() {
        return Err(ReconxError::not_completed(&report));
    }
    Ok(report)
}
