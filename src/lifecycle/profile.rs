//! Scan Profiles and Timings
//!
//! A profile decides how long a simulated scan runs and how many
//! findings it produces.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Depth of a requested scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanProfile {
    #[default]
    Quick,
    Full,
}

impl ScanProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanProfile::Quick => "quick",
            ScanProfile::Full => "full",
        }
    }
}

impl std::fmt::Display for ScanProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ScanProfile {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quick" | "fast" => Ok(ScanProfile::Quick),
            "full" | "deep" => Ok(ScanProfile::Full),
            _ => Err(()),
        }
    }
}

/// Delays driving the simulated lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Time spent Queued before Scanning (ms)
    pub queue_delay_ms: u64,
    /// Scanning time for the quick profile (ms)
    pub quick_scan_ms: u64,
    /// Scanning time for the full profile (ms)
    pub full_scan_ms: u64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            queue_delay_ms: 2_000,
            quick_scan_ms: 8_000,
            full_scan_ms: 15_000,
        }
    }
}

impl LifecycleConfig {
    pub fn queue_delay(&self) -> Duration {
        Duration::from_millis(self.queue_delay_ms)
    }

    pub fn scan_duration(&self, profile: ScanProfile) -> Duration {
        Duration::from_millis(match profile {
            ScanProfile::Quick => self.quick_scan_ms,
            ScanProfile::Full => self.full_scan_ms,
        })
    }

    /// Delay from scan request to completion
    pub fn completion_delay(&self, profile: ScanProfile) -> Duration {
        self.queue_delay() + self.scan_duration(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timings() {
        let config = LifecycleConfig::default();
        assert_eq!(config.queue_delay(), Duration::from_secs(2));
        assert_eq!(config.completion_delay(ScanProfile::Quick), Duration::from_secs(10));
        assert_eq!(config.completion_delay(ScanProfile::Full), Duration::from_secs(17));
    }

    #[test]
    fn profile_parsing() {
        assert_eq!("QUICK".parse::<ScanProfile>(), Ok(ScanProfile::Quick));
        assert_eq!("deep".parse::<ScanProfile>(), Ok(ScanProfile::Full));
        assert!("thorough".parse::<ScanProfile>().is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: LifecycleConfig = toml::from_str("queue_delay_ms = 10").unwrap();
        assert_eq!(config.queue_delay_ms, 10);
        assert_eq!(config.full_scan_ms, 15_000);
    }
}
