//! Colors for severities and scan states

use colored::{Color, ColoredString, Colorize};

use crate::report::{ScanStatus, Severity};

use super::OutputMode;

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Critical => Color::Red,
        Severity::High => Color::BrightRed,
        Severity::Medium => Color::Yellow,
        Severity::Low => Color::Blue,
    }
}

pub fn status_color(status: ScanStatus) -> Color {
    match status {
        ScanStatus::Queued => Color::BrightBlack,
        ScanStatus::Scanning => Color::Cyan,
        ScanStatus::Completed => Color::Green,
    }
}

/// Styling that degrades to plain text when colors are off
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    colors: bool,
}

impl Theme {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            colors: mode.is_decorated(),
        }
    }

    fn paint(&self, text: &str, color: Color) -> ColoredString {
        if self.colors {
            text.color(color)
        } else {
            text.normal()
        }
    }

    /// `[Critical]`-style tag
    pub fn severity(&self, severity: Severity) -> ColoredString {
        let tag = format!("[{}]", severity);
        let painted = self.paint(&tag, severity_color(severity));
        if self.colors && severity == Severity::Critical {
            painted.bold()
        } else {
            painted
        }
    }

    pub fn status(&self, status: ScanStatus) -> ColoredString {
        self.paint(status.as_str(), status_color(status))
    }

    /// A count, colored only when non-zero
    pub fn count(&self, count: u32, severity: Severity) -> ColoredString {
        if count == 0 {
            self.paint("0", Color::BrightBlack)
        } else {
            self.paint(&count.to_string(), severity_color(severity))
        }
    }

    pub fn dimmed(&self, text: &str) -> ColoredString {
        if self.colors {
            text.dimmed()
        } else {
            text.normal()
        }
    }
}
