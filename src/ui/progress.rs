//! Spinner shown while a simulated scan runs or the assistant is thinking

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use super::OutputMode;

/// Indeterminate progress; a no-op outside an interactive terminal
pub struct Spinner {
    bar: Option<ProgressBar>,
    mode: OutputMode,
}

impl Spinner {
    pub fn new(mode: OutputMode) -> Self {
        Self { bar: None, mode }
    }

    pub fn start(&mut self, message: &str) {
        if !self.mode.is_decorated() {
            return;
        }

        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        self.bar = Some(bar);
    }

    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    /// Print a line without tearing the spinner
    pub fn println(&self, line: &str) {
        match &self.bar {
            Some(bar) => bar.println(line),
            None => println!("{}", line),
        }
    }

    pub fn finish_and_clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.bar.is_some()
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_outside_terminal() {
        let mut spinner = Spinner::new(OutputMode::CI);
        spinner.start("Scanning");
        assert!(!spinner.is_enabled());
        spinner.set_message("still fine");
        spinner.finish_and_clear();
    }
}
