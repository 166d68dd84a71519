//! Console output for the CLI commands
//!
//! Decoration (colors, unicode glyphs, spinners) is reserved for a real
//! terminal. CI logs and redirected output get plain ASCII lines.

use std::io::{self, IsTerminal};

use colored::{Color, Colorize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Terminal with colors and unicode
    Interactive,
    /// Running under CI
    CI,
    /// Redirected or piped
    Plain,
}

impl OutputMode {
    pub fn detect() -> Self {
        Self::resolve(is_ci::cached(), io::stdout().is_terminal())
    }

    /// CI wins over a terminal, since CI runners often allocate a pty
    fn resolve(ci: bool, terminal: bool) -> Self {
        match (ci, terminal) {
            (true, _) => OutputMode::CI,
            (false, true) => OutputMode::Interactive,
            (false, false) => OutputMode::Plain,
        }
    }

    /// Whether colors, unicode glyphs and spinners may be used
    pub fn is_decorated(&self) -> bool {
        *self == OutputMode::Interactive
    }
}

impl Default for OutputMode {
    fn default() -> Self {
        Self::detect()
    }
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Done,
    Caution,
    Note,
}

impl Tone {
    fn glyph(self, decorated: bool) -> &'static str {
        match (self, decorated) {
            (Tone::Done, true) => "✓",
            (Tone::Done, false) => "[OK]",
            (Tone::Caution, true) => "⚠",
            (Tone::Caution, false) => "[WARN]",
            (Tone::Note, true) => "ℹ",
            (Tone::Note, false) => "[INFO]",
        }
    }

    fn color(self) -> Color {
        match self {
            Tone::Done => Color::Green,
            Tone::Caution => Color::Yellow,
            Tone::Note => Color::Cyan,
        }
    }
}

/// Line printer bound to one [`OutputMode`]
#[derive(Debug, Clone)]
pub struct Printer {
    mode: OutputMode,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self::with_mode(OutputMode::detect())
    }

    pub fn with_mode(mode: OutputMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn println(&self, message: &str) {
        println!("{message}");
    }

    pub fn newline(&self) {
        println!();
    }

    pub fn separator(&self) {
        let rule = if self.mode.is_decorated() { "━" } else { "-" };
        println!("{}", rule.repeat(60));
    }

    pub fn header(&self, text: &str) {
        if self.mode.is_decorated() {
            println!("{}", text.cyan().bold());
        } else {
            println!("{text}");
        }
    }

    pub fn success(&self, message: &str) {
        println!("{}", self.status_line(Tone::Done, message));
    }

    pub fn warning(&self, message: &str) {
        println!("{}", self.status_line(Tone::Caution, message));
    }

    pub fn info(&self, message: &str) {
        println!("{}", self.status_line(Tone::Note, message));
    }

    pub fn bullet(&self, message: &str) {
        let mark = if self.mode.is_decorated() { "•" } else { "-" };
        println!("  {mark} {message}");
    }

    /// Indented `key: value` detail line
    pub fn kv(&self, key: &str, value: &str) {
        if self.mode.is_decorated() {
            println!("  {}: {value}", key.cyan());
        } else {
            println!("  {key}: {value}");
        }
    }

    fn status_line(&self, tone: Tone, message: &str) -> String {
        let decorated = self.mode.is_decorated();
        let glyph = tone.glyph(decorated);
        if !decorated {
            return format!("{glyph} {message}");
        }
        match tone {
            // Notes keep the message in the default color
            Tone::Note => format!("{} {message}", glyph.color(tone.color())),
            _ => format!(
                "{} {}",
                glyph.color(tone.color()),
                message.color(tone.color())
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ci_takes_precedence_over_terminal() {
        assert_eq!(OutputMode::resolve(true, true), OutputMode::CI);
        assert_eq!(OutputMode::resolve(true, false), OutputMode::CI);
        assert_eq!(OutputMode::resolve(false, true), OutputMode::Interactive);
        assert_eq!(OutputMode::resolve(false, false), OutputMode::Plain);
    }

    #[test]
    fn only_interactive_is_decorated() {
        assert!(OutputMode::Interactive.is_decorated());
        assert!(!OutputMode::CI.is_decorated());
        assert!(!OutputMode::Plain.is_decorated());
    }

    #[test]
    fn undecorated_status_lines_are_ascii() {
        let printer = Printer::with_mode(OutputMode::Plain);
        assert_eq!(printer.status_line(Tone::Done, "saved"), "[OK] saved");
        assert_eq!(printer.status_line(Tone::Caution, "cancelled"), "[WARN] cancelled");
        assert_eq!(printer.status_line(Tone::Note, "queued"), "[INFO] queued");
    }

    #[test]
    fn decorated_status_lines_use_glyphs() {
        let printer = Printer::with_mode(OutputMode::Interactive);
        let done = printer.status_line(Tone::Done, "saved");
        assert!(done.contains('✓') && done.contains("saved"));
        assert!(!done.contains("[OK]"));
        assert!(printer.status_line(Tone::Note, "queued").contains('ℹ'));
    }
}
