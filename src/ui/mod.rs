//! Terminal presentation helpers
//!
//! [`OutputMode`] decides whether colors, unicode and spinners are used;
//! everything else here follows it.

pub mod output;
pub mod progress;
pub mod theme;

pub use output::{OutputMode, Printer};
pub use progress::Spinner;
pub use theme::{severity_color, status_color, Theme};
