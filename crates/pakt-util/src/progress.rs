use std::io::Write;
use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

/// Severity of a status line, selecting the label colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// An action that changed something (bold green).
    Action,
    /// Informational output (bold cyan).
    Info,
    /// Something the user should look at (bold yellow).
    Warn,
}

impl StatusKind {
    fn style(self) -> Style {
        match self {
            StatusKind::Action => Style::new().green().bold(),
            StatusKind::Info => Style::new().cyan().bold(),
            StatusKind::Warn => Style::new().yellow().bold(),
        }
    }
}

/// Print a right-aligned status line to stderr: `     Solving 3 specs`.
pub fn status_line(kind: StatusKind, label: &str, message: &str) {
    let _ = writeln!(
        std::io::stderr(),
        "{:>12} {message}",
        kind.style().apply_to(label),
    );
}

/// Shorthand for an [`StatusKind::Action`] line.
pub fn status(label: &str, message: &str) {
    status_line(StatusKind::Action, label, message);
}

/// Shorthand for a [`StatusKind::Warn`] line.
pub fn status_warn(label: &str, message: &str) {
    status_line(StatusKind::Warn, label, message);
}

/// Spinner shown while a blocking phase (graph build, MILP solve) runs.
///
/// Hidden when stderr is not a terminal so test output stays clean.
pub fn spinner(message: &str) -> ProgressBar {
    if !console::Term::stderr().is_term() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
