//! CLI output formatting with colors.
//!
//! Colors auto-disable when output is not a TTY (build-system friendly).

use owo_colors::OwoColorize;
use std::fmt::Display;
use std::path::Path;

/// Check if stderr supports colors (TTY detection)
fn use_colors() -> bool {
    supports_color::on(supports_color::Stream::Stderr).is_some()
}

/// Check if stdout supports colors (used for the plan table)
pub fn stdout_supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Format an info/action message (no special prefix)
pub fn info(msg: impl Display) {
    eprintln!("{}", msg);
}

/// Format a generated artifact message
pub fn generated(path: &Path) {
    if use_colors() {
        eprintln!("{}: {}", "Generated".green(), path.display().cyan());
    } else {
        eprintln!("Generated: {}", path.display());
    }
}

/// Format the end-of-run summary
pub fn embed_summary(count: usize) {
    if use_colors() {
        eprintln!(
            "{} Embedded {} file(s)",
            "✓".green(),
            count.to_string().cyan().bold()
        );
    } else {
        eprintln!("✓ Embedded {} file(s)", count);
    }
}

/// Format the dry-run summary line
pub fn plan_summary(count: usize, fingerprint: &str) {
    if use_colors() {
        eprintln!(
            "Planned {} file(s), fingerprint {}",
            count.to_string().cyan().bold(),
            fingerprint.bright_black()
        );
    } else {
        eprintln!("Planned {} file(s), fingerprint {}", count, fingerprint);
    }
}

// =============================================================================
// Diagnostic Formatting
// =============================================================================

use crate::diagnostic::{Diagnostic, DiagnosticLevel};

/// Format a diagnostic message
pub fn diagnostic(diag: &Diagnostic) {
    if use_colors() {
        let level_str = match diag.level {
            DiagnosticLevel::Error => "error".red().bold().to_string(),
            DiagnosticLevel::Warning => "warning".yellow().bold().to_string(),
        };
        eprintln!(
            "{}[{}]: {} ({})",
            level_str,
            diag.code.code().bright_black(),
            diag.message,
            diag.file.cyan()
        );
    } else {
        let level_str = match diag.level {
            DiagnosticLevel::Error => "error",
            DiagnosticLevel::Warning => "warning",
        };
        eprintln!(
            "{}[{}]: {} ({})",
            level_str,
            diag.code.code(),
            diag.message,
            diag.file
        );
    }
}
