//! Output formatting utilities.
//!
//! Provides consistent JSON/text output across commands via the
//! `OutputFormatter` trait.

use serde::Serialize;
use std::io::IsTerminal;

/// Output format and display mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Compact text output, no colors.
    #[default]
    Compact,
    /// Pretty text output (human-friendly, with colors if available).
    Pretty { colors: bool },
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Create from CLI flags (fully resolved).
    pub fn from_cli(json: bool, pretty: bool, compact: bool) -> Self {
        if json {
            return OutputFormat::Json;
        }

        let is_pretty = if compact {
            false
        } else {
            pretty || std::io::stdout().is_terminal()
        };

        if is_pretty {
            OutputFormat::Pretty {
                colors: use_colors(),
            }
        } else {
            OutputFormat::Compact
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, OutputFormat::Json)
    }

    pub fn use_colors(&self) -> bool {
        matches!(self, OutputFormat::Pretty { colors: true })
    }
}

/// Colors on unless NO_COLOR is set or stdout is not a TTY.
fn use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    std::io::stdout().is_terminal()
}

/// Trait for types that can format output in multiple formats.
///
/// JSON serialization uses serde, text formatting is custom.
pub trait OutputFormatter: Serialize {
    /// Format as minimal text.
    fn format_text(&self) -> String;

    /// Format as pretty text (human-friendly with colors).
    /// Default implementation falls back to format_text().
    fn format_pretty(&self) -> String {
        self.format_text()
    }

    /// Print to stdout in the specified format.
    fn print(&self, format: &OutputFormat) {
        match format {
            OutputFormat::Compact => println!("{}", self.format_text()),
            OutputFormat::Pretty { .. } => println!("{}", self.format_pretty()),
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(self).unwrap_or_default())
            }
        }
    }
}
