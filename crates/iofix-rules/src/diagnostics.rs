//! Structured diagnostics, ordered by source position.

use crate::matcher::SiteMatch;
use crate::registry::TypeBinding;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Hidden,
    Info,
    #[default]
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Hidden => write!(f, "hidden"),
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A source position, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

/// One reported rule violation.
///
/// Test equality is by (id, severity, message, location) tuple; byte spans
/// are carried for the rewrite layer, not for identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub location: Location,
    pub start_byte: usize,
    pub end_byte: usize,
    /// Reserved; no current rule produces additional locations.
    pub additional_locations: Vec<Location>,
}

/// Turn a matched site into a diagnostic using its rule's metadata.
pub fn report(site: &SiteMatch<'_>, binding: &TypeBinding) -> Diagnostic {
    let start = site.node.start_position();
    Diagnostic {
        rule_id: binding.diagnostic_id.to_string(),
        severity: Severity::Warning,
        message: binding.message.to_string(),
        location: Location {
            line: start.row + 1,
            column: start.column + 1,
        },
        start_byte: site.node.start_byte(),
        end_byte: site.node.end_byte(),
        additional_locations: Vec::new(),
    }
}

/// Order diagnostics by primary span start, then by rule id for stability.
pub fn sort(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        a.start_byte
            .cmp(&b.start_byte)
            .then_with(|| a.rule_id.cmp(&b.rule_id))
    });
}
