//! The fix-application loop.
//!
//! One fix at a time: match, take the first actionable site in source
//! order, apply its edits, reparse, check that the fix did not introduce
//! diagnostics of a new kind, repeat. Iteration is bounded by the number
//! of diagnostics found on the first pass.

use crate::edits::EditError;
use crate::synthesize::{InjectionMode, synthesize};
use iofix_rules::{Diagnostic, FileSystemContext, MatchStrategy, analyze, match_unit};
use iofix_syntax::{ParseError, SourceUnit};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Default)]
pub struct FixOptions {
    pub strategy: MatchStrategy,
    pub mode: InjectionMode,
    /// Restrict fixing to one rule id.
    pub rule: Option<String>,
}

/// One applied fix.
#[derive(Debug, Clone, Serialize)]
pub struct FixStep {
    pub rule_id: String,
    pub line: usize,
    pub column: usize,
}

/// Result of one fix session over one source text.
#[derive(Debug, Clone, Serialize)]
pub struct FixOutcome {
    /// Final text; equal to the input when nothing was actionable.
    pub text: String,
    pub steps: Vec<FixStep>,
    /// Rule ids whose diagnostic count grew after the last applied fix.
    /// Non-empty means the session stopped on a recoverable fix failure.
    pub introduced: Vec<String>,
    /// Diagnostics still present in the final text (diagnostic-only rules
    /// stay here).
    pub remaining: Vec<Diagnostic>,
}

impl FixOutcome {
    pub fn failed(&self) -> bool {
        !self.introduced.is_empty()
    }
}

#[derive(Debug)]
pub enum FixError {
    Parse(ParseError),
    Edit(EditError),
}

impl fmt::Display for FixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixError::Parse(e) => write!(f, "parse failed: {e}"),
            FixError::Edit(e) => write!(f, "edit failed: {e}"),
        }
    }
}

impl std::error::Error for FixError {}

impl From<ParseError> for FixError {
    fn from(e: ParseError) -> Self {
        FixError::Parse(e)
    }
}

impl From<EditError> for FixError {
    fn from(e: EditError) -> Self {
        FixError::Edit(e)
    }
}

/// Run the fix loop to a fixed point (or the attempts budget).
pub fn run_fix_loop(
    source: &str,
    ctx: &FileSystemContext,
    options: &FixOptions,
) -> Result<FixOutcome, FixError> {
    let mut text = source.to_string();
    let mut steps = Vec::new();
    let mut introduced = Vec::new();

    let mut before = {
        let unit = SourceUnit::parse(text.as_str())?;
        id_counts(&analyze(&unit, ctx, options.strategy))
    };
    let mut attempts: usize = before.values().sum();

    while attempts > 0 {
        let next = {
            let unit = SourceUnit::parse(text.as_str())?;
            let mut sites = match_unit(&unit, ctx, options.strategy);
            sites.sort_by_key(|s| (s.node.start_byte(), s.binding.diagnostic_id));
            let found = sites
                .iter()
                .filter(|s| {
                    options
                        .rule
                        .as_deref()
                        .is_none_or(|r| r == s.binding.diagnostic_id)
                })
                .find_map(|s| {
                    synthesize(&unit, s, options.mode)
                        .map(|e| (s.binding.diagnostic_id, s.node.start_position(), e))
                });
            match found {
                Some((id, pos, edits)) => Some((id, pos, edits.apply(unit.text())?)),
                None => None,
            }
        };
        let Some((rule_id, pos, new_text)) = next else {
            break;
        };

        steps.push(FixStep {
            rule_id: rule_id.to_string(),
            line: pos.row + 1,
            column: pos.column + 1,
        });
        text = new_text;

        let after = {
            let unit = SourceUnit::parse(text.as_str())?;
            id_counts(&analyze(&unit, ctx, options.strategy))
        };
        let mut newly: Vec<String> = after
            .iter()
            .filter(|(id, n)| **n > before.get(*id).copied().unwrap_or(0))
            .map(|(id, _)| id.clone())
            .collect();
        if !newly.is_empty() {
            newly.sort();
            introduced = newly;
            break;
        }
        before = after;
        attempts -= 1;
    }

    let remaining = {
        let unit = SourceUnit::parse(text.as_str())?;
        analyze(&unit, ctx, options.strategy)
    };

    Ok(FixOutcome {
        text,
        steps,
        introduced,
        remaining,
    })
}

fn id_counts(diagnostics: &[Diagnostic]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for d in diagnostics {
        *counts.entry(d.rule_id.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix(source: &str) -> FixOutcome {
        run_fix_loop(
            source,
            &FileSystemContext::assume_referenced(),
            &FixOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn untouched_source_is_returned_verbatim() {
        let source = "class C\n{\n    void M() { Helper.Run(); }\n}\n";
        let outcome = fix(source);
        assert_eq!(outcome.text, source);
        assert!(outcome.steps.is_empty());
        assert!(!outcome.failed());
    }

    #[test]
    fn directory_round_trip_wires_and_rewrites() {
        let source = "using System.IO;\n\nclass Service\n{\n    void M()\n    {\n        Directory.CreateDirectory(\"d\");\n    }\n}\n";
        let outcome = fix(source);
        assert!(!outcome.failed());
        assert!(outcome.text.contains("using System.IO.Abstractions;"));
        assert!(outcome.text.contains("private readonly IFileSystem _fileSystem;"));
        assert!(outcome.text.contains("public Service(IFileSystem fileSystem)"));
        assert!(outcome.text.contains("_fileSystem = fileSystem;"));
        assert!(outcome.text.contains("_fileSystem.Directory.CreateDirectory(\"d\")"));
        assert!(outcome.remaining.is_empty());
        let ids: Vec<&str> = outcome.steps.iter().map(|s| s.rule_id.as_str()).collect();
        assert_eq!(ids, ["IO0001", "IO0003"]);
    }

    #[test]
    fn fixed_output_is_a_fixed_point() {
        let source = "using System.IO;\n\nclass Service\n{\n    void M()\n    {\n        var p = Path.Combine(\"a\", \"b\");\n        File.WriteAllText(p, \"x\");\n    }\n}\n";
        let first = fix(source);
        assert!(!first.failed());
        let second = fix(&first.text);
        assert_eq!(second.text, first.text);
        assert!(second.steps.is_empty());
    }

    #[test]
    fn single_line_constructor_wires_cleanly() {
        let source = "using System.IO;\n\nclass Service\n{\n    public Service() { }\n\n    void M()\n    {\n        File.Delete(\"f\");\n    }\n}\n";
        let outcome = fix(source);
        assert!(!outcome.failed());
        assert!(outcome.text.contains("public Service(IFileSystem fileSystem) {"));
        assert!(outcome.text.contains("_fileSystem = fileSystem;"));
        assert!(outcome.text.contains("_fileSystem.File.Delete(\"f\")"));
        assert!(outcome.remaining.is_empty());
        let reparsed = SourceUnit::parse(outcome.text.as_str()).unwrap();
        assert!(!reparsed.root().has_error());
    }

    #[test]
    fn unwireable_constructor_keeps_its_diagnostic() {
        let source = "using System.IO;\n\nclass Counter\n{\n    private int _count;\n\n    public Counter() => _count = 0;\n}\n";
        let outcome = fix(source);
        assert_eq!(outcome.text, source);
        assert!(outcome.steps.is_empty());
        assert!(outcome.remaining.iter().any(|d| d.rule_id == "IO0001"));
    }

    #[test]
    fn diagnostic_only_rules_remain_after_fixing() {
        let source = "using System.IO;\n\nclass Service\n{\n    void M()\n    {\n        var r = new StreamReader(\"f.txt\");\n    }\n}\n";
        let outcome = fix(source);
        assert!(!outcome.failed());
        // IO0001 was fixable; the StreamReader diagnostic has no action.
        let ids: Vec<&str> = outcome
            .remaining
            .iter()
            .map(|d| d.rule_id.as_str())
            .collect();
        assert_eq!(ids, ["IO0011"]);
    }

    #[test]
    fn rule_filter_limits_what_gets_fixed() {
        let source = "using System.IO;\n\nclass Service\n{\n    void M()\n    {\n        Directory.CreateDirectory(\"d\");\n    }\n}\n";
        let outcome = run_fix_loop(
            source,
            &FileSystemContext::assume_referenced(),
            &FixOptions {
                rule: Some("IO0003".to_string()),
                ..FixOptions::default()
            },
        )
        .unwrap();
        let ids: Vec<&str> = outcome.steps.iter().map(|s| s.rule_id.as_str()).collect();
        assert_eq!(ids, ["IO0003"]);
        assert!(outcome.text.contains("_fileSystem.Directory.CreateDirectory"));
        // The class wiring rule was out of scope and still reports.
        assert!(outcome.remaining.iter().any(|d| d.rule_id == "IO0001"));
    }

    #[test]
    fn auto_construct_mode_flows_through() {
        let source = "using System.IO;\n\nclass Service\n{\n    void M()\n    {\n        File.Delete(\"f\");\n    }\n}\n";
        let outcome = run_fix_loop(
            source,
            &FileSystemContext::assume_referenced(),
            &FixOptions {
                mode: InjectionMode::AutoConstruct,
                ..FixOptions::default()
            },
        )
        .unwrap();
        assert!(outcome.text.contains("_fileSystem = new FileSystem();"));
        assert!(outcome.text.contains("_fileSystem.File.Delete(\"f\")"));
    }
}
