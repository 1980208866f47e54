//! Check command - report diagnostics without modifying sources.

use crate::commands::StrategyArg;
use crate::output::{OutputFormat, OutputFormatter};
use crate::walk::collect_cs_files;
use clap::Args;
use iofix_rules::{Diagnostic, FileSystemContext, analyze, lookup};
use iofix_syntax::SourceUnit;
use nu_ansi_term::Color::{Cyan, Yellow};
use serde::Serialize;
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// C# file or directory to analyze
    pub path: PathBuf,

    /// Matching strategy
    #[arg(long, value_enum, default_value_t = StrategyArg::Semantic)]
    pub strategy: StrategyArg,

    /// Only report one rule id (e.g. IO0006)
    #[arg(long, value_name = "ID")]
    pub rule: Option<String>,
}

/// One diagnostic tagged with its file.
#[derive(Debug, Serialize)]
pub struct FileDiagnostic {
    pub file: String,
    #[serde(flatten)]
    pub diagnostic: Diagnostic,
}

/// Result of the check command.
#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub files_scanned: usize,
    pub diagnostics: Vec<FileDiagnostic>,
}

impl OutputFormatter for CheckResult {
    fn format_text(&self) -> String {
        let mut out = String::new();
        for d in &self.diagnostics {
            writeln!(
                out,
                "{}:{}:{}: {} [{}] {}",
                d.file,
                d.diagnostic.location.line,
                d.diagnostic.location.column,
                d.diagnostic.severity,
                d.diagnostic.rule_id,
                d.diagnostic.message
            )
            .unwrap();
        }
        write!(
            out,
            "{} diagnostic(s) in {} file(s)",
            self.diagnostics.len(),
            self.files_scanned
        )
        .unwrap();
        out
    }

    fn format_pretty(&self) -> String {
        let mut out = String::new();
        for d in &self.diagnostics {
            writeln!(
                out,
                "{}:{}:{}: {} [{}] {}",
                d.file,
                d.diagnostic.location.line,
                d.diagnostic.location.column,
                Yellow.paint(d.diagnostic.severity.to_string()),
                Cyan.paint(d.diagnostic.rule_id.as_str()),
                d.diagnostic.message
            )
            .unwrap();
        }
        write!(
            out,
            "{} diagnostic(s) in {} file(s)",
            self.diagnostics.len(),
            self.files_scanned
        )
        .unwrap();
        out
    }
}

/// Run the check command. Exit 1 when diagnostics were found.
pub fn run(args: CheckArgs, format: OutputFormat) -> i32 {
    if let Some(rule) = args.rule.as_deref() {
        if lookup(rule).is_none() {
            eprintln!("error: unknown rule id: {rule}");
            return 2;
        }
    }
    let files = match collect_cs_files(&args.path) {
        Ok(files) => files,
        Err(err) => {
            eprintln!("error: {err}");
            return 2;
        }
    };

    let ctx = FileSystemContext::assume_referenced();
    let strategy = args.strategy.into();
    let mut result = CheckResult {
        files_scanned: 0,
        diagnostics: Vec::new(),
    };

    for file in files {
        let source = match std::fs::read_to_string(&file) {
            Ok(source) => source,
            Err(err) => {
                eprintln!("warning: skipping {}: {err}", file.display());
                continue;
            }
        };
        let unit = match SourceUnit::parse(source) {
            Ok(unit) => unit,
            Err(err) => {
                eprintln!("warning: skipping {}: {err}", file.display());
                continue;
            }
        };
        result.files_scanned += 1;
        let diags: Vec<Diagnostic> = analyze(&unit, &ctx, strategy)
            .into_iter()
            .filter(|d| args.rule.as_deref().is_none_or(|r| r == d.rule_id))
            .collect();
        let file = file.display().to_string();
        result.diagnostics.extend(diags.into_iter().map(|diagnostic| FileDiagnostic {
            file: file.clone(),
            diagnostic,
        }));
    }

    let found = !result.diagnostics.is_empty();
    result.print(&format);
    if found { 1 } else { 0 }
}
