//! Fix command - apply available rewrites file by file.

use crate::commands::StrategyArg;
use crate::output::{OutputFormat, OutputFormatter};
use crate::walk::collect_cs_files;
use clap::Args;
use iofix_fix::{FixOptions, FixStep, InjectionMode, run_fix_loop};
use iofix_rules::{FileSystemContext, lookup};
use serde::Serialize;
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct FixArgs {
    /// C# file or directory to fix
    pub path: PathBuf,

    /// Matching strategy
    #[arg(long, value_enum, default_value_t = StrategyArg::Semantic)]
    pub strategy: StrategyArg,

    /// Only fix one rule id (e.g. IO0003)
    #[arg(long, value_name = "ID")]
    pub rule: Option<String>,

    /// Print fixed sources instead of writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Assign the injected field from `new FileSystem()` instead of a
    /// constructor parameter
    #[arg(long)]
    pub auto_construct: bool,
}

/// Per-file fix summary.
#[derive(Debug, Serialize)]
pub struct FileFix {
    pub file: String,
    pub fixes: Vec<FixStep>,
    /// Rule ids introduced by a fix; non-empty means the file's session
    /// stopped early.
    pub introduced: Vec<String>,
    /// Diagnostics still present after fixing.
    pub remaining: usize,
    pub changed: bool,
    /// Fixed source, carried only in dry-run mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Result of the fix command.
#[derive(Debug, Serialize)]
pub struct FixResult {
    pub files_changed: usize,
    pub results: Vec<FileFix>,
}

impl OutputFormatter for FixResult {
    fn format_text(&self) -> String {
        let mut out = String::new();
        for r in &self.results {
            if r.fixes.is_empty() && r.introduced.is_empty() {
                continue;
            }
            writeln!(out, "{}:", r.file).unwrap();
            for fix in &r.fixes {
                writeln!(out, "  {}:{} [{}] fixed", fix.line, fix.column, fix.rule_id).unwrap();
            }
            if !r.introduced.is_empty() {
                writeln!(
                    out,
                    "  fix introduced new diagnostics: {}",
                    r.introduced.join(", ")
                )
                .unwrap();
            }
            if r.remaining > 0 {
                writeln!(out, "  {} diagnostic(s) remain", r.remaining).unwrap();
            }
            if let Some(text) = &r.text {
                writeln!(out, "--- fixed source ---").unwrap();
                out.push_str(text);
            }
        }
        write!(out, "{} file(s) changed", self.files_changed).unwrap();
        out
    }
}

/// Run the fix command. Exit 1 on any fix failure or write error.
pub fn run(args: FixArgs, format: OutputFormat) -> i32 {
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
    let options = FixOptions {
        strategy: args.strategy.into(),
        mode: if args.auto_construct {
            InjectionMode::AutoConstruct
        } else {
            InjectionMode::Parameter
        },
        rule: args.rule.clone(),
    };

    let mut result = FixResult {
        files_changed: 0,
        results: Vec::new(),
    };
    let mut failed = false;

    for file in files {
        let source = match std::fs::read_to_string(&file) {
            Ok(source) => source,
            Err(err) => {
                eprintln!("warning: skipping {}: {err}", file.display());
                continue;
            }
        };
        let outcome = match run_fix_loop(&source, &ctx, &options) {
            Ok(outcome) => outcome,
            Err(err) => {
                eprintln!("warning: skipping {}: {err}", file.display());
                continue;
            }
        };

        let changed = outcome.text != source;
        if outcome.failed() {
            failed = true;
        }
        if changed && !args.dry_run {
            if let Err(err) = std::fs::write(&file, &outcome.text) {
                eprintln!("error: writing {}: {err}", file.display());
                failed = true;
                continue;
            }
        }
        if changed {
            result.files_changed += 1;
        }
        result.results.push(FileFix {
            file: file.display().to_string(),
            fixes: outcome.steps,
            introduced: outcome.introduced,
            remaining: outcome.remaining.len(),
            changed,
            text: if args.dry_run && changed {
                Some(outcome.text)
            } else {
                None
            },
        });
    }

    result.print(&format);
    if failed { 1 } else { 0 }
}
