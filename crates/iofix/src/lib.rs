//! `iofix` CLI: find and fix untestable `System.IO` usage in C# sources.
//!
//! The analysis and rewrite machinery lives in `iofix-rules` and
//! `iofix-fix`; this crate adds file walking, output formatting and the
//! `check`/`fix` subcommands.

pub mod commands;
pub mod output;
pub mod walk;
