//! C# parse layer for iofix.
//!
//! This crate wraps tree-sitter with the statically linked C# grammar and
//! provides what the analysis and rewrite crates need from a parsed file:
//! - [`SourceUnit`]: source text plus its syntax tree, reparsed after edits
//! - node helpers: text extraction, ancestor walks, canonical text form
//! - [`UsingDirective`] extraction
//! - [`Binder`]: a per-unit symbol table resolving identifiers to the
//!   fields, properties, methods, parameters, locals and types declared in
//!   the same compilation unit

mod binder;
mod node;
mod parser;
mod usings;

pub use binder::{Binder, SymbolBinding, SymbolKind};
pub use node::{ancestors, enclosing_class, leftmost_identifier, line_indent, normalize};
pub use parser::{ParseError, SourceUnit, language};
pub use usings::{UsingDirective, extract_usings};
