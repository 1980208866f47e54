//! Rule-based classification of untestable filesystem API use in C#.
//!
//! This crate provides:
//! - the immutable type registry mapping real `System.IO` types to their
//!   `System.IO.Abstractions` counterparts and diagnostic metadata
//! - the site matcher, with a syntactic (textual prefix) and a semantic
//!   (binder-backed) strategy, plus the already-through-the-abstraction
//!   exclusion check
//! - ordered, serializable diagnostics
//! - the class shape inspector backing the constructor-injection rule and
//!   the rewrite layer

mod context;
mod diagnostics;
mod matcher;
mod registry;
mod shape;

pub use context::FileSystemContext;
pub use diagnostics::{Diagnostic, Location, Severity, report};
pub use matcher::{MatchStrategy, SiteKind, SiteMatch, analyze, match_unit};
pub use shape::{ClassShape, inspect, is_abstraction_interface};
pub use registry::{
    ABSTRACTION_CLASS, ABSTRACTION_INTERFACE, ABSTRACTION_NAMESPACE, FIELD_NAME, IO_NAMESPACE,
    PARAMETER_NAME, RuleKind, TypeBinding, builtin, lookup,
};
