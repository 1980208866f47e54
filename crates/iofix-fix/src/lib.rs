//! Rewrite synthesis and fix application.
//!
//! This crate turns matched sites from `iofix-rules` into text edits:
//! - [`EditSet`]: atomic byte-span edit application over one source string
//! - [`synthesize`]: per-site edit construction (class wiring, receiver
//!   rewrites, factory rewrites)
//! - [`run_fix_loop`]: the one-fix-at-a-time driver with reparse between
//!   fixes and detection of fix-introduced diagnostics

mod edits;
mod synthesize;
mod verify;

pub use edits::{EditError, EditSet};
pub use synthesize::{InjectionMode, synthesize};
pub use verify::{FixError, FixOptions, FixOutcome, FixStep, run_fix_loop};
