//! Per-compilation gating of the analysis.

use crate::registry::ABSTRACTION_NAMESPACE;

/// Cached answer to "is the abstraction assembly referenced at all?".
///
/// Created once per analysis session and read-only afterward. When the
/// abstraction is not referenced the rewrites could never compile, so the
/// whole analysis short-circuits to zero diagnostics.
#[derive(Debug, Clone)]
pub struct FileSystemContext {
    has_reference: bool,
}

impl FileSystemContext {
    /// Build from the names of the assemblies referenced by the project
    /// under analysis.
    pub fn new<S: AsRef<str>>(references: &[S]) -> Self {
        FileSystemContext {
            has_reference: references
                .iter()
                .any(|r| r.as_ref() == ABSTRACTION_NAMESPACE),
        }
    }

    /// Context for callers that cannot enumerate references (e.g. the CLI
    /// pointed at loose sources) and opt in to analysis unconditionally.
    pub fn assume_referenced() -> Self {
        FileSystemContext {
            has_reference: true,
        }
    }

    pub fn has_reference(&self) -> bool {
        self.has_reference
    }
}
