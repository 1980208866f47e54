//! Atomic byte-span edit application.
//!
//! An [`EditSet`] records replacements and insertions against one source
//! string and commits them all at once into a new string. A given source
//! range may be replaced at most once per set; insertions at the same
//! offset keep their recorded order.

use std::fmt;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// Two recorded edits touch overlapping source ranges.
    Overlap,
    /// An edit range falls outside the source (or is inverted).
    OutOfBounds,
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::Overlap => write!(f, "edit ranges overlap"),
            EditError::OutOfBounds => write!(f, "edit range outside source"),
        }
    }
}

impl std::error::Error for EditError {}

#[derive(Debug, Clone)]
struct Edit {
    range: Range<usize>,
    text: String,
    seq: usize,
}

/// An ordered set of pending text edits.
#[derive(Debug, Clone, Default)]
pub struct EditSet {
    edits: Vec<Edit>,
}

impl EditSet {
    pub fn new() -> Self {
        EditSet::default()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Replace a source range with new text.
    pub fn replace(&mut self, range: Range<usize>, text: impl Into<String>) {
        let seq = self.edits.len();
        self.edits.push(Edit {
            range,
            text: text.into(),
            seq,
        });
    }

    /// Insert text at an offset without consuming any source.
    pub fn insert(&mut self, at: usize, text: impl Into<String>) {
        self.replace(at..at, text);
    }

    /// Commit every recorded edit against `source`, producing a new string.
    ///
    /// Edits are validated for bounds and overlap first; application is
    /// all-or-nothing.
    pub fn apply(&self, source: &str) -> Result<String, EditError> {
        let mut ordered: Vec<&Edit> = self.edits.iter().collect();
        ordered.sort_by(|a, b| {
            a.range
                .start
                .cmp(&b.range.start)
                .then_with(|| a.seq.cmp(&b.seq))
        });

        let mut high = 0usize;
        for edit in &ordered {
            if edit.range.start > edit.range.end || edit.range.end > source.len() {
                return Err(EditError::OutOfBounds);
            }
            if edit.range.start < high {
                return Err(EditError::Overlap);
            }
            high = high.max(edit.range.end);
        }

        // Apply high-to-low so earlier offsets stay valid. Among edits at
        // the same offset, later-recorded text is spliced first and ends up
        // after earlier-recorded text.
        let mut out = source.to_string();
        for edit in ordered.iter().rev() {
            out.replace_range(edit.range.clone(), &edit.text);
        }
        Ok(out)
    }
}
