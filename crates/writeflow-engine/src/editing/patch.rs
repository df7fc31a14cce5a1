use std::ops::Range;

/// Result of applying an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Char ranges of the post-edit text that were written
    pub changed: Vec<Range<usize>>,
    pub version: u64,
}

impl Patch {
    pub fn unchanged(version: u64) -> Self {
        Self {
            changed: Vec::new(),
            version,
        }
    }

    /// True when nothing was written. A deletion still reports the
    /// (empty) range where text was removed.
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Outcome of applying the whole pending suggestion set at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub patch: Patch,
    /// Ids spliced into the text, in application order
    pub applied: Vec<String>,
    /// Ids whose text could not be located (or had nothing usable to apply)
    pub skipped: Vec<String>,
    /// Ids whose adjusted span started inside the previous replacement
    pub overlapping: Vec<String>,
    /// Ids whose span no longer covered their `original_text`
    pub stale: Vec<String>,
}

impl BatchReport {
    pub(crate) fn empty(version: u64) -> Self {
        Self {
            patch: Patch::unchanged(version),
            applied: Vec::new(),
            skipped: Vec::new(),
            overlapping: Vec::new(),
            stale: Vec::new(),
        }
    }
}
