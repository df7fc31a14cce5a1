use std::ops::Range;

use log::{debug, warn};

use crate::editing::offsets::SpliceWalk;
use crate::editing::{BatchReport, FormatStyle, History, Patch, locate, offsets};
use crate::models::{Document, Span, Suggestion};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("suggestion {0} is not pending")]
    UnknownSuggestion(String),
    #[error("suggestion {0} has no usable original or suggested text")]
    InvalidSuggestion(String),
    #[error("text not found in document: {0:?}")]
    NotFound(String),
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
    #[error("selection is empty")]
    EmptySelection,
}

/// Editing state for one open document.
///
/// Owns the text, the pending suggestions and the undo/redo history. All
/// mutation goes through the methods below; a fresh session is created
/// whenever another document is loaded.
///
/// ```rust
/// # use writeflow_engine::{EditSession, Span, Suggestion};
/// let mut session = EditSession::new("ab cd ef");
/// session.set_suggestions(vec![
///     Suggestion::positioned("1", Span::new(0, 2), "ab", "XY"),
///     Suggestion::positioned("2", Span::new(3, 5), "cd", "ZZ"),
/// ]);
///
/// let report = session.apply_all();
/// assert_eq!(session.content(), "XY ZZ ef");
/// assert_eq!(report.applied.len(), 2);
///
/// session.undo().unwrap();
/// assert_eq!(session.content(), "ab cd ef");
/// ```
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    document_id: Option<String>,
    title: String,
    content: String,
    suggestions: Vec<Suggestion>,
    history: History,
    /// Incremented on every content change
    version: u64,
    dirty: bool,
}

impl EditSession {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Create a session from raw file bytes, rejecting invalid UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::new(text))
    }

    pub fn from_document(document: &Document) -> Self {
        Self {
            document_id: Some(document.id.clone()),
            title: document.title.clone(),
            content: document.content.clone(),
            ..Self::default()
        }
    }

    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history = History::with_limit(limit);
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.dirty = true;
    }

    pub fn document_id(&self) -> Option<&str> {
        self.document_id.as_deref()
    }

    pub fn set_document_id(&mut self, id: impl Into<String>) {
        self.document_id = Some(id.into());
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Replace the pending set with a freshly generated one.
    pub fn set_suggestions(&mut self, suggestions: Vec<Suggestion>) {
        self.suggestions = suggestions;
    }

    /// Drop a pending suggestion without touching the text.
    pub fn dismiss(&mut self, id: &str) -> Option<Suggestion> {
        let index = self.suggestions.iter().position(|s| s.id == id)?;
        Some(self.suggestions.remove(index))
    }

    /// Apply a single pending suggestion.
    ///
    /// Uses the suggestion's offsets when present, otherwise searches for its
    /// normalized `original_text` as a whole word. On any error the text,
    /// history and pending set are left as they were.
    pub fn apply_one(&mut self, id: &str) -> Result<Patch, EditError> {
        let suggestion = self
            .suggestions
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| EditError::UnknownSuggestion(id.to_string()))?;

        let (bytes, replacement) = match suggestion.position {
            Some(span) => {
                if offsets::slice(&self.content, span) != suggestion.original_text {
                    warn!(
                        "Suggestion {} span {}..{} no longer covers {:?}",
                        suggestion.id, span.start, span.end, suggestion.original_text
                    );
                }
                (
                    offsets::byte_range(&self.content, span),
                    suggestion.suggested_text.clone(),
                )
            }
            None => resolve_textual(&self.content, &suggestion).inspect_err(|e| {
                warn!("Could not apply suggestion {}: {e}", suggestion.id);
            })?,
        };

        let previous = self.content.clone();
        let changed = splice(&mut self.content, bytes, &replacement);
        self.suggestions.retain(|s| s.id != id);
        debug!("Applied suggestion {id}");
        Ok(self.commit(previous, vec![changed]))
    }

    /// Apply every pending suggestion as one undoable step.
    ///
    /// Positioned suggestions go first, in ascending start order, with each
    /// span shifted by the length change of the replacements before it.
    /// Unpositioned ones are then located by text search against the
    /// rewritten text. Overlapping and stale spans are reported but still
    /// spliced positionally. The pending set is always emptied.
    pub fn apply_all(&mut self) -> BatchReport {
        if self.suggestions.is_empty() {
            return BatchReport::empty(self.version);
        }

        let pending = std::mem::take(&mut self.suggestions);
        let (mut positioned, textual): (Vec<_>, Vec<_>) =
            pending.into_iter().partition(|s| s.position.is_some());
        // Stable, so equal starts keep list order.
        positioned.sort_by_key(|s| s.position.map_or(0, |span| span.start));

        let original = self.content.clone();
        let original_len = offsets::char_len(&original);
        let mut report = BatchReport::empty(self.version);
        let mut changed: Vec<Range<usize>> = Vec::new();
        let mut offset: isize = 0;
        let mut previous_end: Option<usize> = None;
        let mut walk = SpliceWalk::new(&original);
        // (char, byte) position of the last span start seen in `original`
        let mut seen = (0usize, 0usize);

        for suggestion in positioned {
            let Some(span) = suggestion.position else {
                continue;
            };
            let span = span.clamped(original_len);

            seen.1 += offsets::char_to_byte(&original[seen.1..], span.start - seen.0);
            seen.0 = span.start;
            let covered = original[seen.1..].chars().take(span.len());
            if !covered.eq(suggestion.original_text.chars()) {
                warn!(
                    "Suggestion {} span {}..{} no longer covers {:?}",
                    suggestion.id, span.start, span.end, suggestion.original_text
                );
                report.stale.push(suggestion.id.clone());
            }

            let start = offsets::shift(span.start, offset);
            let end = offsets::shift(span.end, offset);
            if previous_end.is_some_and(|prev| start < prev) {
                warn!(
                    "Suggestion {} overlaps the previous replacement",
                    suggestion.id
                );
                report.overlapping.push(suggestion.id.clone());
            }

            let range = walk.splice(start, end, &suggestion.suggested_text);
            previous_end = Some(range.end);
            // Both lengths are bounded by the text length.
            offset += range.len() as isize - span.len() as isize;
            changed.push(range);
            report.applied.push(suggestion.id);
        }
        self.content = walk.finish();

        for suggestion in textual {
            match resolve_textual(&self.content, &suggestion) {
                Ok((bytes, replacement)) => {
                    let removed = offsets::byte_to_char(&self.content, bytes.end)
                        - offsets::byte_to_char(&self.content, bytes.start);
                    let range = splice(&mut self.content, bytes, &replacement);
                    shift_ranges(&mut changed, range.start, range.len() as isize - removed as isize);
                    changed.push(range);
                    report.applied.push(suggestion.id);
                }
                Err(e) => {
                    warn!("Skipping suggestion {} in batch: {e}", suggestion.id);
                    report.skipped.push(suggestion.id);
                }
            }
        }

        changed.sort_by_key(|range| range.start);
        report.patch = self.commit(original, changed);
        debug!(
            "Batch applied {} suggestions, skipped {}",
            report.applied.len(),
            report.skipped.len()
        );
        report
    }

    /// Replace the whole text, e.g. after typing.
    ///
    /// Starts a new branch of history, so the redo stack is cleared.
    /// Identical text is a no-op.
    pub fn manual_edit(&mut self, new_text: impl Into<String>) -> Patch {
        let new_text = new_text.into();
        if new_text == self.content {
            return Patch::unchanged(self.version);
        }
        let changed = offsets::changed_region(&self.content, &new_text);
        let previous = std::mem::replace(&mut self.content, new_text);
        self.history.clear_redo();
        self.commit(previous, vec![changed])
    }

    /// Append a dictated transcript, separated from existing text by a space.
    pub fn append_dictation(&mut self, transcript: &str) -> Patch {
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Patch::unchanged(self.version);
        }
        let mut text = self.content.clone();
        if !text.is_empty() && !text.ends_with(' ') {
            text.push(' ');
        }
        text.push_str(transcript);
        self.manual_edit(text)
    }

    /// Wrap the first occurrence of `selected` in style markers.
    ///
    /// Matching is by raw substring, so with repeated text the first
    /// occurrence is wrapped even if another one was selected. Prefer
    /// [`EditSession::format_range`] when the selection offsets are known.
    pub fn format_selection(&mut self, selected: &str, style: FormatStyle) -> Result<Patch, EditError> {
        if selected.is_empty() {
            return Err(EditError::EmptySelection);
        }
        let start = self
            .content
            .find(selected)
            .ok_or_else(|| EditError::NotFound(selected.to_string()))?;
        self.wrap_bytes(start..start + selected.len(), style)
    }

    /// Wrap the text covered by a char span in style markers.
    pub fn format_range(&mut self, span: Span, style: FormatStyle) -> Result<Patch, EditError> {
        let bytes = offsets::byte_range(&self.content, span);
        if bytes.is_empty() {
            return Err(EditError::EmptySelection);
        }
        self.wrap_bytes(bytes, style)
    }

    pub fn undo(&mut self) -> Result<Patch, EditError> {
        let before = self.content.clone();
        if !self.history.undo(&mut self.content) {
            return Err(EditError::NothingToUndo);
        }
        Ok(self.bump(&before))
    }

    pub fn redo(&mut self) -> Result<Patch, EditError> {
        let before = self.content.clone();
        if !self.history.redo(&mut self.content) {
            return Err(EditError::NothingToRedo);
        }
        Ok(self.bump(&before))
    }

    fn wrap_bytes(&mut self, bytes: Range<usize>, style: FormatStyle) -> Result<Patch, EditError> {
        let wrapped = style.wrap(&self.content[bytes.clone()]);
        let previous = self.content.clone();
        let changed = splice(&mut self.content, bytes, &wrapped);
        self.history.clear_redo();
        Ok(self.commit(previous, vec![changed]))
    }

    /// Record `previous` as an undo step and advance the version.
    fn commit(&mut self, previous: String, changed: Vec<Range<usize>>) -> Patch {
        self.history.record(previous);
        self.version += 1;
        self.dirty = true;
        Patch {
            changed,
            version: self.version,
        }
    }

    /// Advance the version after a history move from `before`.
    fn bump(&mut self, before: &str) -> Patch {
        self.version += 1;
        self.dirty = true;
        Patch {
            changed: vec![offsets::changed_region(before, &self.content)],
            version: self.version,
        }
    }
}

/// Locate an unpositioned suggestion, returning the byte range to replace
/// and the normalized replacement text.
fn resolve_textual(content: &str, suggestion: &Suggestion) -> Result<(Range<usize>, String), EditError> {
    let original = locate::normalize_fragment(&suggestion.original_text);
    let replacement = locate::normalize_fragment(&suggestion.suggested_text);
    if original.is_empty() || replacement.is_empty() {
        return Err(EditError::InvalidSuggestion(suggestion.id.clone()));
    }
    let bytes = locate::find_whole_word(content, &original).ok_or(EditError::NotFound(original))?;
    Ok((bytes, replacement))
}

/// Replace `bytes` with `replacement`, returning the written char range.
fn splice(text: &mut String, bytes: Range<usize>, replacement: &str) -> Range<usize> {
    let start = offsets::byte_to_char(text, bytes.start);
    text.replace_range(bytes, replacement);
    start..start + offsets::char_len(replacement)
}

/// Move ranges at or after `at` by `delta` chars.
fn shift_ranges(ranges: &mut [Range<usize>], at: usize, delta: isize) {
    for range in ranges.iter_mut().filter(|range| range.start >= at) {
        range.start = offsets::shift(range.start, delta);
        range.end = offsets::shift(range.end, delta);
    }
}
