//! Char/byte offset helpers.
//!
//! Suggestion positions arrive as char offsets while `String` splicing needs
//! byte offsets. Everything here clamps instead of panicking: offsets past
//! the end land on the end, and a reversed span collapses to its start.

use std::ops::Range;

use crate::models::Span;

/// Number of chars in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the char at `char_idx`, clamped to `text.len()`.
pub fn char_to_byte(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(byte, _)| byte)
}

/// Char offset of `byte_idx`, rounding down to the enclosing char boundary.
pub fn byte_to_char(text: &str, byte_idx: usize) -> usize {
    let mut boundary = byte_idx.min(text.len());
    while !text.is_char_boundary(boundary) {
        boundary -= 1;
    }
    text[..boundary].chars().count()
}

/// Resolve a char span to a valid byte range of `text`.
pub fn byte_range(text: &str, span: Span) -> Range<usize> {
    let start = char_to_byte(text, span.start);
    let end = char_to_byte(text, span.end).max(start);
    start..end
}

/// Text covered by `span`, clamped to `text`.
pub fn slice(text: &str, span: Span) -> &str {
    &text[byte_range(text, span)]
}

/// Apply a signed running offset to a position, saturating at zero.
pub fn shift(pos: usize, offset: isize) -> usize {
    pos.saturating_add_signed(offset)
}

/// Smallest char range of `new` that differs from `old`.
///
/// Equal inputs give an empty range at the end of the common prefix.
pub fn changed_region(old: &str, new: &str) -> Range<usize> {
    let prefix = old
        .chars()
        .zip(new.chars())
        .take_while(|(a, b)| a == b)
        .count();
    let old_rest: Vec<char> = old.chars().skip(prefix).collect();
    let new_rest: Vec<char> = new.chars().skip(prefix).collect();
    let suffix = old_rest
        .iter()
        .rev()
        .zip(new_rest.iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    prefix..prefix + new_rest.len() - suffix
}

/// Rebuilds a text from ascending char-offset splices in one pass.
///
/// Positions are char offsets into the text as edited so far. A splice that
/// starts inside already written text re-splices that part; positions past
/// the end clamp to the end.
#[derive(Debug)]
pub(crate) struct SpliceWalk<'a> {
    source: &'a str,
    /// Byte offset of the first unconsumed char of `source`
    read: usize,
    out: String,
    out_chars: usize,
}

impl<'a> SpliceWalk<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self {
            source,
            read: 0,
            out: String::with_capacity(source.len()),
            out_chars: 0,
        }
    }

    /// Replace chars `start..end` with `replacement`, returning the char
    /// range it now occupies.
    pub(crate) fn splice(&mut self, start: usize, end: usize, replacement: &str) -> Range<usize> {
        let remove = end.saturating_sub(start);
        let mut carried = String::new();
        if start >= self.out_chars {
            self.copy_source(start - self.out_chars);
        } else {
            carried = self.out.split_off(char_to_byte(&self.out, start));
            self.out_chars = start;
        }
        let start = self.out_chars;

        let carried_chars = char_len(&carried);
        let dropped = remove.min(carried_chars);
        self.skip_source(remove - dropped);

        self.out.push_str(replacement);
        self.out_chars += char_len(replacement);
        let written = start..self.out_chars;

        self.out.push_str(&carried[char_to_byte(&carried, dropped)..]);
        self.out_chars += carried_chars - dropped;
        written
    }

    pub(crate) fn finish(mut self) -> String {
        self.out.push_str(&self.source[self.read..]);
        self.out
    }

    fn copy_source(&mut self, count: usize) {
        let rest = &self.source[self.read..];
        let copied = &rest[..char_to_byte(rest, count)];
        self.out.push_str(copied);
        self.out_chars += char_len(copied);
        self.read += copied.len();
    }

    fn skip_source(&mut self, count: usize) {
        self.read += char_to_byte(&self.source[self.read..], count);
    }
}
