//! Text-search fallback for suggestions that carry no offsets.

use std::ops::Range;

use regex::Regex;

const APOSTROPHE_CLASS: &str = "['\u{2018}\u{2019}]";

/// Clean up a fragment quoted back by the analysis service.
///
/// Trims, strips one wrapping double quote at either end (straight or curly)
/// and maps curly apostrophes to `'`.
pub fn normalize_fragment(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix(['"', '\u{201C}', '\u{201D}'])
        .unwrap_or(trimmed);
    let trimmed = trimmed
        .strip_suffix(['"', '\u{201C}', '\u{201D}'])
        .unwrap_or(trimmed);
    trimmed
        .replace(['\u{2018}', '\u{2019}'], "'")
        .trim()
        .to_string()
}

/// Case-insensitive whole-word pattern for `needle`.
///
/// Apostrophes in the needle match straight or curly apostrophes.
pub fn whole_word_pattern(needle: &str) -> Result<Regex, regex::Error> {
    let mut body = String::with_capacity(needle.len() * 2);
    let mut buf = [0u8; 4];
    for c in needle.chars() {
        if c == '\'' {
            body.push_str(APOSTROPHE_CLASS);
        } else {
            body.push_str(&regex::escape(c.encode_utf8(&mut buf)));
        }
    }
    Regex::new(&format!(r"(?i)\b{body}\b"))
}

/// Byte range of the first whole-word, case-insensitive match of `needle`.
pub fn find_whole_word(content: &str, needle: &str) -> Option<Range<usize>> {
    if needle.is_empty() {
        return None;
    }
    match whole_word_pattern(needle) {
        Ok(pattern) => pattern.find(content).map(|m| m.range()),
        Err(e) => {
            log::warn!("Could not build search pattern for {needle:?}: {e}");
            None
        }
    }
}
