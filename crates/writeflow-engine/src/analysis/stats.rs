use std::fmt;

use serde::Serialize;

const FORMAL_MARKERS: [&str; 6] = [
    "therefore",
    "furthermore",
    "consequently",
    "utilize",
    "facilitate",
    "subsequently",
];
const INFORMAL_MARKERS: [&str; 6] = ["gonna", "wanna", "gotta", "cool", "awesome", "yeah"];

/// Points deducted from the overall score per pending suggestion
const SUGGESTION_PENALTY: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Formal,
    Informal,
    Neutral,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tone::Formal => "formal",
            Tone::Informal => "informal",
            Tone::Neutral => "neutral",
        };
        f.write_str(name)
    }
}

/// Live statistics shown beside the editor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentStats {
    pub words: usize,
    pub characters: usize,
    pub sentences: usize,
    /// 0-100, higher means shorter sentences
    pub readability: u8,
    pub tone: Tone,
    /// 0-100, reduced by pending suggestions
    pub overall_score: u8,
}

impl DocumentStats {
    pub fn compute(content: &str, pending_suggestions: usize) -> Self {
        let words = content.split_whitespace().count();
        let sentences = content
            .split(['.', '!', '?'])
            .filter(|sentence| !sentence.trim().is_empty())
            .count();

        let words_per_sentence = words as f64 / sentences.max(1) as f64;
        let readability = (100.0 - words_per_sentence * 1.5).clamp(0.0, 100.0).round() as u8;

        let overall_score = 100usize.saturating_sub(pending_suggestions * SUGGESTION_PENALTY) as u8;

        Self {
            words,
            characters: content.chars().count(),
            sentences,
            readability,
            tone: detect_tone(content),
            overall_score,
        }
    }

    pub fn exceeds_word_limit(&self, limit: usize) -> bool {
        self.words > limit
    }
}

fn detect_tone(content: &str) -> Tone {
    let lower = content.to_lowercase();
    let formal = FORMAL_MARKERS.iter().filter(|w| lower.contains(*w)).count();
    let informal = INFORMAL_MARKERS.iter().filter(|w| lower.contains(*w)).count();
    match formal.cmp(&informal) {
        std::cmp::Ordering::Greater => Tone::Formal,
        std::cmp::Ordering::Less => Tone::Informal,
        std::cmp::Ordering::Equal => Tone::Neutral,
    }
}
