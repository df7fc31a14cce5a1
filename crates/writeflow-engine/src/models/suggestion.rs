use serde::{Deserialize, Serialize};

/// Half-open `[start, end)` range of char offsets into a document's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of chars covered; a reversed span covers nothing.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Restrict to `0..len`, collapsing a reversed span onto its start.
    pub fn clamped(self, len: usize) -> Self {
        let start = self.start.min(len);
        Self {
            start,
            end: self.end.min(len).max(start),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Error,
    Warning,
    Info,
    #[serde(other)]
    Unknown,
}

/// A proposed edit returned by the analysis service.
///
/// Only `original_text`, `suggested_text` and `position` drive editing; the
/// remaining fields are carried through for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    /// Category tag such as `spelling`, `grammar` or `tone`
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub category: Option<String>,
    pub original_text: String,
    pub suggested_text: String,
    #[serde(default)]
    pub position: Option<Span>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub rule: Option<String>,
}

fn default_kind() -> String {
    "general".to_string()
}

impl Suggestion {
    /// Suggestion located by text search only.
    pub fn textual(id: impl Into<String>, original: impl Into<String>, suggested: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: default_kind(),
            category: None,
            original_text: original.into(),
            suggested_text: suggested.into(),
            position: None,
            explanation: String::new(),
            confidence: 0.0,
            severity: Severity::default(),
            rule: None,
        }
    }

    /// Suggestion carrying explicit char offsets.
    pub fn positioned(
        id: impl Into<String>,
        span: Span,
        original: impl Into<String>,
        suggested: impl Into<String>,
    ) -> Self {
        Self {
            position: Some(span),
            ..Self::textual(id, original, suggested)
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }
}

/// Aggregate scores reported alongside a suggestion batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Analytics {
    pub readability_score: f64,
    pub sentiment_score: f64,
    pub complexity_score: f64,
    pub engagement_score: f64,
    pub word_diversity: f64,
    pub sentence_variety: f64,
}

impl Analytics {
    /// Weighted 0-100 score shown next to the document title.
    pub fn overall_score(&self) -> u8 {
        let score = self.readability_score * 0.3
            + self.engagement_score * 0.3
            + self.word_diversity * 0.2
            + self.sentence_variety * 0.2;
        score.round().clamp(0.0, 100.0) as u8
    }
}

/// Response body of the suggestion endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SuggestionBatch {
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    #[serde(default)]
    pub analytics: Option<Analytics>,
}
