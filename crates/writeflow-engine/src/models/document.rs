use serde::{Deserialize, Serialize};

/// A stored document as returned by the persistence backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub word_count: usize,
    #[serde(default)]
    pub score: u8,
    #[serde(default)]
    pub status: Option<String>,
    /// Backend-formatted timestamp, kept verbatim
    #[serde(default)]
    pub last_modified: String,
}

/// Payload for creating or updating a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentDraft {
    pub title: String,
    pub content: String,
    pub user_id: String,
}

/// Acknowledgement returned when a document is created.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DocumentSummary {
    pub document_id: String,
    #[serde(default)]
    pub score: u8,
}
