pub mod document;
pub mod suggestion;

pub use document::{Document, DocumentDraft, DocumentSummary};
pub use suggestion::{Analytics, Severity, Span, Suggestion, SuggestionBatch};
