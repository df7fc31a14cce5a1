pub mod analysis;
pub mod controller;
pub mod editing;
pub mod models;
pub mod scheduling;
pub mod service;
pub mod store;

// Re-export key types for easier usage
pub use analysis::{DocumentStats, Tone};
pub use controller::{ControllerError, ControllerSettings, EditorController, ServiceStatus, Tick};
pub use editing::{BatchReport, EditError, EditSession, FormatStyle, History, Patch};
pub use models::{Analytics, Document, DocumentDraft, DocumentSummary, Severity, Span, Suggestion, SuggestionBatch};
pub use service::{DocumentBackend, HttpClient, ServiceError, SuggestionRequest, WritingService};
pub use store::{PreferenceStore, StoreError};
