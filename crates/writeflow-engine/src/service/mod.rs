//! Boundary to the remote analysis and persistence backend.
//!
//! The engine only sees the two traits below; `HttpClient` is the production
//! implementation and tests substitute in-memory fakes.

pub mod chain;
pub mod http;

use serde::{Deserialize, Serialize};

use crate::models::{Document, DocumentDraft, DocumentSummary, SuggestionBatch};

pub use chain::{ChainError, ChainOutcome, ChainStep, run_chain};
pub use http::HttpClient;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}: {detail}")]
    Status {
        endpoint: String,
        status: u16,
        detail: String,
    },
    #[error("could not decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Body of a suggestion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionRequest {
    pub content: String,
    pub goal: String,
    pub tone: String,
    pub audience: String,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    #[default]
    Week,
    Month,
    Year,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlagiarismMatch {
    pub id: String,
    pub source: String,
    pub similarity: f64,
    #[serde(default)]
    pub matched_text: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlagiarismReport {
    pub overall_score: f64,
    #[serde(default)]
    pub risk_level: String,
    #[serde(default)]
    pub matches: Vec<PlagiarismMatch>,
    #[serde(default)]
    pub sources_checked: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WritingInsight {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub impact: String,
    #[serde(default)]
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct InsightReport {
    pub insights: Vec<WritingInsight>,
    pub performance_metrics: serde_json::Map<String, serde_json::Value>,
    pub improvement_areas: Vec<String>,
}

/// Stateless request/response analysis calls.
pub trait WritingService {
    fn suggest(&self, request: &SuggestionRequest) -> Result<SuggestionBatch, ServiceError>;

    fn rewrite(&self, content: &str, goal: &str) -> Result<String, ServiceError>;

    fn summarize(&self, content: &str) -> Result<String, ServiceError>;

    fn check_plagiarism(&self, content: &str) -> Result<PlagiarismReport, ServiceError>;

    fn insights(&self, user_id: &str, range: TimeRange) -> Result<InsightReport, ServiceError>;
}

/// Document persistence.
pub trait DocumentBackend {
    fn list(&self, user_id: &str, limit: usize) -> Result<Vec<Document>, ServiceError>;

    fn load(&self, id: &str) -> Result<Document, ServiceError>;

    fn create(&self, draft: &DocumentDraft) -> Result<DocumentSummary, ServiceError>;

    fn update(&self, id: &str, title: &str, content: &str) -> Result<Document, ServiceError>;

    fn delete(&self, id: &str) -> Result<(), ServiceError>;
}
