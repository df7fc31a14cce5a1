use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::models::{Document, DocumentDraft, DocumentSummary, SuggestionBatch};
use crate::service::{
    DocumentBackend, InsightReport, PlagiarismReport, ServiceError, SuggestionRequest, TimeRange,
    WritingService,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// JSON-over-HTTP client for the writing backend.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    token: Option<String>,
    http: Client,
}

#[derive(Serialize)]
struct RewriteBody<'a> {
    content: &'a str,
    goal: &'a str,
}

#[derive(Serialize)]
struct ContentBody<'a> {
    content: &'a str,
}

#[derive(Serialize)]
struct PlagiarismBody<'a> {
    content: &'a str,
    check_web: bool,
    check_academic: bool,
}

#[derive(Serialize)]
struct InsightBody<'a> {
    user_id: &'a str,
    time_range: TimeRange,
}

#[derive(Serialize)]
struct UpdateBody<'a> {
    title: &'a str,
    content: &'a str,
}

#[derive(serde::Deserialize)]
struct RewriteReply {
    #[serde(default)]
    rewritten_text: String,
}

#[derive(serde::Deserialize)]
struct SummaryReply {
    #[serde(default)]
    summary: String,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let base_url = base_url.into();
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ServiceError::Transport {
                endpoint: base_url.clone(),
                source,
            })?;
        Ok(Self {
            base_url,
            token: None,
            http,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ServiceError> {
        self.send(path, self.http.post(self.url(path)).json(body))
    }

    fn send<T: DeserializeOwned>(&self, endpoint: &str, request: RequestBuilder) -> Result<T, ServiceError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let transport = |source| ServiceError::Transport {
            endpoint: endpoint.to_string(),
            source,
        };

        let response = request.send().map_err(transport)?;
        let status = response.status();
        let body = response.text().map_err(transport)?;

        if !status.is_success() {
            log::warn!("{endpoint} returned {status}");
            return Err(ServiceError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                detail: error_detail(&body, status.as_u16()),
            });
        }

        serde_json::from_str(&body).map_err(|source| ServiceError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

/// Pull the `detail` message out of an error body, falling back to the status.
fn error_detail(body: &str, status: u16) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or_else(|| format!("HTTP error! status: {status}"))
}

impl WritingService for HttpClient {
    fn suggest(&self, request: &SuggestionRequest) -> Result<SuggestionBatch, ServiceError> {
        self.post("/ai/suggestions", request)
    }

    fn rewrite(&self, content: &str, goal: &str) -> Result<String, ServiceError> {
        let reply: RewriteReply = self.post("/ai/rewrite", &RewriteBody { content, goal })?;
        Ok(reply.rewritten_text)
    }

    fn summarize(&self, content: &str) -> Result<String, ServiceError> {
        let reply: SummaryReply = self.post("/ai/summarize", &ContentBody { content })?;
        Ok(reply.summary)
    }

    fn check_plagiarism(&self, content: &str) -> Result<PlagiarismReport, ServiceError> {
        self.post(
            "/ai/plagiarism/check",
            &PlagiarismBody {
                content,
                check_web: true,
                check_academic: true,
            },
        )
    }

    fn insights(&self, user_id: &str, range: TimeRange) -> Result<InsightReport, ServiceError> {
        self.post(
            "/ai/insights",
            &InsightBody {
                user_id,
                time_range: range,
            },
        )
    }
}

impl DocumentBackend for HttpClient {
    fn list(&self, user_id: &str, limit: usize) -> Result<Vec<Document>, ServiceError> {
        let limit = limit.to_string();
        let request = self
            .http
            .get(self.url("/documents"))
            .query(&[("user_id", user_id), ("limit", limit.as_str())]);
        self.send("/documents", request)
    }

    fn load(&self, id: &str) -> Result<Document, ServiceError> {
        let path = format!("/documents/{id}");
        self.send(&path, self.http.get(self.url(&path)))
    }

    fn create(&self, draft: &DocumentDraft) -> Result<DocumentSummary, ServiceError> {
        self.post("/documents", draft)
    }

    fn update(&self, id: &str, title: &str, content: &str) -> Result<Document, ServiceError> {
        let path = format!("/documents/{id}");
        let request = self.http.put(self.url(&path)).json(&UpdateBody { title, content });
        self.send(&path, request)
    }

    fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let path = format!("/documents/{id}");
        let _: serde_json::Value = self.send(&path, self.http.delete(self.url(&path)))?;
        Ok(())
    }
}
