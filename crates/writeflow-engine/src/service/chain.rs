use std::fmt;

use crate::editing::EditSession;
use crate::service::{ServiceError, SuggestionRequest, WritingService};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainStep {
    Correct,
    Rewrite,
    Summarize,
}

impl fmt::Display for ChainStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChainStep::Correct => "correction",
            ChainStep::Rewrite => "rewrite",
            ChainStep::Summarize => "summarize",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{step} step failed: {source}")]
pub struct ChainError {
    pub step: ChainStep,
    #[source]
    pub source: ServiceError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainOutcome {
    pub corrected: String,
    pub rewritten: String,
    pub summary: String,
}

fn failed_at(step: ChainStep) -> impl FnOnce(ServiceError) -> ChainError {
    move |source| ChainError { step, source }
}

/// Correct, rewrite, then summarize `request.content`.
///
/// Corrections are applied with [`EditSession::apply_all`] on a scratch
/// session, so the caller's own session is untouched.
pub fn run_chain(
    service: &impl WritingService,
    request: &SuggestionRequest,
) -> Result<ChainOutcome, ChainError> {
    let batch = service.suggest(request).map_err(failed_at(ChainStep::Correct))?;
    let mut scratch = EditSession::new(request.content.as_str());
    scratch.set_suggestions(batch.suggestions);
    scratch.apply_all();
    let corrected = scratch.content().to_string();

    let rewritten = service
        .rewrite(&corrected, &request.goal)
        .map_err(failed_at(ChainStep::Rewrite))?;
    let rewritten = if rewritten.trim().is_empty() {
        corrected.clone()
    } else {
        rewritten
    };

    let summary = service
        .summarize(&rewritten)
        .map_err(failed_at(ChainStep::Summarize))?;

    Ok(ChainOutcome {
        corrected,
        rewritten,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Span, Suggestion, SuggestionBatch};
    use crate::service::{InsightReport, PlagiarismReport, TimeRange};
    use pretty_assertions::assert_eq;

    struct Scripted {
        suggestions: Vec<Suggestion>,
        rewrite: Option<String>,
    }

    fn unavailable(endpoint: &str) -> ServiceError {
        ServiceError::Status {
            endpoint: endpoint.to_string(),
            status: 503,
            detail: "down".to_string(),
        }
    }

    impl WritingService for Scripted {
        fn suggest(&self, _request: &SuggestionRequest) -> Result<SuggestionBatch, ServiceError> {
            Ok(SuggestionBatch {
                suggestions: self.suggestions.clone(),
                analytics: None,
            })
        }

        fn rewrite(&self, content: &str, goal: &str) -> Result<String, ServiceError> {
            match &self.rewrite {
                Some(text) => Ok(text.clone()),
                None if goal == "fail" => Err(unavailable("/ai/rewrite")),
                None => Ok(content.to_uppercase()),
            }
        }

        fn summarize(&self, content: &str) -> Result<String, ServiceError> {
            Ok(format!("{} words", content.split_whitespace().count()))
        }

        fn check_plagiarism(&self, _content: &str) -> Result<PlagiarismReport, ServiceError> {
            Err(unavailable("/ai/plagiarism/check"))
        }

        fn insights(&self, _user_id: &str, _range: TimeRange) -> Result<InsightReport, ServiceError> {
            Ok(InsightReport::default())
        }
    }

    fn request(content: &str, goal: &str) -> SuggestionRequest {
        SuggestionRequest {
            content: content.to_string(),
            goal: goal.to_string(),
            tone: "professional".to_string(),
            audience: "general".to_string(),
            user_id: None,
        }
    }

    #[test]
    fn test_chain_corrects_then_rewrites_then_summarizes() {
        let service = Scripted {
            suggestions: vec![Suggestion::positioned("s1", Span::new(0, 3), "Teh", "The")],
            rewrite: None,
        };

        let outcome = run_chain(&service, &request("Teh cat sat", "clarity")).unwrap();

        assert_eq!(
            outcome,
            ChainOutcome {
                corrected: "The cat sat".to_string(),
                rewritten: "THE CAT SAT".to_string(),
                summary: "3 words".to_string(),
            }
        );
    }

    #[test]
    fn test_blank_rewrite_keeps_corrected_text() {
        let service = Scripted {
            suggestions: Vec::new(),
            rewrite: Some("   ".to_string()),
        };

        let outcome = run_chain(&service, &request("Plain text here", "clarity")).unwrap();

        assert_eq!(outcome.rewritten, "Plain text here");
    }

    #[test]
    fn test_failure_names_the_step() {
        let service = Scripted {
            suggestions: Vec::new(),
            rewrite: None,
        };

        let err = run_chain(&service, &request("Some text", "fail")).unwrap_err();

        assert_eq!(err.step, ChainStep::Rewrite);
        assert!(err.to_string().starts_with("rewrite step failed"));
    }
}
