use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use writeflow_engine::controller::{ControllerSettings, EditorController, ServiceStatus};
use writeflow_engine::models::{Analytics, Document, DocumentDraft, DocumentSummary, Span, Suggestion, SuggestionBatch};
use writeflow_engine::service::{
    DocumentBackend, InsightReport, PlagiarismReport, ServiceError, SuggestionRequest, TimeRange, WritingService,
};
use writeflow_engine::store::{PreferenceStore, RecentDocuments};

#[derive(Default)]
struct FakeBackend {
    batch: RefCell<Option<SuggestionBatch>>,
    suggest_calls: Cell<usize>,
    created: RefCell<Vec<DocumentDraft>>,
    updated: RefCell<Vec<(String, String)>>,
}

fn down(endpoint: &str) -> ServiceError {
    ServiceError::Status {
        endpoint: endpoint.to_string(),
        status: 503,
        detail: "unavailable".to_string(),
    }
}

impl WritingService for FakeBackend {
    fn suggest(&self, _request: &SuggestionRequest) -> Result<SuggestionBatch, ServiceError> {
        self.suggest_calls.set(self.suggest_calls.get() + 1);
        self.batch.borrow().clone().ok_or_else(|| down("/ai/suggestions"))
    }

    fn rewrite(&self, content: &str, _goal: &str) -> Result<String, ServiceError> {
        Ok(content.to_string())
    }

    fn summarize(&self, _content: &str) -> Result<String, ServiceError> {
        Err(down("/ai/summarize"))
    }

    fn check_plagiarism(&self, _content: &str) -> Result<PlagiarismReport, ServiceError> {
        Err(down("/ai/plagiarism/check"))
    }

    fn insights(&self, _user_id: &str, _range: TimeRange) -> Result<InsightReport, ServiceError> {
        Ok(InsightReport::default())
    }
}

impl DocumentBackend for FakeBackend {
    fn list(&self, _user_id: &str, _limit: usize) -> Result<Vec<Document>, ServiceError> {
        Ok(Vec::new())
    }

    fn load(&self, id: &str) -> Result<Document, ServiceError> {
        Ok(Document {
            id: id.to_string(),
            title: "Loaded".to_string(),
            content: "Loaded body text".to_string(),
            word_count: 3,
            score: 70,
            status: None,
            last_modified: String::new(),
        })
    }

    fn create(&self, draft: &DocumentDraft) -> Result<DocumentSummary, ServiceError> {
        self.created.borrow_mut().push(draft.clone());
        Ok(DocumentSummary {
            document_id: "doc-1".to_string(),
            score: 0,
        })
    }

    fn update(&self, id: &str, title: &str, content: &str) -> Result<Document, ServiceError> {
        self.updated.borrow_mut().push((id.to_string(), content.to_string()));
        Ok(Document {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            word_count: 0,
            score: 0,
            status: None,
            last_modified: String::new(),
        })
    }

    fn delete(&self, _id: &str) -> Result<(), ServiceError> {
        Ok(())
    }
}

fn batch(suggestions: Vec<Suggestion>) -> SuggestionBatch {
    SuggestionBatch {
        suggestions,
        analytics: Some(Analytics {
            readability_score: 80.0,
            engagement_score: 60.0,
            word_diversity: 50.0,
            sentence_variety: 40.0,
            ..Analytics::default()
        }),
    }
}

fn secs(start: Instant, s: u64) -> Instant {
    start + Duration::from_secs(s)
}

#[test]
fn refresh_fires_once_after_typing_settles() {
    let backend = FakeBackend::default();
    *backend.batch.borrow_mut() = Some(batch(vec![Suggestion::textual("s1", "teh", "the")]));
    let mut controller = EditorController::new(backend, ControllerSettings::default());
    let start = Instant::now();

    controller.type_text("teh quick brown", start);
    controller.type_text("teh quick brown fox", start + Duration::from_millis(500));

    assert!(!controller.tick(start + Duration::from_millis(1200)).refreshed);
    assert!(controller.tick(start + Duration::from_millis(1500)).refreshed);
    assert!(!controller.tick(secs(start, 3)).refreshed);

    assert_eq!(controller.service().suggest_calls.get(), 1);
    assert_eq!(controller.status(), ServiceStatus::Success);
    assert_eq!(controller.session().suggestions().len(), 1);
    assert_eq!(controller.analytics_score(), Some(60));
}

#[test]
fn short_content_is_not_analysed() {
    let mut controller = EditorController::new(FakeBackend::default(), ControllerSettings::default());
    let start = Instant::now();

    controller.type_text("ten chars!", start);
    controller.tick(secs(start, 2));

    assert_eq!(controller.service().suggest_calls.get(), 0);
    assert_eq!(controller.status(), ServiceStatus::Idle);
}

#[test]
fn service_failure_clears_suggestions() {
    let backend = FakeBackend::default();
    *backend.batch.borrow_mut() = Some(batch(vec![Suggestion::textual("s1", "teh", "the")]));
    let mut controller = EditorController::new(backend, ControllerSettings::default());
    let start = Instant::now();
    controller.type_text("teh long enough text", start);
    controller.tick(secs(start, 2));
    assert_eq!(controller.session().suggestions().len(), 1);

    *controller.service().batch.borrow_mut() = None;
    controller.type_text("teh long enough text again", secs(start, 3));
    controller.tick(secs(start, 5));

    assert_eq!(controller.status(), ServiceStatus::Unavailable);
    assert!(controller.session().suggestions().is_empty());
}

#[test]
fn late_response_is_dropped_after_an_edit() {
    let mut controller = EditorController::new(FakeBackend::default(), ControllerSettings::default());
    let start = Instant::now();
    controller.type_text("The first version of the text", start);

    let (ticket, _request) = controller.begin_refresh().unwrap();
    controller.type_text("The second version of the text", secs(start, 1));

    let accepted = controller.complete_refresh(
        ticket,
        Ok(batch(vec![Suggestion::positioned("old", Span::new(4, 9), "first", "1st")])),
    );

    assert!(!accepted);
    assert!(controller.session().suggestions().is_empty());
    assert_eq!(controller.status(), ServiceStatus::Idle);
}

#[test]
fn late_response_keeps_loading_while_newer_request_is_out() {
    let mut controller = EditorController::new(FakeBackend::default(), ControllerSettings::default());
    let start = Instant::now();
    controller.type_text("The first version of the text", start);
    let (old, _) = controller.begin_refresh().unwrap();
    controller.type_text("The second version of the text", secs(start, 1));
    let (new, _) = controller.begin_refresh().unwrap();

    assert!(!controller.complete_refresh(old, Ok(batch(Vec::new()))));
    assert_eq!(controller.status(), ServiceStatus::Loading);

    assert!(controller.complete_refresh(new, Ok(batch(Vec::new()))));
    assert_eq!(controller.status(), ServiceStatus::Success);
}

#[test]
fn batch_with_nothing_applied_still_schedules_autosave() {
    let dir = TempDir::new().unwrap();
    let store = PreferenceStore::open(dir.path()).unwrap();
    let mut controller =
        EditorController::new(FakeBackend::default(), ControllerSettings::default()).with_store(store.clone());
    let start = Instant::now();
    controller.open_text("Notes", "Nothing here matches the fix");
    let (ticket, _) = controller.begin_refresh().unwrap();
    controller.complete_refresh(ticket, Ok(batch(vec![Suggestion::textual("s1", "absent", "present")])));

    let report = controller.apply_all(start);

    assert_eq!(report.skipped, vec!["s1".to_string()]);
    assert!(controller.session().is_dirty());
    assert!(controller.tick(secs(start, 5)).saved);
    assert!(!controller.session().is_dirty());
    assert_eq!(RecentDocuments::load(&store).entries()[0].title, "Notes");
}

#[test]
fn refresh_now_skips_debounce_and_reports_failure() {
    let backend = FakeBackend::default();
    *backend.batch.borrow_mut() = Some(batch(vec![Suggestion::textual("s1", "teh", "the")]));
    let mut controller = EditorController::new(backend, ControllerSettings::default());
    controller.open_text("Draft", "short");

    assert!(!controller.refresh_now().unwrap());

    controller.open_text("Draft", "teh text is long enough");
    assert!(controller.refresh_now().unwrap());
    assert_eq!(controller.session().suggestions().len(), 1);
    assert!(!controller.session().is_dirty());

    *controller.service().batch.borrow_mut() = None;
    assert!(controller.refresh_now().is_err());
    assert_eq!(controller.status(), ServiceStatus::Unavailable);
    assert!(controller.session().suggestions().is_empty());
}

#[test]
fn disabled_suggestion_types_are_filtered() {
    let backend = FakeBackend::default();
    *backend.batch.borrow_mut() = Some(batch(vec![
        Suggestion::textual("g", "is", "are").with_kind("grammar"),
        Suggestion::textual("t", "hey", "hello").with_kind("tone"),
    ]));
    let settings = ControllerSettings {
        enabled_types: vec!["grammar".to_string()],
        ..ControllerSettings::default()
    };
    let mut controller = EditorController::new(backend, settings);
    let start = Instant::now();

    controller.type_text("hey, the results is in", start);
    controller.tick(secs(start, 2));

    let kinds: Vec<_> = controller.session().suggestions().iter().map(|s| s.kind.as_str()).collect();
    assert_eq!(kinds, vec!["grammar"]);
}

#[test]
fn autosave_records_recent_document_locally() {
    let dir = TempDir::new().unwrap();
    let store = PreferenceStore::open(dir.path()).unwrap();
    let mut controller =
        EditorController::new(FakeBackend::default(), ControllerSettings::default()).with_store(store.clone());
    let start = Instant::now();

    controller.set_title("Essay", start);
    controller.type_text("A body long enough to save", start);
    assert!(controller.session().is_dirty());

    assert!(!controller.tick(secs(start, 4)).saved);
    assert!(controller.tick(secs(start, 5)).saved);

    assert!(!controller.session().is_dirty());
    let recent = RecentDocuments::load(&store);
    assert_eq!(recent.entries().len(), 1);
    assert_eq!(recent.entries()[0].title, "Essay");
    assert!(controller.service().created.borrow().is_empty());
}

#[test]
fn save_now_creates_then_updates() {
    let settings = ControllerSettings {
        user_id: Some("writer@example.com".to_string()),
        ..ControllerSettings::default()
    };
    let mut controller = EditorController::new(FakeBackend::default(), settings);
    let start = Instant::now();
    controller.set_title("Report", start);
    controller.type_text("Quarterly numbers look good", start);

    controller.save_now().unwrap();
    controller.type_text("Quarterly numbers look great", secs(start, 1));
    controller.save_now().unwrap();

    assert_eq!(controller.session().document_id(), Some("doc-1"));
    assert_eq!(controller.service().created.borrow()[0].user_id, "writer@example.com");
    assert_eq!(
        *controller.service().updated.borrow(),
        vec![("doc-1".to_string(), "Quarterly numbers look great".to_string())]
    );
}

#[test]
fn load_replaces_session_and_history() {
    let mut controller = EditorController::new(FakeBackend::default(), ControllerSettings::default());
    controller.type_text("scratch", Instant::now());

    controller.load("abc").unwrap();

    assert_eq!(controller.session().content(), "Loaded body text");
    assert_eq!(controller.session().document_id(), Some("abc"));
    assert!(!controller.session().history().can_undo());
}
