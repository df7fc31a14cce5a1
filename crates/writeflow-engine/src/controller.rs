//! Event-driven editor driver.
//!
//! The controller owns an [`EditSession`] and the timers around it. Callers
//! feed it edits together with the current [`Instant`] and call
//! [`EditorController::tick`] periodically; nothing here spawns threads or
//! reads the clock, so the whole flow is deterministic under test.

use std::time::{Duration, Instant};

use chrono::Utc;

use crate::analysis::DocumentStats;
use crate::editing::{BatchReport, EditError, EditSession, FormatStyle, Patch, offsets};
use crate::models::{Document, DocumentDraft, Span, Suggestion, SuggestionBatch};
use crate::scheduling::{Debouncer, RequestSequencer, Ticket};
use crate::service::{DocumentBackend, ServiceError, SuggestionRequest, WritingService};
use crate::store::{PreferenceStore, RecentDocument, RecentDocuments, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Nothing to save: title and content must both be non-empty")]
    NothingToSave,
}

/// State of the most recent suggestion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    pub goal: String,
    pub tone: String,
    pub audience: String,
    /// Required for backend saves; local recents work without it
    pub user_id: Option<String>,
    /// Suggestion types to keep; empty keeps everything
    pub enabled_types: Vec<String>,
    pub min_content_chars: usize,
    pub refresh_window: Duration,
    pub autosave_window: Duration,
    pub history_limit: Option<usize>,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            goal: "clarity".to_string(),
            tone: "professional".to_string(),
            audience: "general".to_string(),
            user_id: None,
            enabled_types: Vec::new(),
            min_content_chars: 10,
            refresh_window: Duration::from_millis(1000),
            autosave_window: Duration::from_millis(5000),
            history_limit: None,
        }
    }
}

/// What a call to [`EditorController::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tick {
    pub refreshed: bool,
    pub saved: bool,
}

pub struct EditorController<S> {
    service: S,
    settings: ControllerSettings,
    session: EditSession,
    refresh: Debouncer,
    autosave: Debouncer,
    sequencer: RequestSequencer,
    status: ServiceStatus,
    analytics_score: Option<u8>,
    store: Option<PreferenceStore>,
    recent: RecentDocuments,
}

impl<S> EditorController<S>
where
    S: WritingService + DocumentBackend,
{
    pub fn new(service: S, settings: ControllerSettings) -> Self {
        let session = EditSession::default().with_history_limit(settings.history_limit);
        Self {
            refresh: Debouncer::new(settings.refresh_window),
            autosave: Debouncer::new(settings.autosave_window),
            service,
            settings,
            session,
            sequencer: RequestSequencer::new(),
            status: ServiceStatus::Idle,
            analytics_score: None,
            store: None,
            recent: RecentDocuments::default(),
        }
    }

    /// Persist recent documents in `store`.
    pub fn with_store(mut self, store: PreferenceStore) -> Self {
        self.recent = RecentDocuments::load(&store);
        self.store = Some(store);
        self
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn status(&self) -> ServiceStatus {
        self.status
    }

    /// Score derived from the last analytics payload, if any.
    pub fn analytics_score(&self) -> Option<u8> {
        self.analytics_score
    }

    pub fn recent_documents(&self) -> &RecentDocuments {
        &self.recent
    }

    pub fn stats(&self) -> DocumentStats {
        DocumentStats::compute(self.session.content(), self.session.suggestions().len())
    }

    pub fn set_title(&mut self, title: &str, now: Instant) {
        self.session.set_title(title);
        self.autosave.schedule(now);
    }

    pub fn type_text(&mut self, text: impl Into<String>, now: Instant) -> Patch {
        let before = self.session.version();
        let patch = self.session.manual_edit(text);
        self.touched(before, now);
        patch
    }

    pub fn dictate(&mut self, transcript: &str, now: Instant) -> Patch {
        let before = self.session.version();
        let patch = self.session.append_dictation(transcript);
        self.touched(before, now);
        patch
    }

    pub fn apply(&mut self, id: &str, now: Instant) -> Result<Patch, EditError> {
        let before = self.session.version();
        let patch = self.session.apply_one(id)?;
        self.touched(before, now);
        Ok(patch)
    }

    pub fn apply_all(&mut self, now: Instant) -> BatchReport {
        let before = self.session.version();
        let report = self.session.apply_all();
        self.touched(before, now);
        report
    }

    pub fn dismiss(&mut self, id: &str) -> Option<Suggestion> {
        self.session.dismiss(id)
    }

    pub fn format_range(&mut self, span: Span, style: FormatStyle, now: Instant) -> Result<Patch, EditError> {
        let before = self.session.version();
        let patch = self.session.format_range(span, style)?;
        self.touched(before, now);
        Ok(patch)
    }

    pub fn undo(&mut self, now: Instant) -> Result<Patch, EditError> {
        let before = self.session.version();
        let patch = self.session.undo()?;
        self.touched(before, now);
        Ok(patch)
    }

    pub fn redo(&mut self, now: Instant) -> Result<Patch, EditError> {
        let before = self.session.version();
        let patch = self.session.redo()?;
        self.touched(before, now);
        Ok(patch)
    }

    /// Reschedule timers if the session recorded an edit since `before`.
    fn touched(&mut self, before: u64, now: Instant) {
        if self.session.version() == before {
            return;
        }
        // Anything computed against the previous text is now stale.
        self.sequencer.invalidate();
        self.refresh.schedule(now);
        self.autosave.schedule(now);
    }

    fn long_enough(&self) -> bool {
        offsets::char_len(self.session.content()) > self.settings.min_content_chars
    }

    /// Fire whichever timers are due at `now`.
    pub fn tick(&mut self, now: Instant) -> Tick {
        let mut tick = Tick::default();

        if self.refresh.fire_if_due(now)
            && let Some((ticket, request)) = self.begin_refresh()
        {
            let result = self.service.suggest(&request);
            tick.refreshed = self.complete_refresh(ticket, result);
        }

        if self.autosave.fire_if_due(now) && self.session.is_dirty() && self.long_enough() {
            match self.autosave_now() {
                Ok(()) => tick.saved = true,
                Err(ControllerError::NothingToSave) => {}
                Err(e) => log::warn!("Auto-save failed: {e}"),
            }
        }

        tick
    }

    /// Start a suggestion request for the current text.
    ///
    /// Returns `None` when the text is too short to analyse, in which case
    /// pending suggestions are left alone.
    pub fn begin_refresh(&mut self) -> Option<(Ticket, SuggestionRequest)> {
        if !self.long_enough() {
            log::debug!("Skipping suggestion refresh for short content");
            return None;
        }
        let ticket = self.sequencer.issue();
        self.status = ServiceStatus::Loading;
        let request = SuggestionRequest {
            content: self.session.content().to_string(),
            goal: self.settings.goal.clone(),
            tone: self.settings.tone.clone(),
            audience: self.settings.audience.clone(),
            user_id: self.settings.user_id.clone(),
        };
        log::debug!("Requesting suggestions (ticket {})", ticket.value());
        Some((ticket, request))
    }

    /// Install the response for `ticket`. Returns false if it was superseded.
    pub fn complete_refresh(&mut self, ticket: Ticket, result: Result<SuggestionBatch, ServiceError>) -> bool {
        if !self.sequencer.accept(ticket) {
            log::debug!("Dropping stale suggestion response (ticket {})", ticket.value());
            if self.status == ServiceStatus::Loading && !self.sequencer.in_flight() {
                self.status = ServiceStatus::Idle;
            }
            return false;
        }
        match result {
            Ok(batch) => self.install(batch),
            Err(e) => self.mark_unavailable(&e),
        }
        true
    }

    /// Refresh suggestions immediately instead of waiting for the debounce.
    ///
    /// Returns `Ok(false)` when the text is too short to analyse. A service
    /// failure is recorded like a failed background refresh and returned.
    pub fn refresh_now(&mut self) -> Result<bool, ServiceError> {
        self.refresh.cancel();
        let Some((ticket, request)) = self.begin_refresh() else {
            return Ok(false);
        };
        let result = self.service.suggest(&request);
        if !self.sequencer.accept(ticket) {
            return Ok(false);
        }
        match result {
            Ok(batch) => {
                self.install(batch);
                Ok(true)
            }
            Err(e) => {
                self.mark_unavailable(&e);
                Err(e)
            }
        }
    }

    fn install(&mut self, batch: SuggestionBatch) {
        let enabled = &self.settings.enabled_types;
        let suggestions = batch
            .suggestions
            .into_iter()
            .filter(|s| enabled.is_empty() || enabled.iter().any(|kind| *kind == s.kind))
            .collect();
        self.session.set_suggestions(suggestions);
        if let Some(analytics) = batch.analytics {
            self.analytics_score = Some(analytics.overall_score());
        }
        self.status = ServiceStatus::Success;
    }

    fn mark_unavailable(&mut self, error: &ServiceError) {
        log::warn!("Suggestion service unavailable: {error}");
        self.session.set_suggestions(Vec::new());
        self.status = ServiceStatus::Unavailable;
    }

    fn autosave_now(&mut self) -> Result<(), ControllerError> {
        if self.settings.user_id.is_some() {
            return self.save_now();
        }
        self.record_recent()?;
        self.session.mark_saved();
        Ok(())
    }

    /// Write the document to the backend and remember it locally.
    ///
    /// Creates the document on first save, updates it afterwards.
    pub fn save_now(&mut self) -> Result<(), ControllerError> {
        if self.session.title().trim().is_empty() || self.session.content().trim().is_empty() {
            return Err(ControllerError::NothingToSave);
        }
        let title = self.session.title().to_string();
        let content = self.session.content().to_string();

        match self.session.document_id() {
            Some(id) => {
                self.service.update(id, &title, &content)?;
            }
            None => {
                let draft = DocumentDraft {
                    title,
                    content,
                    user_id: self.settings.user_id.clone().unwrap_or_default(),
                };
                let created = self.service.create(&draft)?;
                log::info!("Created document {}", created.document_id);
                self.session.set_document_id(created.document_id);
            }
        }

        self.record_recent()?;
        self.session.mark_saved();
        self.autosave.cancel();
        Ok(())
    }

    fn record_recent(&mut self) -> Result<(), ControllerError> {
        let title = self.session.title();
        let content = self.session.content();
        if title.trim().is_empty() || content.trim().is_empty() {
            return Err(ControllerError::NothingToSave);
        }
        let stats = self.stats();
        let score = self.analytics_score.unwrap_or(stats.overall_score);
        self.recent
            .record(RecentDocument::new(title, content, stats.words, score, Utc::now()));
        if let Some(store) = &self.store {
            self.recent.save(store)?;
        }
        Ok(())
    }

    /// Replace the session with a document from the backend.
    pub fn load(&mut self, id: &str) -> Result<(), ControllerError> {
        let document: Document = self.service.load(id)?;
        self.open(&document);
        Ok(())
    }

    /// Replace the session with `document`, discarding history and timers.
    pub fn open(&mut self, document: &Document) {
        self.replace_session(EditSession::from_document(document));
    }

    /// Start an unsaved document, e.g. one read from a local file.
    pub fn open_text(&mut self, title: &str, content: &str) {
        let mut session = EditSession::new(content);
        session.set_title(title);
        session.mark_saved();
        self.replace_session(session);
    }

    fn replace_session(&mut self, session: EditSession) {
        self.session = session.with_history_limit(self.settings.history_limit);
        self.sequencer.invalidate();
        self.refresh.cancel();
        self.autosave.cancel();
        self.status = ServiceStatus::Idle;
        self.analytics_score = None;
    }
}
