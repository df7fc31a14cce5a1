use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::{PreferenceStore, StoreError};

pub const RECENT_DOCUMENTS_KEY: &str = "recent_documents";
pub const RECENT_CHECKS_KEY: &str = "plagiarism_recent_checks";

const MAX_RECENT_DOCUMENTS: usize = 10;
const MAX_RECENT_CHECKS: usize = 5;
const CHECK_PREVIEW_CHARS: usize = 60;

/// Locally remembered auto-save of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentDocument {
    pub id: String,
    pub title: String,
    pub content: String,
    pub last_modified: DateTime<Utc>,
    pub word_count: usize,
    pub score: u8,
}

impl RecentDocument {
    pub fn new(title: &str, content: &str, word_count: usize, score: u8, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            content: content.to_string(),
            last_modified: now,
            word_count,
            score,
        }
    }
}

/// Newest-first list of auto-saved documents, one entry per title.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecentDocuments {
    entries: Vec<RecentDocument>,
}

impl RecentDocuments {
    /// Load from the store; an unreadable list starts empty.
    pub fn load(store: &PreferenceStore) -> Self {
        Self {
            entries: load_list(store, RECENT_DOCUMENTS_KEY),
        }
    }

    pub fn save(&self, store: &PreferenceStore) -> Result<(), StoreError> {
        store.set(RECENT_DOCUMENTS_KEY, &self.entries)
    }

    pub fn record(&mut self, entry: RecentDocument) {
        self.entries.retain(|existing| existing.title != entry.title);
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_RECENT_DOCUMENTS);
    }

    pub fn entries(&self) -> &[RecentDocument] {
        &self.entries
    }
}

/// A plagiarism check remembered for the history panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentCheck {
    /// First characters of the checked text
    pub content: String,
    pub score: f64,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecentChecks {
    entries: Vec<RecentCheck>,
}

impl RecentChecks {
    pub fn load(store: &PreferenceStore) -> Self {
        Self {
            entries: load_list(store, RECENT_CHECKS_KEY),
        }
    }

    pub fn save(&self, store: &PreferenceStore) -> Result<(), StoreError> {
        store.set(RECENT_CHECKS_KEY, &self.entries)
    }

    pub fn record(&mut self, content: &str, score: f64, now: DateTime<Utc>) {
        let mut preview: String = content.chars().take(CHECK_PREVIEW_CHARS).collect();
        if content.chars().count() > CHECK_PREVIEW_CHARS {
            preview.push_str("...");
        }
        self.entries.insert(
            0,
            RecentCheck {
                content: preview,
                score,
                date: now,
            },
        );
        self.entries.truncate(MAX_RECENT_CHECKS);
    }

    pub fn entries(&self) -> &[RecentCheck] {
        &self.entries
    }
}

fn load_list<T: serde::de::DeserializeOwned>(store: &PreferenceStore, key: &str) -> Vec<T> {
    match store.get(key) {
        Ok(entries) => entries.unwrap_or_default(),
        Err(e) => {
            log::warn!("Discarding unreadable {key} list: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap()
    }

    #[test]
    fn test_recent_documents_replace_same_title() {
        let mut recent = RecentDocuments::default();
        recent.record(RecentDocument::new("Essay", "v1", 1, 80, at(0)));
        recent.record(RecentDocument::new("Notes", "n", 1, 70, at(1)));
        recent.record(RecentDocument::new("Essay", "v2", 1, 90, at(2)));

        let titles: Vec<_> = recent.entries().iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["Essay", "Notes"]);
        assert_eq!(recent.entries()[0].content, "v2");
    }

    #[test]
    fn test_recent_documents_capped_at_ten() {
        let mut recent = RecentDocuments::default();
        for i in 0..12 {
            recent.record(RecentDocument::new(&format!("Doc {i}"), "x", 1, 50, at(i)));
        }

        assert_eq!(recent.entries().len(), 10);
        assert_eq!(recent.entries()[0].title, "Doc 11");
        assert_eq!(recent.entries()[9].title, "Doc 2");
    }

    #[test]
    fn test_recent_checks_preview_and_cap() {
        let mut checks = RecentChecks::default();
        let long = "a".repeat(61);
        checks.record(&long, 12.5, at(0));
        checks.record("short", 3.0, at(1));

        assert_eq!(checks.entries()[0].content, "short");
        assert_eq!(checks.entries()[1].content, format!("{}...", "a".repeat(60)));

        for i in 0..6 {
            checks.record("again", f64::from(i), at(2 + i));
        }
        assert_eq!(checks.entries().len(), 5);
    }

    #[test]
    fn test_lists_persist_through_store() {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::open(dir.path()).unwrap();

        let mut checks = RecentChecks::load(&store);
        assert!(checks.entries().is_empty());
        checks.record("To be or not to be", 42.0, at(5));
        checks.save(&store).unwrap();

        let reloaded = RecentChecks::load(&store);
        assert_eq!(reloaded, checks);
    }

    #[test]
    fn test_corrupt_list_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::open(dir.path()).unwrap();
        std::fs::write(dir.path().join(format!("{RECENT_DOCUMENTS_KEY}.json")), "[{").unwrap();

        assert!(RecentDocuments::load(&store).entries().is_empty());
    }
}
