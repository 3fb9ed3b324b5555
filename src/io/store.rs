use std::collections::HashMap;
use std::path::PathBuf;

use crate::io::lock::LockError;
use crate::model::entry::DocumentRef;

/// Text and title of one persisted document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredDocument {
    pub text: String,
    pub title: String,
}

/// Error type for journal storage
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not a journal: no journal/journal.toml found in {0} or any parent")]
    NotAJournal(PathBuf),
    #[error("a journal already exists at {0}")]
    AlreadyExists(PathBuf),
    #[error("{0} not found")]
    NotFound(DocumentRef),
    #[error("{0} needs a title before it can be saved")]
    MissingTitle(DocumentRef),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid journal.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("invalid journal.toml: {0}")]
    ConfigEditError(#[from] toml_edit::TomlError),
    #[error("invalid index.json: {0}")]
    IndexParseError(#[from] serde_json::Error),
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Where document text is loaded from and saved to
pub trait DocumentStore {
    fn load(&self, doc: DocumentRef) -> Result<StoredDocument, StoreError>;
    fn save(&mut self, doc: DocumentRef, text: &str, title: &str) -> Result<(), StoreError>;
}

/// In-memory store for tests and embedding. Can be switched into a failing
/// mode to exercise save-failure handling.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: HashMap<DocumentRef, StoredDocument>,
    failing: Option<String>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn insert(&mut self, doc: DocumentRef, text: &str, title: &str) {
        self.documents.insert(
            doc,
            StoredDocument {
                text: text.to_string(),
                title: title.to_string(),
            },
        );
    }

    pub fn get(&self, doc: DocumentRef) -> Option<&StoredDocument> {
        self.documents.get(&doc)
    }

    /// Make every following save fail with `reason`, or succeed again with `None`
    pub fn set_failing(&mut self, reason: Option<&str>) {
        self.failing = reason.map(str::to_string);
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, doc: DocumentRef) -> Result<StoredDocument, StoreError> {
        self.documents
            .get(&doc)
            .cloned()
            .ok_or(StoreError::NotFound(doc))
    }

    fn save(&mut self, doc: DocumentRef, text: &str, title: &str) -> Result<(), StoreError> {
        if let Some(reason) = &self.failing {
            return Err(StoreError::Unavailable(reason.clone()));
        }
        self.insert(doc, text, title);
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        let doc = DocumentRef::Log(1);
        assert!(matches!(store.load(doc), Err(StoreError::NotFound(_))));

        store.save(doc, "- [ ] a", "20240513").unwrap();
        assert_eq!(
            store.load(doc).unwrap(),
            StoredDocument {
                text: "- [ ] a".into(),
                title: "20240513".into()
            }
        );
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn failing_store_keeps_previous_text() {
        let mut store = MemoryStore::new();
        let doc = DocumentRef::Summary(2);
        store.insert(doc, "old", "week");
        store.set_failing(Some("offline"));
        let err = store.save(doc, "new", "week").unwrap_err();
        assert_eq!(err.to_string(), "store unavailable: offline");
        assert_eq!(store.get(doc).unwrap().text, "old");
        assert_eq!(store.save_count(), 0);
    }
}
