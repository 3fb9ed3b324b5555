//! Debounced autosave for one open document.
//!
//! A session owns the editor of the document being worked on and decides
//! when its text reaches the store. Saves happen once edits have been idle
//! for the configured delay, and only when the encoded `(text, title)`
//! differs from what was last saved. Time is passed in by the caller.

use std::time::{Duration, Instant};

use crate::io::store::{DocumentStore, StoreError, StoredDocument};
use crate::model::document::{Document, fingerprint_text};
use crate::model::entry::DocumentRef;
use crate::ops::editor::{EditAction, Editor, Transition};

/// Where the open document stands relative to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    Pending,
    /// The last save failed; the text is still in memory and will be retried
    Failed(String),
}

#[derive(Debug)]
pub struct Session {
    doc: DocumentRef,
    title: String,
    editor: Editor,
    saved_fingerprint: u64,
    deadline: Option<Instant>,
    delay: Duration,
    status: SaveStatus,
}

/// A session that could not be closed because its final save failed.
/// Carries the session back so nothing is lost.
#[derive(Debug, thiserror::Error)]
#[error("{doc} was not saved: {error}")]
pub struct CloseError {
    pub doc: DocumentRef,
    pub session: Box<Session>,
    pub error: StoreError,
}

impl Session {
    /// Load `doc` from the store and decode it
    pub fn open(store: &dyn DocumentStore, doc: DocumentRef, delay: Duration) -> Result<Self, StoreError> {
        let stored = store.load(doc)?;
        let editor = Editor::from_markdown(&stored.text);
        Ok(Session::with_editor(doc, stored, editor, delay))
    }

    /// Wrap an editor prepared from `stored` (view flags applied, privacy
    /// mode set). The baseline is the encoded form of the decoded text, so
    /// stored text that only differs in spelling is left alone until an
    /// edit changes its content.
    pub fn with_editor(doc: DocumentRef, stored: StoredDocument, editor: Editor, delay: Duration) -> Self {
        Session::new(doc, stored.title, editor, delay)
    }

    /// Wrap an editor whose document is already persisted as-is
    pub fn new(doc: DocumentRef, title: String, editor: Editor, delay: Duration) -> Self {
        let saved_fingerprint = fingerprint_text(&editor.to_markdown(), &title);
        Session {
            doc,
            title,
            editor,
            saved_fingerprint,
            deadline: None,
            delay,
            status: SaveStatus::Saved,
        }
    }

    pub fn doc(&self) -> DocumentRef {
        self.doc
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn document(&self) -> &Document {
        self.editor.document()
    }

    pub fn status(&self) -> &SaveStatus {
        &self.status
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn set_privacy_mode(&mut self, on: bool) {
        self.editor.set_privacy_mode(on);
    }

    fn fingerprint(&self) -> u64 {
        fingerprint_text(&self.editor.to_markdown(), &self.title)
    }

    /// True when the in-memory text or title differs from the last save
    pub fn is_dirty(&self) -> bool {
        self.fingerprint() != self.saved_fingerprint
    }

    /// Apply an editor action and restart the idle timer if the text changed
    pub fn apply(&mut self, action: EditAction, now: Instant) -> Transition {
        let transition = self.editor.apply(action);
        if transition.changed {
            self.reschedule(now);
        }
        transition
    }

    pub fn set_title(&mut self, title: &str, now: Instant) {
        if self.title != title {
            self.title = title.to_string();
            self.reschedule(now);
        }
    }

    fn reschedule(&mut self, now: Instant) {
        if self.is_dirty() {
            self.deadline = Some(now + self.delay);
            if self.status == SaveStatus::Saved {
                self.status = SaveStatus::Pending;
            }
        } else {
            self.deadline = None;
            self.status = SaveStatus::Saved;
        }
    }

    /// Save if the idle deadline has passed. Returns true when a save was
    /// attempted.
    pub fn tick(&mut self, store: &mut dyn DocumentStore, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                if self.blocked_by_title() {
                    return false;
                }
                let _ = self.save(store, now);
                true
            }
            _ => false,
        }
    }

    /// Save now if anything is unsaved
    pub fn flush(&mut self, store: &mut dyn DocumentStore, now: Instant) -> Result<(), StoreError> {
        if !self.is_dirty() {
            self.deadline = None;
            return Ok(());
        }
        if self.blocked_by_title() {
            return Err(StoreError::MissingTitle(self.doc));
        }
        self.save(store, now)
    }

    /// Flush and hand back the document. On failure the session comes back
    /// inside the error.
    pub fn close(mut self, store: &mut dyn DocumentStore, now: Instant) -> Result<Document, CloseError> {
        match self.flush(store, now) {
            Ok(()) => Ok(self.editor.into_document()),
            Err(error) => Err(CloseError {
                doc: self.doc,
                session: Box::new(self),
                error,
            }),
        }
    }

    /// Summaries are never saved under a blank title; they stay pending
    fn blocked_by_title(&self) -> bool {
        if self.doc.requires_title() && self.title.trim().is_empty() {
            log::debug!("{} has no title yet, not saving", self.doc);
            return true;
        }
        false
    }

    fn save(&mut self, store: &mut dyn DocumentStore, now: Instant) -> Result<(), StoreError> {
        let text = self.editor.to_markdown();
        match store.save(self.doc, &text, &self.title) {
            Ok(()) => {
                self.saved_fingerprint = fingerprint_text(&text, &self.title);
                self.deadline = None;
                self.status = SaveStatus::Saved;
                Ok(())
            }
            Err(e) => {
                log::warn!("saving {} failed, will retry: {}", self.doc, e);
                self.status = SaveStatus::Failed(e.to_string());
                self.deadline = Some(now + self.delay);
                Err(e)
            }
        }
    }
}
