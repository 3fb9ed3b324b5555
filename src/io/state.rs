use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::io::recovery::atomic_write;
use crate::model::block::Block;
use crate::model::entry::DocumentRef;

/// Persisted view state (written to `.state.json`)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UiState {
    /// Manual order of the log list, by log id
    #[serde(default)]
    pub sort_order: Vec<u64>,
    /// Hide private headings and their subtrees
    #[serde(default)]
    pub privacy_mode: bool,
    /// Heading view flags, keyed by `logs/3`-style document keys
    #[serde(default)]
    pub headings: BTreeMap<String, HeadingFlags>,
}

/// Contents of the flagged headings of one document
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HeadingFlags {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collapsed: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub private: Vec<String>,
}

impl HeadingFlags {
    fn is_empty(&self) -> bool {
        self.collapsed.is_empty() && self.private.is_empty()
    }
}

fn doc_key(doc: DocumentRef) -> String {
    format!("{}/{}", doc.dir_name(), doc.id())
}

impl UiState {
    /// Restore remembered flags onto freshly decoded blocks
    pub fn apply_heading_flags(&self, doc: DocumentRef, blocks: &mut [Block]) {
        let Some(flags) = self.headings.get(&doc_key(doc)) else {
            return;
        };
        for block in blocks.iter_mut().filter(|b| b.is_heading()) {
            block.collapsed = flags.collapsed.contains(&block.content);
            block.private = flags.private.contains(&block.content);
        }
    }

    /// Remember which headings of `blocks` carry flags
    pub fn remember_heading_flags(&mut self, doc: DocumentRef, blocks: &[Block]) {
        let headings = || blocks.iter().filter(|b| b.is_heading());
        let flags = HeadingFlags {
            collapsed: headings()
                .filter(|b| b.collapsed)
                .map(|b| b.content.clone())
                .collect(),
            private: headings()
                .filter(|b| b.private)
                .map(|b| b.content.clone())
                .collect(),
        };
        let key = doc_key(doc);
        if flags.is_empty() {
            self.headings.remove(&key);
        } else {
            self.headings.insert(key, flags);
        }
    }

    /// Drop everything remembered about a deleted log
    pub fn forget_log(&mut self, id: u64) {
        self.sort_order.retain(|&o| o != id);
        self.headings.remove(&doc_key(DocumentRef::Log(id)));
    }
}

/// Read `.state.json` from the journal directory. A missing or unreadable
/// file yields `None`.
pub fn read_ui_state(journal_dir: &Path) -> Option<UiState> {
    let content = fs::read_to_string(journal_dir.join(".state.json")).ok()?;
    match serde_json::from_str(&content) {
        Ok(state) => Some(state),
        Err(e) => {
            log::warn!("ignoring malformed .state.json: {}", e);
            None
        }
    }
}

pub fn write_ui_state(journal_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let content = serde_json::to_string_pretty(state)?;
    atomic_write(&journal_dir.join(".state.json"), content.as_bytes())
}
