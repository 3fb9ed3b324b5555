use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::block::{Block, BlockId, BlockKind};
use crate::parse::{parse_blocks, serialize_blocks};

/// An ordered block sequence: the body of one log, summary, or template.
///
/// Never empty. An empty document is a single empty paragraph.
#[derive(Debug, Clone)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Build from blocks, restoring the non-empty invariant if needed
    pub fn new(blocks: Vec<Block>) -> Self {
        let mut doc = Document { blocks };
        doc.normalize();
        doc
    }

    pub fn empty() -> Self {
        Document {
            blocks: vec![Block::empty()],
        }
    }

    pub fn from_markdown(source: &str) -> Self {
        Document::new(parse_blocks(source))
    }

    pub fn to_markdown(&self) -> String {
        serialize_blocks(&self.blocks)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Mutable access for the editing operations. Callers must leave at
    /// least one block behind; `normalize` is the backstop.
    pub(crate) fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn position(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    /// Restore the minimum-one-block invariant
    pub fn normalize(&mut self) {
        if self.blocks.is_empty() {
            self.blocks.push(Block::empty());
        }
    }

    /// `(todo count, checked todo count)`
    pub fn task_counts(&self) -> (usize, usize) {
        self.blocks
            .iter()
            .filter(|b| b.kind == BlockKind::Todo)
            .fold((0, 0), |(total, done), b| {
                (total + 1, done + usize::from(b.checked))
            })
    }

    /// Stable hash of the serialized text. Two documents with the same
    /// fingerprint persist to the same text.
    pub fn fingerprint(&self) -> u64 {
        fingerprint_text(&self.to_markdown(), "")
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::empty()
    }
}

/// Hash of a `(text, title)` pair as it would be persisted
pub fn fingerprint_text(text: &str, title: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    title.hash(&mut hasher);
    hasher.finish()
}
