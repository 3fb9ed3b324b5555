use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque block identifier, unique within a document.
///
/// Ids exist only to correlate blocks across mutations (focus requests,
/// drag source/target). They are never part of the serialized text and are
/// regenerated whenever blocks are decoded or copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(Uuid);

impl BlockId {
    /// A fresh, never-before-seen id
    pub fn generate() -> Self {
        BlockId(Uuid::new_v4())
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Block type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Paragraph,
    Todo,
    Heading1,
    Heading2,
    Heading3,
}

impl BlockKind {
    /// Heading level (1 = outermost). Body blocks have no level.
    pub fn heading_level(self) -> Option<u8> {
        match self {
            BlockKind::Heading1 => Some(1),
            BlockKind::Heading2 => Some(2),
            BlockKind::Heading3 => Some(3),
            BlockKind::Paragraph | BlockKind::Todo => None,
        }
    }

    pub fn is_heading(self) -> bool {
        self.heading_level().is_some()
    }

    /// One step down the backspace ladder: H1 → H2 → H3 → paragraph,
    /// todo → paragraph. Paragraph is the floor.
    pub fn demoted(self) -> Option<BlockKind> {
        match self {
            BlockKind::Heading1 => Some(BlockKind::Heading2),
            BlockKind::Heading2 => Some(BlockKind::Heading3),
            BlockKind::Heading3 | BlockKind::Todo => Some(BlockKind::Paragraph),
            BlockKind::Paragraph => None,
        }
    }

    /// The kind an exact trigger token converts an empty paragraph into
    pub fn from_trigger(token: &str) -> Option<BlockKind> {
        match token {
            "# " => Some(BlockKind::Heading1),
            "## " => Some(BlockKind::Heading2),
            "### " => Some(BlockKind::Heading3),
            "1. " | "- " | "* " => Some(BlockKind::Todo),
            _ => None,
        }
    }

    /// Parse a user-facing kind name (`h1`, `heading2`, `todo`, `p`, ...)
    pub fn parse_name(s: &str) -> Option<BlockKind> {
        match s.to_ascii_lowercase().as_str() {
            "p" | "paragraph" | "body" | "text" => Some(BlockKind::Paragraph),
            "todo" | "task" => Some(BlockKind::Todo),
            "h1" | "heading1" => Some(BlockKind::Heading1),
            "h2" | "heading2" => Some(BlockKind::Heading2),
            "h3" | "heading3" => Some(BlockKind::Heading3),
            _ => None,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockKind::Paragraph => "paragraph",
            BlockKind::Todo => "todo",
            BlockKind::Heading1 => "heading1",
            BlockKind::Heading2 => "heading2",
            BlockKind::Heading3 => "heading3",
        };
        f.write_str(name)
    }
}

/// The atomic unit of structured text: one line of a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub kind: BlockKind,
    /// Single-line text, without the type marker
    pub content: String,
    /// Only meaningful for `Todo`
    #[serde(default)]
    pub checked: bool,
    /// Only meaningful for headings: hide the owned subtree
    #[serde(default)]
    pub collapsed: bool,
    /// Only meaningful for headings: hide heading + subtree in privacy mode
    #[serde(default)]
    pub private: bool,
}

impl Block {
    pub fn new(kind: BlockKind, content: impl Into<String>) -> Self {
        Block {
            id: BlockId::generate(),
            kind,
            content: content.into(),
            checked: false,
            collapsed: false,
            private: false,
        }
    }

    pub fn paragraph(content: impl Into<String>) -> Self {
        Block::new(BlockKind::Paragraph, content)
    }

    pub fn todo(content: impl Into<String>, checked: bool) -> Self {
        let mut block = Block::new(BlockKind::Todo, content);
        block.checked = checked;
        block
    }

    pub fn heading(level: u8, content: impl Into<String>) -> Self {
        let kind = match level {
            1 => BlockKind::Heading1,
            2 => BlockKind::Heading2,
            _ => BlockKind::Heading3,
        };
        Block::new(kind, content)
    }

    /// An empty paragraph, the representation of an empty document
    pub fn empty() -> Self {
        Block::paragraph("")
    }

    /// Copy of this block under a fresh id
    pub fn duplicate(&self) -> Self {
        Block {
            id: BlockId::generate(),
            ..self.clone()
        }
    }

    pub fn heading_level(&self) -> Option<u8> {
        self.kind.heading_level()
    }

    pub fn is_heading(&self) -> bool {
        self.kind.is_heading()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Change the block type, dropping flags the new type cannot carry
    pub fn set_kind(&mut self, kind: BlockKind) {
        self.kind = kind;
        if kind != BlockKind::Todo {
            self.checked = false;
        }
        if !kind.is_heading() {
            self.collapsed = false;
            self.private = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demotion_ladder() {
        assert_eq!(BlockKind::Heading1.demoted(), Some(BlockKind::Heading2));
        assert_eq!(BlockKind::Heading2.demoted(), Some(BlockKind::Heading3));
        assert_eq!(BlockKind::Heading3.demoted(), Some(BlockKind::Paragraph));
        assert_eq!(BlockKind::Todo.demoted(), Some(BlockKind::Paragraph));
        assert_eq!(BlockKind::Paragraph.demoted(), None);
    }

    #[test]
    fn trigger_tokens_are_exact() {
        assert_eq!(BlockKind::from_trigger("## "), Some(BlockKind::Heading2));
        assert_eq!(BlockKind::from_trigger("* "), Some(BlockKind::Todo));
        assert_eq!(BlockKind::from_trigger("##"), None);
        assert_eq!(BlockKind::from_trigger("## foo"), None);
        assert_eq!(BlockKind::from_trigger("2. "), None);
    }

    #[test]
    fn set_kind_clears_foreign_flags() {
        let mut block = Block::todo("ship it", true);
        block.set_kind(BlockKind::Paragraph);
        assert!(!block.checked);

        let mut heading = Block::heading(2, "Private");
        heading.private = true;
        heading.collapsed = true;
        heading.set_kind(BlockKind::Heading1);
        assert!(heading.private && heading.collapsed);
        heading.set_kind(BlockKind::Todo);
        assert!(!heading.private && !heading.collapsed);
    }

    #[test]
    fn duplicate_gets_fresh_id() {
        let block = Block::todo("x", false);
        let copy = block.duplicate();
        assert_ne!(block.id, copy.id);
        assert_eq!(
            (copy.kind, copy.content.as_str(), copy.checked),
            (block.kind, block.content.as_str(), block.checked)
        );
    }

    #[test]
    fn parse_kind_names() {
        assert_eq!(BlockKind::parse_name("H2"), Some(BlockKind::Heading2));
        assert_eq!(BlockKind::parse_name("body"), Some(BlockKind::Paragraph));
        assert_eq!(BlockKind::parse_name("quote"), None);
    }
}
