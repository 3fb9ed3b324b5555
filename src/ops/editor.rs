//! The interactive editing core: discrete user actions applied to a block
//! document.
//!
//! Every action is synchronous and total. Structural floors (removing the
//! last block, demoting a paragraph, toggling a flag on the wrong block
//! type, an index past the end) are silent no-ops. UI effects such as
//! moving the caret are returned as data in [`Transition`]; the editor
//! itself keeps no focus state.

use std::collections::HashSet;

use crate::model::block::{Block, BlockId, BlockKind};
use crate::model::document::Document;
use crate::ops::extract::{count_tasks, extract_unfinished_tasks};
use crate::ops::reorder::reorder;
use crate::ops::visibility::hidden_blocks;

/// A single user action against the document
#[derive(Debug, Clone, PartialEq)]
pub enum EditAction {
    /// The text of the block at `index` became `content`
    SetContent { index: usize, content: String },
    /// Enter pressed in the block at `index`
    Enter { index: usize },
    /// Backspace pressed with the caret at `cursor` (in chars)
    Backspace { index: usize, cursor: usize },
    ArrowUp { index: usize },
    ArrowDown { index: usize },
    ToggleChecked { index: usize },
    ToggleCollapsed { index: usize },
    TogglePrivate { index: usize },
    /// Explicit type change from the heading-level menu
    SetKind { index: usize, kind: BlockKind },
    /// Drag `source` onto `target`
    Reorder { source: BlockId, target: BlockId },
    /// Carry unfinished tasks over from another document's text
    ImportTasks { source_text: String },
    /// Replace the whole document with freshly decoded text
    Replace { text: String },
}

/// Something the presentation layer should tell the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Import found no unfinished tasks; the document was left alone
    NothingToImport,
    /// Import appended this many tasks
    Imported { tasks: usize },
}

/// Outcome of applying one action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    /// Whether the document content or structure changed
    pub changed: bool,
    /// Block that should receive the caret
    pub focus: Option<BlockId>,
    pub notice: Option<Notice>,
}

impl Transition {
    fn unchanged() -> Self {
        Transition::default()
    }

    fn changed() -> Self {
        Transition {
            changed: true,
            ..Default::default()
        }
    }

    fn focus(mut self, id: Option<BlockId>) -> Self {
        self.focus = id;
        self
    }

    fn notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }
}

/// Block document under interactive editing
#[derive(Debug, Clone, Default)]
pub struct Editor {
    document: Document,
    privacy_mode: bool,
}

impl Editor {
    pub fn new(document: Document) -> Self {
        Editor {
            document,
            privacy_mode: false,
        }
    }

    pub fn from_markdown(source: &str) -> Self {
        Editor::new(Document::from_markdown(source))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn blocks(&self) -> &[Block] {
        self.document.blocks()
    }

    pub fn to_markdown(&self) -> String {
        self.document.to_markdown()
    }

    pub fn privacy_mode(&self) -> bool {
        self.privacy_mode
    }

    pub fn set_privacy_mode(&mut self, on: bool) {
        self.privacy_mode = on;
    }

    /// Ids hidden by collapsed headings, and by private headings while
    /// privacy mode is on
    pub fn hidden(&self) -> HashSet<BlockId> {
        hidden_blocks(self.document.blocks(), self.privacy_mode)
    }

    /// `(todo count, checked todo count)`
    pub fn task_counts(&self) -> (usize, usize) {
        self.document.task_counts()
    }

    /// Apply one action and report what happened
    pub fn apply(&mut self, action: EditAction) -> Transition {
        let transition = match action {
            EditAction::SetContent { index, content } => self.set_content(index, content),
            EditAction::Enter { index } => self.enter(index),
            EditAction::Backspace { index, cursor } => self.backspace(index, cursor),
            EditAction::ArrowUp { index } => self.arrow(index, -1),
            EditAction::ArrowDown { index } => self.arrow(index, 1),
            EditAction::ToggleChecked { index } => self.toggle_checked(index),
            EditAction::ToggleCollapsed { index } => {
                self.toggle_heading_flag(index, |b| &mut b.collapsed)
            }
            EditAction::TogglePrivate { index } => {
                self.toggle_heading_flag(index, |b| &mut b.private)
            }
            EditAction::SetKind { index, kind } => self.set_kind(index, kind),
            EditAction::Reorder { source, target } => {
                if reorder(self.document.blocks_mut(), source, target) {
                    Transition::changed().focus(Some(source))
                } else {
                    Transition::unchanged()
                }
            }
            EditAction::ImportTasks { source_text } => self.import_tasks(&source_text),
            EditAction::Replace { text } => {
                self.document = Document::from_markdown(&text);
                Transition::changed()
            }
        };
        self.document.normalize();
        transition
    }

    fn block_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.document.blocks_mut().get_mut(index)
    }

    fn set_content(&mut self, index: usize, content: String) -> Transition {
        // A newline always means a new block; never store one
        let content = match content.split_once('\n') {
            Some((first, _)) => first.to_string(),
            None => content,
        };
        let Some(block) = self.block_mut(index) else {
            return Transition::unchanged();
        };

        if block.kind == BlockKind::Paragraph
            && let Some(kind) = BlockKind::from_trigger(&content)
        {
            block.set_kind(kind);
            block.content.clear();
            log::debug!("block {} converted to {} by trigger", index, kind);
            return Transition::changed();
        }

        if block.content == content {
            return Transition::unchanged();
        }
        block.content = content;
        Transition::changed()
    }

    fn enter(&mut self, index: usize) -> Transition {
        let Some(block) = self.block_mut(index) else {
            return Transition::unchanged();
        };

        if block.is_empty() && (block.kind == BlockKind::Todo || block.is_heading()) {
            block.set_kind(BlockKind::Paragraph);
            return Transition::changed();
        }

        let kind = if block.kind == BlockKind::Todo {
            BlockKind::Todo
        } else {
            BlockKind::Paragraph
        };
        let new_block = Block::new(kind, "");
        let id = new_block.id;
        self.document.blocks_mut().insert(index + 1, new_block);
        Transition::changed().focus(Some(id))
    }

    fn backspace(&mut self, index: usize, cursor: usize) -> Transition {
        let len = self.document.len();
        let Some(block) = self.block_mut(index) else {
            return Transition::unchanged();
        };
        if !block.is_empty() || cursor != 0 {
            return Transition::unchanged();
        }

        if let Some(kind) = block.kind.demoted() {
            block.set_kind(kind);
            return Transition::changed();
        }

        // Empty paragraph: remove it, unless it is all that is left
        if len <= 1 {
            return Transition::unchanged();
        }
        self.document.blocks_mut().remove(index);
        let previous = index
            .checked_sub(1)
            .and_then(|i| self.document.get(i))
            .map(|b| b.id);
        Transition::changed().focus(previous)
    }

    fn arrow(&self, index: usize, step: isize) -> Transition {
        let target = index
            .checked_add_signed(step)
            .filter(|_| index < self.document.len())
            .and_then(|i| self.document.get(i));
        Transition::unchanged().focus(target.map(|b| b.id))
    }

    fn toggle_checked(&mut self, index: usize) -> Transition {
        match self.block_mut(index) {
            Some(block) if block.kind == BlockKind::Todo => {
                block.checked = !block.checked;
                Transition::changed()
            }
            _ => Transition::unchanged(),
        }
    }

    fn toggle_heading_flag(
        &mut self,
        index: usize,
        flag: impl Fn(&mut Block) -> &mut bool,
    ) -> Transition {
        match self.block_mut(index) {
            Some(block) if block.is_heading() => {
                let value = flag(block);
                *value = !*value;
                Transition::changed()
            }
            _ => Transition::unchanged(),
        }
    }

    fn set_kind(&mut self, index: usize, kind: BlockKind) -> Transition {
        match self.block_mut(index) {
            Some(block) if block.kind != kind => {
                block.set_kind(kind);
                Transition::changed()
            }
            _ => Transition::unchanged(),
        }
    }

    fn import_tasks(&mut self, source_text: &str) -> Transition {
        let extracted = extract_unfinished_tasks(source_text);
        let tasks = count_tasks(&extracted);
        if tasks == 0 {
            return Transition::unchanged().notice(Notice::NothingToImport);
        }

        let blocks = self.document.blocks_mut();
        if blocks
            .last()
            .is_some_and(|b| b.kind == BlockKind::Paragraph && b.is_empty())
        {
            blocks.pop();
        }
        blocks.extend(extracted);
        log::info!("imported {} unfinished task(s)", tasks);
        Transition::changed().notice(Notice::Imported { tasks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn shape(editor: &Editor) -> Vec<(BlockKind, String)> {
        editor
            .blocks()
            .iter()
            .map(|b| (b.kind, b.content.clone()))
            .collect()
    }

    #[test]
    fn trigger_converts_paragraph() {
        let mut editor = Editor::from_markdown("");
        let t = editor.apply(EditAction::SetContent {
            index: 0,
            content: "## ".into(),
        });
        assert!(t.changed);
        assert_eq!(shape(&editor), vec![(BlockKind::Heading2, String::new())]);
    }

    #[test]
    fn trigger_with_text_is_plain_content() {
        let mut editor = Editor::from_markdown("");
        editor.apply(EditAction::SetContent {
            index: 0,
            content: "## foo".into(),
        });
        assert_eq!(shape(&editor), vec![(BlockKind::Paragraph, "## foo".into())]);
    }

    #[test]
    fn trigger_ignored_outside_paragraphs() {
        let mut editor = Editor::from_markdown("- [ ] ");
        editor.apply(EditAction::SetContent {
            index: 0,
            content: "# ".into(),
        });
        assert_eq!(shape(&editor), vec![(BlockKind::Todo, "# ".into())]);
    }

    #[test]
    fn list_triggers_make_todos() {
        for token in ["1. ", "- ", "* "] {
            let mut editor = Editor::from_markdown("");
            editor.apply(EditAction::SetContent {
                index: 0,
                content: token.into(),
            });
            assert_eq!(editor.blocks()[0].kind, BlockKind::Todo, "token {:?}", token);
            assert!(editor.blocks()[0].content.is_empty());
        }
    }

    #[test]
    fn content_is_cut_at_newline() {
        let mut editor = Editor::from_markdown("a");
        editor.apply(EditAction::SetContent {
            index: 0,
            content: "first\nsecond".into(),
        });
        assert_eq!(editor.blocks()[0].content, "first");
    }

    #[test]
    fn same_content_is_not_a_change() {
        let mut editor = Editor::from_markdown("a");
        let t = editor.apply(EditAction::SetContent {
            index: 0,
            content: "a".into(),
        });
        assert!(!t.changed);
    }

    #[test]
    fn enter_after_todo_continues_list() {
        let mut editor = Editor::from_markdown("- [ ] one");
        let t = editor.apply(EditAction::Enter { index: 0 });
        assert_eq!(editor.blocks().len(), 2);
        assert_eq!(editor.blocks()[1].kind, BlockKind::Todo);
        assert!(!editor.blocks()[1].checked);
        assert_eq!(t.focus, Some(editor.blocks()[1].id));
    }

    #[test]
    fn enter_after_heading_opens_paragraph() {
        let mut editor = Editor::from_markdown("# Week\nlast");
        editor.apply(EditAction::Enter { index: 0 });
        assert_eq!(
            shape(&editor),
            vec![
                (BlockKind::Heading1, "Week".into()),
                (BlockKind::Paragraph, String::new()),
                (BlockKind::Paragraph, "last".into()),
            ]
        );
    }

    #[test]
    fn enter_on_empty_todo_or_heading_demotes() {
        let mut editor = Editor::from_markdown("- [ ] \n## ");
        let t = editor.apply(EditAction::Enter { index: 0 });
        assert!(t.changed && t.focus.is_none());
        editor.apply(EditAction::Enter { index: 1 });
        assert_eq!(
            shape(&editor),
            vec![
                (BlockKind::Paragraph, String::new()),
                (BlockKind::Paragraph, String::new()),
            ]
        );
    }

    #[test]
    fn backspace_needs_empty_block_and_caret_at_start() {
        let mut editor = Editor::from_markdown("text\n");
        assert!(!editor.apply(EditAction::Backspace { index: 0, cursor: 0 }).changed);
        assert!(!editor.apply(EditAction::Backspace { index: 1, cursor: 1 }).changed);
        assert_eq!(editor.blocks().len(), 2);
    }

    #[test]
    fn backspace_removes_paragraph_and_focuses_previous() {
        let mut editor = Editor::from_markdown("a\n");
        let first = editor.blocks()[0].id;
        let t = editor.apply(EditAction::Backspace { index: 1, cursor: 0 });
        assert!(t.changed);
        assert_eq!(t.focus, Some(first));
        assert_eq!(editor.blocks().len(), 1);
    }

    #[test]
    fn backspace_never_removes_last_block() {
        let mut editor = Editor::from_markdown("");
        for _ in 0..3 {
            let t = editor.apply(EditAction::Backspace { index: 0, cursor: 0 });
            assert!(!t.changed);
        }
        assert_eq!(editor.blocks().len(), 1);
    }

    #[test]
    fn toggles_respect_block_type() {
        let mut editor = Editor::from_markdown("- [ ] a\n## H\np");
        assert!(editor.apply(EditAction::ToggleChecked { index: 0 }).changed);
        assert!(editor.blocks()[0].checked);
        assert!(!editor.apply(EditAction::ToggleChecked { index: 1 }).changed);
        assert!(!editor.apply(EditAction::ToggleCollapsed { index: 0 }).changed);
        assert!(editor.apply(EditAction::ToggleCollapsed { index: 1 }).changed);
        assert!(editor.apply(EditAction::TogglePrivate { index: 1 }).changed);
        assert!(!editor.apply(EditAction::TogglePrivate { index: 2 }).changed);
        assert!(editor.blocks()[1].collapsed && editor.blocks()[1].private);
    }

    #[test]
    fn arrows_move_focus_without_mutation() {
        let mut editor = Editor::from_markdown("a\nb");
        let ids: Vec<_> = editor.blocks().iter().map(|b| b.id).collect();
        let down = editor.apply(EditAction::ArrowDown { index: 0 });
        assert_eq!(down, Transition { changed: false, focus: Some(ids[1]), notice: None });
        assert_eq!(editor.apply(EditAction::ArrowUp { index: 1 }).focus, Some(ids[0]));
        assert_eq!(editor.apply(EditAction::ArrowUp { index: 0 }).focus, None);
        assert_eq!(editor.apply(EditAction::ArrowDown { index: 1 }).focus, None);
        assert_eq!(editor.apply(EditAction::ArrowDown { index: 7 }).focus, None);
    }

    #[test]
    fn set_kind_keeps_content() {
        let mut editor = Editor::from_markdown("## Plan");
        editor.apply(EditAction::SetKind {
            index: 0,
            kind: BlockKind::Heading1,
        });
        assert_eq!(shape(&editor), vec![(BlockKind::Heading1, "Plan".into())]);
        assert!(!editor
            .apply(EditAction::SetKind {
                index: 0,
                kind: BlockKind::Heading1,
            })
            .changed);
    }

    #[test]
    fn import_trims_one_trailing_blank_and_appends() {
        let mut editor = Editor::from_markdown("# Today\n\n");
        let t = editor.apply(EditAction::ImportTasks {
            source_text: "## Work\n- [ ] ship\n- [x] done".into(),
        });
        assert_eq!(t.notice, Some(Notice::Imported { tasks: 1 }));
        assert_eq!(
            shape(&editor),
            vec![
                (BlockKind::Heading1, "Today".into()),
                (BlockKind::Paragraph, String::new()),
                (BlockKind::Heading2, "Work".into()),
                (BlockKind::Todo, "ship".into()),
            ]
        );
    }

    #[test]
    fn import_with_nothing_open_leaves_document() {
        let mut editor = Editor::from_markdown("keep\n");
        let t = editor.apply(EditAction::ImportTasks {
            source_text: "# A\n- [x] done".into(),
        });
        assert!(!t.changed);
        assert_eq!(t.notice, Some(Notice::NothingToImport));
        assert_eq!(editor.to_markdown(), "keep\n");
    }

    #[test]
    fn import_into_blank_document_replaces_placeholder() {
        let mut editor = Editor::from_markdown("");
        editor.apply(EditAction::ImportTasks {
            source_text: "- [ ] a".into(),
        });
        assert_eq!(editor.to_markdown(), "- [ ] a");
    }

    #[test]
    fn reorder_returns_focus_on_moved_block() {
        let mut editor = Editor::from_markdown("a\nb");
        let (a, b) = (editor.blocks()[0].id, editor.blocks()[1].id);
        let t = editor.apply(EditAction::Reorder { source: a, target: b });
        assert!(t.changed);
        assert_eq!(t.focus, Some(a));
        assert_eq!(editor.to_markdown(), "b\na");
    }

    #[test]
    fn hidden_follows_privacy_mode() {
        let mut editor = Editor::from_markdown("## Private\nx\n## Public");
        editor.apply(EditAction::TogglePrivate { index: 0 });
        assert!(editor.hidden().is_empty());
        editor.set_privacy_mode(true);
        assert_eq!(editor.hidden().len(), 2);
    }

    #[test]
    fn out_of_range_indexes_are_noops() {
        let mut editor = Editor::from_markdown("a");
        for action in [
            EditAction::Enter { index: 5 },
            EditAction::Backspace { index: 5, cursor: 0 },
            EditAction::ToggleChecked { index: 5 },
            EditAction::SetContent { index: 5, content: "x".into() },
        ] {
            assert!(!editor.apply(action).changed);
        }
        assert_eq!(editor.to_markdown(), "a");
    }
}
