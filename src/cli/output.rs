use std::collections::HashSet;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::model::block::{Block, BlockId, BlockKind};
use crate::model::entry::{LogEntry, Status, Summary, SummaryTemplate};
use crate::ops::editor::{Notice, Transition};
use crate::util::unicode::{fit_to_width, truncate_to_width};

/// Title column width in listings
const TITLE_WIDTH: usize = 48;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct LogJson {
    pub id: u64,
    pub title: String,
    pub create_time: String,
    pub update_time: String,
    pub tasks: usize,
    pub done: usize,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub deleted: bool,
}

#[derive(Serialize)]
pub struct WeekJson {
    pub key: String,
    pub label: String,
    pub this_week: bool,
    pub logs: Vec<LogJson>,
}

#[derive(Serialize)]
pub struct BlockJson {
    pub index: usize,
    pub kind: BlockKind,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub collapsed: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub private: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

#[derive(Serialize)]
pub struct DocumentJson {
    pub id: u64,
    pub kind: &'static str,
    pub title: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<BlockJson>>,
}

#[derive(Serialize)]
pub struct TransitionJson {
    pub changed: bool,
    /// Index of the block that should receive the caret
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Serialize)]
pub struct SummaryJson {
    pub id: u64,
    pub title: String,
    pub create_time: String,
    pub log_ids: Vec<u64>,
}

#[derive(Serialize)]
pub struct TemplateJson {
    pub id: u64,
    pub name: String,
    pub is_default: bool,
}

#[derive(Serialize)]
pub struct ReportJson {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

fn timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

pub fn log_to_json(entry: &LogEntry, counts: (usize, usize)) -> LogJson {
    LogJson {
        id: entry.id,
        title: entry.title.clone(),
        create_time: timestamp(entry.create_time),
        update_time: timestamp(entry.update_time),
        tasks: counts.0,
        done: counts.1,
        deleted: entry.status == Status::Deleted,
    }
}

pub fn block_to_json(index: usize, block: &Block, hidden: bool) -> BlockJson {
    BlockJson {
        index,
        kind: block.kind,
        content: block.content.clone(),
        checked: (block.kind == BlockKind::Todo).then_some(block.checked),
        collapsed: block.collapsed,
        private: block.private,
        hidden,
    }
}

pub fn summary_to_json(summary: &Summary) -> SummaryJson {
    SummaryJson {
        id: summary.id,
        title: summary.title.clone(),
        create_time: timestamp(summary.create_time),
        log_ids: summary.log_ids.clone(),
    }
}

pub fn template_to_json(template: &SummaryTemplate) -> TemplateJson {
    TemplateJson {
        id: template.id,
        name: template.name.clone(),
        is_default: template.is_default,
    }
}

pub fn notice_text(notice: Notice) -> String {
    match notice {
        Notice::NothingToImport => "no unfinished tasks to carry over".to_string(),
        Notice::Imported { tasks } => format!("carried over {} unfinished task(s)", tasks),
    }
}

/// `focus` is a block id; the CLI speaks in indexes
pub fn transition_to_json(transition: &Transition, blocks: &[Block]) -> TransitionJson {
    TransitionJson {
        changed: transition.changed,
        focus: transition.focus.and_then(|id| index_of(blocks, id)),
        notice: transition.notice.map(notice_text),
    }
}

fn index_of(blocks: &[Block], id: BlockId) -> Option<usize> {
    blocks.iter().position(|b| b.id == id)
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

pub fn local_date(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

/// One row of `wl list`
pub fn format_log_line(entry: &LogEntry, counts: (usize, usize)) -> String {
    let tasks = if counts.0 == 0 {
        "     ".to_string()
    } else {
        format!("{:>2}/{:<2}", counts.1, counts.0)
    };
    let deleted = if entry.status == Status::Deleted {
        "  (deleted)"
    } else {
        ""
    };
    format!(
        "  {:>4}  {}  {}  {}{}",
        entry.id,
        local_date(entry.create_time),
        tasks,
        fit_to_width(&entry.title, TITLE_WIDTH).trim_end(),
        deleted
    )
}

fn kind_label(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Paragraph => "p",
        BlockKind::Todo => "todo",
        BlockKind::Heading1 => "h1",
        BlockKind::Heading2 => "h2",
        BlockKind::Heading3 => "h3",
    }
}

/// The block table of `wl show --blocks`. Hidden blocks are skipped unless
/// `show_all`, in which case they are marked.
pub fn format_block_table(blocks: &[Block], hidden: &HashSet<BlockId>, show_all: bool) -> Vec<String> {
    blocks
        .iter()
        .enumerate()
        .filter(|(_, b)| show_all || !hidden.contains(&b.id))
        .map(|(i, b)| {
            let mut line = format!("{:>3}  {:<4}  ", i, kind_label(b.kind));
            if b.kind == BlockKind::Todo {
                line.push_str(if b.checked { "[x] " } else { "[ ] " });
            }
            line.push_str(&b.content);
            if b.collapsed {
                line.push_str("  [collapsed]");
            }
            if b.private {
                line.push_str("  [private]");
            }
            if hidden.contains(&b.id) {
                line.push_str("  (hidden)");
            }
            line.trim_end().to_string()
        })
        .collect()
}

/// One row of `wl summary list` / `wl template list`
pub fn format_record_line(id: u64, date: DateTime<Utc>, title: &str, marker: &str) -> String {
    format!(
        "  {:>4}  {}  {}{}",
        id,
        local_date(date),
        truncate_to_width(title, TITLE_WIDTH),
        marker
    )
}
