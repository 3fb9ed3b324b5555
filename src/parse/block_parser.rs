use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::block::{Block, BlockKind};

static HEADING3_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^###\s+(.*)$").unwrap());
static HEADING2_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^##\s+(.*)$").unwrap());
static HEADING1_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#\s+(.*)$").unwrap());
/// `- [x] text`, `1. [ ] text`, or a bare `[ ] text`
static TASK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-\s|\d+\.\s|)\s*\[([xX ])\]\s+(.*)$").unwrap());
/// `1. text`, `- text`, `* text` without a checkbox
static LIST_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+\.|-|\*)\s+(.*)$").unwrap());

/// Decode document text into blocks.
///
/// Every line becomes exactly one block; blank lines become empty
/// paragraphs. Anything that does not match a heading or list marker is
/// kept verbatim as a paragraph, so decoding never fails. Empty input
/// yields a single empty paragraph.
pub fn parse_blocks(source: &str) -> Vec<Block> {
    if source.is_empty() {
        return vec![Block::empty()];
    }
    source
        .split('\n')
        .map(|line| parse_line(line.strip_suffix('\r').unwrap_or(line)))
        .collect()
}

/// Classify a single line. Precedence: `###`, `##`, `#`, checkbox task,
/// plain list item, paragraph.
pub fn parse_line(line: &str) -> Block {
    for (re, kind) in [
        (&*HEADING3_RE, BlockKind::Heading3),
        (&*HEADING2_RE, BlockKind::Heading2),
        (&*HEADING1_RE, BlockKind::Heading1),
    ] {
        if let Some(caps) = re.captures(line) {
            return Block::new(kind, &caps[1]);
        }
    }

    if let Some(caps) = TASK_RE.captures(line) {
        let checked = caps[2].eq_ignore_ascii_case("x");
        return Block::todo(&caps[3], checked);
    }

    if let Some(caps) = LIST_RE.captures(line) {
        return Block::todo(&caps[2], false);
    }

    Block::paragraph(line)
}
