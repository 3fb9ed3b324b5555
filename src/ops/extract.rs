use crate::model::block::{Block, BlockKind};
use crate::parse::parse_blocks;

/// Collect the unfinished todos of a document together with the `#` and
/// `##` headings they sit under.
///
/// Each context heading is emitted once, right before the first open todo
/// beneath it. `###` headings are not carried as context. Every returned
/// block is a copy under a fresh id, so the result can be appended to
/// another document without id collisions. An empty result means there is
/// nothing to carry forward.
pub fn extract_unfinished_tasks(source: &str) -> Vec<Block> {
    let blocks = parse_blocks(source);
    let mut result = Vec::new();

    let mut current_h1: Option<&Block> = None;
    let mut current_h2: Option<&Block> = None;
    let mut h1_emitted = false;
    let mut h2_emitted = false;

    for block in &blocks {
        match block.kind {
            BlockKind::Heading1 => {
                current_h1 = Some(block);
                current_h2 = None;
                h1_emitted = false;
                h2_emitted = false;
            }
            BlockKind::Heading2 => {
                current_h2 = Some(block);
                h2_emitted = false;
            }
            BlockKind::Todo if is_open_task(block) => {
                if let Some(h1) = current_h1
                    && !h1_emitted
                {
                    result.push(h1.duplicate());
                    h1_emitted = true;
                }
                if let Some(h2) = current_h2
                    && !h2_emitted
                {
                    result.push(h2.duplicate());
                    h2_emitted = true;
                }
                result.push(block.duplicate());
            }
            _ => {}
        }
    }

    log::debug!(
        "extracted {} blocks ({} open tasks) from {} source blocks",
        result.len(),
        count_tasks(&result),
        blocks.len()
    );
    result
}

/// Number of todo blocks in an extraction result (headings excluded)
pub fn count_tasks(blocks: &[Block]) -> usize {
    blocks.iter().filter(|b| b.kind == BlockKind::Todo).count()
}

fn is_open_task(block: &Block) -> bool {
    !block.checked && !block.content.trim().is_empty()
}
