use std::collections::HashSet;

use crate::model::block::{Block, BlockId};
use crate::ops::outline::subtree_range;

/// Ids of blocks hidden from the normal view.
///
/// Collapse and privacy suppress independently and their results are
/// unioned. A collapsed heading stays visible and hides only its subtree;
/// a private heading (while `privacy_mode` is on) hides itself as well.
/// Within an open suppression region, nested flagged headings do not open
/// a second region: the outer one already covers them.
pub fn hidden_blocks(blocks: &[Block], privacy_mode: bool) -> HashSet<BlockId> {
    let mut hidden = HashSet::new();
    suppress(blocks, |b| b.collapsed, false, &mut hidden);
    if privacy_mode {
        suppress(blocks, |b| b.private, true, &mut hidden);
    }
    hidden
}

/// Copies of the blocks left after hiding, in document order
pub fn visible_blocks(blocks: &[Block], privacy_mode: bool) -> Vec<Block> {
    let hidden = hidden_blocks(blocks, privacy_mode);
    blocks
        .iter()
        .filter(|b| !hidden.contains(&b.id))
        .cloned()
        .collect()
}

/// One forward scan for a single suppression flag
fn suppress(
    blocks: &[Block],
    flagged: impl Fn(&Block) -> bool,
    hide_opener: bool,
    hidden: &mut HashSet<BlockId>,
) {
    let mut idx = 0;
    while idx < blocks.len() {
        let block = &blocks[idx];
        if block.is_heading() && flagged(block) {
            let region = subtree_range(blocks, idx);
            let start = if hide_opener { region.start } else { region.start + 1 };
            hidden.extend(blocks[start..region.end].iter().map(|b| b.id));
            idx = region.end;
        } else {
            idx += 1;
        }
    }
}
