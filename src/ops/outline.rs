//! Heading-subtree arithmetic shared by visibility, reordering and
//! task extraction.

use std::ops::Range;

use crate::model::block::Block;

/// The block range owned by the block at `index`.
///
/// For a heading this is the heading plus every following block up to, but
/// not including, the next heading of equal or shallower level. For a body
/// block it is the block alone. An out-of-range index yields an empty range.
pub fn subtree_range(blocks: &[Block], index: usize) -> Range<usize> {
    let Some(block) = blocks.get(index) else {
        return index..index;
    };
    let Some(level) = block.heading_level() else {
        return index..index + 1;
    };
    let end = blocks[index + 1..]
        .iter()
        .position(|b| b.heading_level().is_some_and(|l| l <= level))
        .map(|offset| index + 1 + offset)
        .unwrap_or(blocks.len());
    index..end
}
