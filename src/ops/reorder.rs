use crate::model::block::{Block, BlockId};
use crate::ops::outline::subtree_range;

/// Move the block `source` to the drop position marked by `target`.
///
/// A body block moves alone. A heading moves together with its subtree,
/// keeping the internal order. A heading dropped on a heading lands after
/// the target's whole subtree, in either direction. Otherwise the unit
/// lands after the target when moving down and before it when moving up.
///
/// Returns false (and leaves the sequence untouched) when either id is
/// unknown, the ids are equal, the target sits inside the moving unit, or
/// the drop point resolves to where the unit already is.
pub fn reorder(blocks: &mut Vec<Block>, source: BlockId, target: BlockId) -> bool {
    if source == target {
        return false;
    }
    let (Some(src), Some(tgt)) = (
        blocks.iter().position(|b| b.id == source),
        blocks.iter().position(|b| b.id == target),
    ) else {
        return false;
    };

    let unit = subtree_range(blocks, src);
    if unit.contains(&tgt) {
        return false;
    }

    // Insertion point in the original indexing
    let dest = if blocks[src].is_heading() && blocks[tgt].is_heading() {
        subtree_range(blocks, tgt).end
    } else if tgt > src {
        tgt + 1
    } else {
        tgt
    };
    if (unit.start..=unit.end).contains(&dest) {
        return false;
    }

    let len = unit.len();
    let start = unit.start;
    let moved: Vec<Block> = blocks.drain(unit).collect();
    let dest = if dest > start { dest - len } else { dest };
    blocks.splice(dest..dest, moved);

    log::debug!("moved {} block(s) from {} to {}", len, start, dest);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_blocks;
    use pretty_assertions::assert_eq;

    fn contents(blocks: &[Block]) -> Vec<&str> {
        blocks.iter().map(|b| b.content.as_str()).collect()
    }

    #[test]
    fn heading_moves_with_subtree() {
        let mut blocks = parse_blocks("# H\n## X\np1\np2\n# H2");
        let (x, h2) = (blocks[1].id, blocks[4].id);
        assert!(reorder(&mut blocks, x, h2));
        assert_eq!(contents(&blocks), vec!["H", "H2", "X", "p1", "p2"]);
    }

    #[test]
    fn heading_dropped_on_heading_lands_after_its_subtree() {
        let mut blocks = parse_blocks("## A\na\n## B\nb1\nb2\n## C");
        let (a, b) = (blocks[0].id, blocks[2].id);
        assert!(reorder(&mut blocks, a, b));
        assert_eq!(contents(&blocks), vec!["B", "b1", "b2", "A", "a", "C"]);
    }

    #[test]
    fn heading_moving_up_onto_heading_lands_after_its_subtree() {
        let mut blocks = parse_blocks("## A\na\n## B\nb\n## C\nc");
        let (c, a) = (blocks[4].id, blocks[0].id);
        assert!(reorder(&mut blocks, c, a));
        assert_eq!(contents(&blocks), vec!["A", "a", "C", "c", "B", "b"]);
    }

    #[test]
    fn heading_onto_previous_heading_stays_put() {
        let mut blocks = parse_blocks("## A\na\n## B\nb");
        let (b, a) = (blocks[2].id, blocks[0].id);
        assert!(!reorder(&mut blocks, b, a));
        assert_eq!(contents(&blocks), vec!["A", "a", "B", "b"]);
    }

    #[test]
    fn heading_moving_up_onto_body_lands_before_it() {
        let mut blocks = parse_blocks("## A\na1\na2\n## B\nb");
        let (b, a2) = (blocks[3].id, blocks[2].id);
        assert!(reorder(&mut blocks, b, a2));
        assert_eq!(contents(&blocks), vec!["A", "a1", "B", "b", "a2"]);
    }

    #[test]
    fn heading_onto_body_block_lands_after_it() {
        let mut blocks = parse_blocks("## A\na\n## B\nb1\nb2");
        let (a, b1) = (blocks[0].id, blocks[3].id);
        assert!(reorder(&mut blocks, a, b1));
        assert_eq!(contents(&blocks), vec!["B", "b1", "A", "a", "b2"]);
    }

    #[test]
    fn body_block_moves_alone() {
        let mut blocks = parse_blocks("a\nb\nc");
        let (a, c) = (blocks[0].id, blocks[2].id);
        assert!(reorder(&mut blocks, a, c));
        assert_eq!(contents(&blocks), vec!["b", "c", "a"]);
        let b = blocks[0].id;
        assert!(reorder(&mut blocks, a, b));
        assert_eq!(contents(&blocks), vec!["a", "b", "c"]);
    }

    #[test]
    fn body_block_under_heading_leaves_siblings() {
        let mut blocks = parse_blocks("## A\na1\na2\n## B");
        let (a1, b) = (blocks[1].id, blocks[3].id);
        assert!(reorder(&mut blocks, a1, b));
        assert_eq!(contents(&blocks), vec!["A", "a2", "B", "a1"]);
    }

    #[test]
    fn drop_inside_own_subtree_is_noop() {
        let mut blocks = parse_blocks("## A\na1\na2");
        let (a, a2) = (blocks[0].id, blocks[2].id);
        assert!(!reorder(&mut blocks, a, a2));
        assert_eq!(contents(&blocks), vec!["A", "a1", "a2"]);
    }

    #[test]
    fn unknown_or_same_ids_are_noops() {
        let mut blocks = parse_blocks("a\nb");
        let a = blocks[0].id;
        assert!(!reorder(&mut blocks, a, a));
        assert!(!reorder(&mut blocks, a, BlockId::generate()));
        assert_eq!(contents(&blocks), vec!["a", "b"]);
    }

    #[test]
    fn ids_survive_the_move() {
        let mut blocks = parse_blocks("# H\n## X\np1\n# H2");
        let ids: Vec<_> = blocks.iter().map(|b| b.id).collect();
        reorder(&mut blocks, ids[1], ids[3]);
        let moved: Vec<_> = blocks.iter().map(|b| b.id).collect();
        assert_eq!(moved, vec![ids[0], ids[3], ids[1], ids[2]]);
    }
}
