use crate::model::block::{Block, BlockKind};

/// Encode blocks as document text, one line per block joined with `\n`.
/// No trailing newline is added.
pub fn serialize_blocks(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(serialize_block)
        .collect::<Vec<_>>()
        .join("\n")
}

/// The canonical line for a single block
pub fn serialize_block(block: &Block) -> String {
    match block.kind {
        BlockKind::Heading1 => format!("# {}", block.content),
        BlockKind::Heading2 => format!("## {}", block.content),
        BlockKind::Heading3 => format!("### {}", block.content),
        BlockKind::Todo => {
            let mark = if block.checked { 'x' } else { ' ' };
            format!("- [{}] {}", mark, block.content)
        }
        BlockKind::Paragraph => block.content.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::block_parser::parse_blocks;

    #[test]
    fn encodes_each_kind() {
        let blocks = vec![
            Block::heading(1, "Week"),
            Block::heading(2, "Mon"),
            Block::heading(3, "Notes"),
            Block::todo("open", false),
            Block::todo("done", true),
            Block::paragraph("plain"),
            Block::empty(),
        ];
        assert_eq!(
            serialize_blocks(&blocks),
            "# Week\n## Mon\n### Notes\n- [ ] open\n- [x] done\nplain\n"
        );
    }

    #[test]
    fn view_flags_are_not_serialized() {
        let mut heading = Block::heading(2, "Secret");
        heading.private = true;
        heading.collapsed = true;
        assert_eq!(serialize_block(&heading), "## Secret");
    }

    #[test]
    fn list_variants_canonicalize() {
        let source = "1. first\n* second\n2. [X] third";
        let output = serialize_blocks(&parse_blocks(source));
        assert_eq!(output, "- [ ] first\n- [ ] second\n- [x] third");
    }

    #[test]
    fn empty_todo_keeps_trailing_space() {
        assert_eq!(serialize_block(&Block::todo("", false)), "- [ ] ");
    }
}
