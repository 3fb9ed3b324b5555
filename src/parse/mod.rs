pub mod block_parser;
pub mod block_serializer;

pub use block_parser::{parse_blocks, parse_line};
pub use block_serializer::{serialize_block, serialize_blocks};

/// Re-encode text in canonical form: list markers become `- [ ] `,
/// uppercase checkmarks become `x`, heading spacing collapses to one space.
pub fn normalize(source: &str) -> String {
    serialize_blocks(&parse_blocks(source))
}
