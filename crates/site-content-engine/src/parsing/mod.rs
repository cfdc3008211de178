//! # Parsing
//!
//! Two passes over the document string:
//!
//! 1. **Blocks** split the text into region directives (heading, list,
//!    alignment, quote) and plain text runs.
//! 2. **Inlines** parse embeds, emphasis and links inside a block body.
//!
//! All nodes carry byte [`Span`]s into the source. The parser never fails:
//! anything it cannot recognize stays literal text.

pub mod blocks;
pub mod cursor;
pub mod embeds;
pub mod inline;
pub mod span;

#[cfg(test)]
mod tests;

pub use blocks::{BlockKind, BlockNode, line_break_at, paragraphs, parse_blocks};
pub use embeds::{EmbedOccurrence, nth_image_embed, scan_embeds};
pub use inline::{Embed, Encoding, InlineNode, parse_inline};
pub use span::Span;

#[derive(Debug)]
pub struct ParsedDoc {
    pub blocks: Vec<BlockNode>,
}

pub fn parse_document(text: &str) -> ParsedDoc {
    ParsedDoc {
        blocks: parse_blocks(text),
    }
}

/// Inline nodes for one body span of `text`.
pub fn parse_inline_span(text: &str, span: Span) -> Vec<InlineNode> {
    parse_inline(span.start, span.slice(text))
}
