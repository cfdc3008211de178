use super::{
    blocks::parse_blocks,
    inline::{Embed, Encoding, InlineNode, parse_inline},
    span::Span,
};

/// One embed found in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedOccurrence {
    pub span: Span,
    pub embed: Embed,
    pub encoding: Encoding,
}

/// Lists every embed in document order.
///
/// Walks the same blocks and inline runs as the renderer, so embeds inside
/// emphasis and link labels are found while link targets are skipped.
pub fn scan_embeds(text: &str) -> Vec<EmbedOccurrence> {
    let mut out = vec![];
    for block in parse_blocks(text) {
        for body in block.inline_bodies(text) {
            collect(parse_inline(body.start, body.slice(text)), &mut out);
        }
    }
    out
}

fn collect(nodes: Vec<InlineNode>, out: &mut Vec<EmbedOccurrence>) {
    for node in nodes {
        match node {
            InlineNode::Embed {
                full,
                embed,
                encoding,
            } => out.push(EmbedOccurrence {
                span: full,
                embed,
                encoding,
            }),
            InlineNode::Emphasis { children, .. } => collect(children, out),
            InlineNode::Link { label, .. } => collect(label, out),
            InlineNode::Text(_) => {}
        }
    }
}

/// The `n`-th (0-based) inline image embed, comment or island form.
/// Gallery placeholders are not counted.
pub fn nth_image_embed(text: &str, n: usize) -> Option<EmbedOccurrence> {
    scan_embeds(text)
        .into_iter()
        .filter(|o| o.embed.is_image())
        .nth(n)
}
