use crate::parsing::{
    blocks::{BlockKind, BlockNode, paragraphs},
    inline::{InlineNode, parse_inline},
};

/// Validates parser output invariants.
///
/// Asserts that:
/// - Blocks tile the document in order without gaps
/// - Content spans and list items are contained within their block spans
/// - Every inline span lies on char boundaries inside its body
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(text: &str, blocks: &[BlockNode]) {
    let mut expected_start = 0;
    for b in blocks {
        assert_eq!(
            b.span.start, expected_start,
            "blocks must tile the document: {:?} (expected start {expected_start})",
            b.span
        );
        expected_start = b.span.end;
        assert!(
            b.content_span.start >= b.span.start && b.content_span.end <= b.span.end,
            "content span not contained in block span: content {:?}, block {:?}",
            b.content_span,
            b.span
        );
        for item in &b.items {
            assert!(
                item.start >= b.content_span.start && item.end <= b.content_span.end,
                "list item {item:?} outside body {:?}",
                b.content_span
            );
        }
        for body in bodies(text, b) {
            check_inlines(text, &parse_inline(body.start, body.slice(text)), body);
        }
    }
    assert_eq!(expected_start, text.len(), "blocks must cover the whole document");
}

fn bodies(text: &str, b: &BlockNode) -> Vec<crate::parsing::Span> {
    match b.kind {
        BlockKind::Text => paragraphs(text, b.content_span),
        BlockKind::Region(_) if !b.items.is_empty() => b.items.clone(),
        BlockKind::Region(_) => vec![b.content_span],
    }
}

fn check_inlines(text: &str, nodes: &[InlineNode], within: crate::parsing::Span) {
    let mut last = within.start;
    for node in nodes {
        let sp = node.span();
        assert!(
            sp.start >= last && sp.end <= within.end,
            "inline span {sp:?} out of order or outside {within:?}"
        );
        assert!(
            text.is_char_boundary(sp.start) && text.is_char_boundary(sp.end),
            "inline span {sp:?} splits a character"
        );
        last = sp.end;
        match node {
            InlineNode::Emphasis { children, .. } => check_inlines(text, children, sp),
            InlineNode::Link { label, .. } => check_inlines(text, label, sp),
            InlineNode::Text(_) | InlineNode::Embed { .. } => {}
        }
    }
}
