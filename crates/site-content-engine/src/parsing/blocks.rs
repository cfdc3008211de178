use crate::grammar::{RegionKind, kinds::Sentinel};

use super::span::Span;

/// The kind of a top-level block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Plain text between regions; split into paragraphs at render time.
    Text,
    /// A region directive (heading, list, alignment, quote).
    Region(RegionKind),
}

/// A parsed block with its spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockNode {
    pub kind: BlockKind,
    /// Full byte span including the sentinel line and the terminator.
    pub span: Span,
    /// Body span for inline parsing (excludes sentinel and terminator).
    pub content_span: Span,
    /// Item content spans for lists (markers stripped). Empty for other kinds.
    pub items: Vec<Span>,
}

impl BlockNode {
    /// Heading and list bodies end at the first line break, so anything
    /// inserted into them must stay on one line.
    pub fn is_line_bound(&self) -> bool {
        matches!(
            self.kind,
            BlockKind::Region(RegionKind::Heading(_) | RegionKind::List(_))
        )
    }

    /// Whether `at` falls inside this block, counting the end of its last
    /// line but not the start of the line after it.
    pub fn contains(&self, text: &str, at: usize) -> bool {
        self.span.start < at
            && (at < self.span.end || (at == self.span.end && !text[..at].ends_with('\n')))
    }

    /// Spans parsed as separate inline runs: paragraphs for text, items for
    /// lists, the whole body for the other regions.
    pub fn inline_bodies(&self, text: &str) -> Vec<Span> {
        match self.kind {
            BlockKind::Text => paragraphs(text, self.content_span),
            BlockKind::Region(RegionKind::List(_)) => self.items.clone(),
            BlockKind::Region(_) => vec![self.content_span],
        }
    }
}

/// Length of the `\n` or `\r\n` starting at `pos`, or 0.
pub fn line_break_at(text: &str, pos: usize) -> usize {
    let rest = &text[pos..];
    if rest.starts_with("\r\n") {
        2
    } else if rest.starts_with('\n') {
        1
    } else {
        0
    }
}

struct Extent {
    body: Span,
    items: Vec<Span>,
    end: usize,
}

/// Splits the document into region and text blocks.
///
/// Sentinels are recognized anywhere, not only at line starts, since
/// insertions happen at arbitrary cursor positions. A sentinel whose region
/// cannot be formed (a list with no items) stays in the surrounding text.
pub fn parse_blocks(text: &str) -> Vec<BlockNode> {
    let mut out = vec![];
    let mut text_start = 0;
    let mut from = 0;

    while let Some((at, kind, len)) = find_region_sentinel(text, from) {
        match region_extent(text, kind, at + len) {
            Some(extent) => {
                push_text(&mut out, text_start, at);
                out.push(BlockNode {
                    kind: BlockKind::Region(kind),
                    span: Span::new(at, extent.end),
                    content_span: extent.body,
                    items: extent.items,
                });
                text_start = extent.end;
                from = extent.end;
            }
            None => from = at + Sentinel::OPEN.len(),
        }
    }

    push_text(&mut out, text_start, text.len());
    out
}

/// Groups the non-blank lines of `span` into paragraph spans.
///
/// A paragraph span runs from its first line's start to its last line's end,
/// excluding the final line break.
pub fn paragraphs(text: &str, span: Span) -> Vec<Span> {
    let mut out = vec![];
    let mut current: Option<Span> = None;
    let mut pos = span.start;

    while pos < span.end {
        let line_end = line_end(text, pos).min(span.end);
        let content_end = trim_line_break(text, pos, line_end);
        if text[pos..content_end].trim().is_empty() {
            out.extend(current.take());
        } else {
            current = Some(match current {
                Some(p) => Span::new(p.start, content_end),
                None => Span::new(pos, content_end),
            });
        }
        pos = next_line(text, line_end);
    }

    out.extend(current);
    out
}

fn push_text(out: &mut Vec<BlockNode>, start: usize, end: usize) {
    if end > start {
        let span = Span::new(start, end);
        out.push(BlockNode {
            kind: BlockKind::Text,
            span,
            content_span: span,
            items: vec![],
        });
    }
}

/// Finds the first region sentinel at or after `from`.
fn find_region_sentinel(text: &str, from: usize) -> Option<(usize, RegionKind, usize)> {
    let mut search = from;
    while let Some(rel) = text.get(search..)?.find(Sentinel::OPEN) {
        let at = search + rel;
        if let Some((kind, len)) = RegionKind::parse_sentinel(&text[at..]) {
            return Some((at, kind, len));
        }
        search = at + Sentinel::OPEN.len();
    }
    None
}

fn region_extent(text: &str, kind: RegionKind, body_start: usize) -> Option<Extent> {
    match kind {
        RegionKind::Heading(_) => {
            let end = line_end(text, body_start);
            Some(Extent {
                body: Span::new(body_start, trim_line_break(text, body_start, end)),
                items: vec![],
                end: next_line(text, end),
            })
        }
        RegionKind::List(style) => {
            let mut items = vec![];
            let mut pos = body_start;
            while pos < text.len() {
                let end = line_end(text, pos);
                let content_end = trim_line_break(text, pos, end);
                let Some(marker) = style.item_marker_len(&text[pos..content_end]) else {
                    break;
                };
                items.push(Span::new(pos + marker, content_end));
                pos = next_line(text, end);
            }
            let last = items.last()?.end;
            Some(Extent {
                body: Span::new(body_start, last),
                items,
                end: pos,
            })
        }
        RegionKind::Format(_) | RegionKind::Quote => {
            // Body runs to the first blank line, the next region sentinel or EOD.
            let limit = find_region_sentinel(text, body_start).map_or(text.len(), |(at, ..)| at);
            let mut stop = limit;
            let mut pos = body_start;
            while pos < limit {
                let end = line_end(text, pos);
                if text[pos..trim_line_break(text, pos, end)].trim().is_empty() {
                    stop = pos;
                    break;
                }
                pos = next_line(text, end);
            }
            Some(Extent {
                body: Span::new(body_start, trim_line_break(text, body_start, stop).max(body_start)),
                items: vec![],
                end: stop,
            })
        }
    }
}

/// Offset of the `\n` ending the line at `pos`, or the document length.
fn line_end(text: &str, pos: usize) -> usize {
    text[pos..].find('\n').map_or(text.len(), |i| pos + i)
}

/// Start of the line after the one ending at `end`.
fn next_line(text: &str, end: usize) -> usize {
    if end < text.len() { end + 1 } else { end }
}

/// Excludes one trailing `\n` or `\r\n` (and a bare `\r`) from `[start, end)`.
fn trim_line_break(text: &str, start: usize, end: usize) -> usize {
    let s = &text[start..end];
    let s = s.strip_suffix('\n').unwrap_or(s);
    let s = s.strip_suffix('\r').unwrap_or(s);
    start + s.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{Alignment, HeadingLevel, ListStyle};
    use pretty_assertions::assert_eq;

    fn kinds(text: &str) -> Vec<BlockKind> {
        parse_blocks(text).into_iter().map(|b| b.kind).collect()
    }

    fn bodies(text: &str) -> Vec<&str> {
        parse_blocks(text)
            .into_iter()
            .map(|b| b.content_span.slice(text))
            .collect()
    }

    #[test]
    fn plain_text_is_one_block() {
        assert_eq!(kinds("Hello\n\nWorld"), vec![BlockKind::Text]);
    }

    #[test]
    fn empty_document_has_no_blocks() {
        assert!(parse_blocks("").is_empty());
    }

    #[test]
    fn heading_body_is_one_line() {
        let text = "<!-- HEADING:1 -->\nTitle\nBody text";
        assert_eq!(
            kinds(text),
            vec![
                BlockKind::Region(RegionKind::Heading(HeadingLevel::One)),
                BlockKind::Text
            ]
        );
        assert_eq!(bodies(text), vec!["Title", "Body text"]);
    }

    #[test]
    fn list_collects_consecutive_items() {
        let text = "<!-- LIST:BULLET -->\n- a\n- b\nafter";
        let blocks = parse_blocks(text);
        assert_eq!(blocks.len(), 2);
        let items: Vec<&str> = blocks[0].items.iter().map(|s| s.slice(text)).collect();
        assert_eq!(items, vec!["a", "b"]);
        assert_eq!(blocks[0].span.slice(text), "<!-- LIST:BULLET -->\n- a\n- b\n");
        assert_eq!(blocks[1].span.slice(text), "after");
    }

    #[test]
    fn numbered_list_ignores_bullet_items() {
        let text = "<!-- LIST:NUMBERED -->\n1. one\n- two\n";
        let blocks = parse_blocks(text);
        assert_eq!(blocks[0].kind, BlockKind::Region(RegionKind::List(ListStyle::Numbered)));
        assert_eq!(blocks[0].items.len(), 1);
        assert_eq!(blocks[1].span.slice(text), "- two\n");
    }

    #[test]
    fn list_without_items_stays_text() {
        let text = "<!-- LIST:BULLET -->\nnot an item";
        assert_eq!(kinds(text), vec![BlockKind::Text]);
    }

    #[test]
    fn format_body_stops_at_blank_line() {
        let text = "<!-- FORMAT:CENTER -->\nWelcome\nto the hotel\n\nNext paragraph";
        assert_eq!(
            kinds(text),
            vec![
                BlockKind::Region(RegionKind::Format(Alignment::Center)),
                BlockKind::Text
            ]
        );
        assert_eq!(bodies(text), vec!["Welcome\nto the hotel", "\nNext paragraph"]);
    }

    #[test]
    fn quote_body_stops_at_next_sentinel() {
        let text = "<!-- QUOTE -->\nGreat stay\n<!-- HEADING:2 -->\nRooms";
        assert_eq!(bodies(text), vec!["Great stay", "Rooms"]);
    }

    #[test]
    fn format_body_runs_to_end_of_document() {
        let text = "<!-- FORMAT:RIGHT -->\nSigned, the staff\n";
        let blocks = parse_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content_span.slice(text), "Signed, the staff");
        assert_eq!(blocks[0].span.end, text.len());
    }

    #[test]
    fn sentinel_mid_line_splits_text() {
        let text = "Intro <!-- HEADING:2 -->\nTitle";
        assert_eq!(bodies(text), vec!["Intro ", "Title"]);
    }

    #[test]
    fn half_typed_sentinel_is_text() {
        let text = "Hello <!-- FORMAT:CEN";
        assert_eq!(kinds(text), vec![BlockKind::Text]);
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let text = "\nOne\nline two\n\n\nThree\n";
        let spans: Vec<&str> = paragraphs(text, Span::new(0, text.len()))
            .into_iter()
            .map(|s| s.slice(text))
            .collect();
        assert_eq!(spans, vec!["One\nline two", "Three"]);
    }

    #[test]
    fn paragraphs_handle_crlf() {
        let text = "One\r\n\r\nTwo";
        let spans: Vec<&str> = paragraphs(text, Span::new(0, text.len()))
            .into_iter()
            .map(|s| s.slice(text))
            .collect();
        assert_eq!(spans, vec!["One", "Two"]);
    }

    #[test]
    fn line_bound_blocks_contain_the_end_of_their_last_line() {
        let text = "<!-- LIST:BULLET -->\n- Pool\n- Spa\nAfter";
        let blocks = parse_blocks(text);
        let list = &blocks[0];
        assert!(list.is_line_bound());
        assert!(!blocks[1].is_line_bound());

        let spa_end = text.find("Spa").unwrap() + 3;
        assert!(list.contains(text, spa_end));
        assert!(!list.contains(text, text.find("After").unwrap()));
        assert!(!list.contains(text, 0));
    }

    #[test]
    fn inline_bodies_follow_block_kind() {
        let text = "One\n\nTwo\n<!-- LIST:NUMBERED -->\n1. a\n2. b\n";
        let bodies: Vec<&str> = parse_blocks(text)
            .iter()
            .flat_map(|b| b.inline_bodies(text))
            .map(|s| s.slice(text))
            .collect();
        assert_eq!(bodies, vec!["One", "Two", "a", "b"]);
    }
}
