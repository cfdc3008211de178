use crate::grammar::{
    Emphasis, ImageIsland,
    kinds::{
        CommentEmbed, EmbedKeyword, GalleryPlaceholder, Link, MapEmbed, PhoneEmbed, Sentinel,
        Shorthand,
    },
};

use super::{cursor::Cursor, span::Span};

/// Which textual form an embed was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// `<!-- KEYWORD: value -->\n[label]\n`
    Comment,
    /// `[PHONE:…]` / `[MAP:…]`
    Shorthand,
    /// `{"type":"image",…}`
    Island,
    /// `[IMAGE_n]`
    Placeholder,
}

/// A self-contained embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Embed {
    /// Legacy image comment pair; `name` comes from the `[Immagine: name]` line.
    ImageComment { url: String, name: String },
    ImageIsland(ImageIsland),
    Phone(PhoneEmbed),
    Map(MapEmbed),
    /// 1-based reference into the gallery, resolved at render time.
    GalleryImage(usize),
}

impl Embed {
    /// Inline image embeds, the ones gallery deletion counts.
    pub fn is_image(&self) -> bool {
        matches!(self, Embed::ImageComment { .. } | Embed::ImageIsland(_))
    }
}

/// A parsed inline node. Text is stored as spans into the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineNode {
    Text(Span),
    Emphasis {
        kind: Emphasis,
        full: Span,
        children: Vec<InlineNode>,
    },
    Link {
        full: Span,
        label: Vec<InlineNode>,
        url: Span,
    },
    Embed {
        full: Span,
        embed: Embed,
        encoding: Encoding,
    },
}

impl InlineNode {
    pub fn span(&self) -> Span {
        match self {
            InlineNode::Text(sp) => *sp,
            InlineNode::Emphasis { full, .. }
            | InlineNode::Link { full, .. }
            | InlineNode::Embed { full, .. } => *full,
        }
    }
}

/// Parses inline content into a sequence of [`InlineNode`]s.
///
/// # Arguments
/// - `base`: Byte offset in the document where `s` begins
/// - `s`: The content to parse (a paragraph, heading line, list item or region body)
///
/// # Precedence
/// At each position embeds are tried first, then emphasis (bold, underline,
/// italic), then links. Embeds are atomic: nothing inside an embed is parsed
/// further. Unclosed constructs fall through to plain text.
pub fn parse_inline(base: usize, s: &str) -> Vec<InlineNode> {
    let mut cur = Cursor::new(s, base);
    let mut out = vec![];
    let mut text_start = cur.pos();

    fn flush_text(out: &mut Vec<InlineNode>, start: usize, end: usize) {
        if end > start {
            out.push(InlineNode::Text(Span { start, end }));
        }
    }

    while !cur.eof() {
        let node = try_parse_embed(&mut cur)
            .or_else(|| try_parse_emphasis(&mut cur))
            .or_else(|| try_parse_link(&mut cur));
        match node {
            Some(node) => {
                let span = node.span();
                flush_text(&mut out, text_start, span.start);
                text_start = span.end;
                out.push(node);
            }
            None => {
                cur.bump_char();
            }
        }
    }

    flush_text(&mut out, text_start, cur.pos());
    out
}

/// Attempts every embed recognizer at the current position.
///
/// On success the cursor is advanced past the embed.
pub(crate) fn try_parse_embed(cur: &mut Cursor<'_>) -> Option<InlineNode> {
    let start = cur.pos();
    let rest = cur.rest();

    let (embed, encoding, len) = if rest.starts_with(Sentinel::OPEN) {
        let (comment, len) = CommentEmbed::parse(rest)?;
        let embed = match comment.keyword {
            EmbedKeyword::Image => Embed::ImageComment {
                url: comment.value,
                name: comment.label.unwrap_or_default(),
            },
            EmbedKeyword::Phone => Embed::Phone(PhoneEmbed {
                label: comment.label.unwrap_or_else(|| comment.value.clone()),
                number: comment.value,
            }),
            EmbedKeyword::Map => Embed::Map(MapEmbed {
                label: comment.label.unwrap_or_else(|| comment.value.clone()),
                url: comment.value,
            }),
        };
        (embed, Encoding::Comment, len)
    } else if cur.peek() == Some(ImageIsland::OPEN) {
        let (island, len) = ImageIsland::parse(rest)?;
        (Embed::ImageIsland(island), Encoding::Island, len)
    } else if cur.peek() == Some(Link::LABEL_OPEN) {
        if let Some((shorthand, len)) = Shorthand::parse(rest) {
            let embed = match shorthand {
                Shorthand::Phone(phone) => Embed::Phone(phone),
                Shorthand::Map(map) => Embed::Map(map),
            };
            (embed, Encoding::Shorthand, len)
        } else {
            let (n, len) = GalleryPlaceholder::parse(rest)?;
            (Embed::GalleryImage(n), Encoding::Placeholder, len)
        }
    } else {
        return None;
    };

    cur.bump_n(len);
    Some(InlineNode::Embed {
        full: Span::new(start, cur.pos()),
        embed,
        encoding,
    })
}

/// Attempts emphasis in precedence order. Children are parsed recursively,
/// so `**a *b* c**` nests italic inside bold.
fn try_parse_emphasis(cur: &mut Cursor<'_>) -> Option<InlineNode> {
    for kind in Emphasis::PRECEDENCE {
        let delim = kind.delimiter();
        if !cur.starts_with(delim) {
            continue;
        }
        let content = &cur.rest()[delim.len()..];
        let Some(close) = kind.find_close(content) else {
            continue;
        };
        let start = cur.pos();
        let inner_start = start + delim.len();
        let children = parse_inline(inner_start, &content[..close]);
        cur.bump_n(delim.len() + close + delim.len());
        return Some(InlineNode::Emphasis {
            kind,
            full: Span::new(start, cur.pos()),
            children,
        });
    }
    None
}

/// Attempts a `[label](url)` link. Label and URL must be non-empty and on one line.
///
/// On failure, cursor position is restored.
fn try_parse_link(cur: &mut Cursor<'_>) -> Option<InlineNode> {
    if cur.peek() != Some(Link::LABEL_OPEN) {
        return None;
    }
    let saved = cur.clone();
    let start = cur.pos();
    cur.bump_n(1);
    let label_start = cur.pos();

    while let Some(b) = cur.peek() {
        if b == Link::LABEL_CLOSE || b == b'\n' {
            break;
        }
        cur.bump_char();
    }
    let label_end = cur.pos();
    if cur.peek() != Some(Link::LABEL_CLOSE) || label_end == label_start {
        *cur = saved;
        return None;
    }
    cur.bump_n(1);
    if cur.peek() != Some(Link::URL_OPEN) {
        *cur = saved;
        return None;
    }
    cur.bump_n(1);
    let url_start = cur.pos();

    while let Some(b) = cur.peek() {
        if b == Link::URL_CLOSE || b == b'\n' {
            break;
        }
        cur.bump_char();
    }
    let url_end = cur.pos();
    if cur.peek() != Some(Link::URL_CLOSE) || url_end == url_start {
        *cur = saved;
        return None;
    }
    cur.bump_n(1);

    let label_text = &saved.s[label_start - saved.base..label_end - saved.base];
    Some(InlineNode::Link {
        full: Span::new(start, cur.pos()),
        label: parse_inline(label_start, label_text),
        url: Span::new(url_start, url_end),
    })
}
