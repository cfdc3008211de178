//! Rewrites legacy encodings into the canonical ones.
//!
//! Shorthand phones and maps become comment embeds; image comment pairs
//! become JSON islands. A rewrite only happens where the rendered HTML stays
//! the same: shorthands must end their paragraph (the comment form adds a
//! line break) and nothing inside a heading or list is touched. Everything
//! else is copied byte for byte, so running the rewrite twice changes
//! nothing the second time.

use crate::{
    grammar::{ImageIsland, kinds::{MapEmbed, PhoneEmbed}},
    parsing::{BlockKind, Embed, Encoding, Span, line_break_at, parse_blocks, scan_embeds},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub content: String,
    /// Number of embeds rewritten.
    pub rewritten: usize,
}

pub fn normalize_legacy(text: &str) -> Normalized {
    let layout = Layout::of(text);
    let mut content = String::with_capacity(text.len());
    let mut rewritten = 0;
    let mut copied = 0;

    for occurrence in scan_embeds(text) {
        let span = occurrence.span;
        if span.start < copied || layout.in_line_bound(span) {
            continue;
        }
        let original = span.slice(text);
        let core_end = span.start + trim_line_break(original).len();
        let ends_paragraph = layout.ends_paragraph(core_end);

        let (canonical, end) = match (&occurrence.embed, occurrence.encoding) {
            // The comment form ends in a line break, standing in for the one after the shorthand.
            (Embed::Phone(phone), Encoding::Shorthand) if ends_paragraph => {
                (PhoneEmbed::encode(phone), span.end + line_break_at(text, span.end))
            }
            (Embed::Map(map), Encoding::Shorthand) if ends_paragraph => {
                (MapEmbed::encode(map), span.end + line_break_at(text, span.end))
            }
            (Embed::ImageComment { url, name }, Encoding::Comment) => {
                let mut island = ImageIsland::new(url.as_str());
                island.alt = Some(name.clone()).filter(|n| !n.is_empty());
                let mut canonical = island.encode();
                if ends_paragraph {
                    canonical.push_str(&text[core_end..span.end]);
                }
                (canonical, span.end)
            }
            (Embed::Phone(_) | Embed::Map(_), Encoding::Shorthand) => {
                log::debug!("kept mid-paragraph shorthand at {}", span.start);
                continue;
            }
            _ => continue,
        };
        content.push_str(&text[copied..span.start]);
        content.push_str(&canonical);
        copied = end;
        rewritten += 1;
    }
    content.push_str(&text[copied..]);

    if rewritten > 0 {
        log::info!("normalized {rewritten} legacy embed(s)");
    }
    Normalized { content, rewritten }
}

/// Where paragraphs end and which spans belong to line-bound regions.
struct Layout {
    paragraph_ends: Vec<usize>,
    line_bound: Vec<Span>,
}

impl Layout {
    fn of(text: &str) -> Self {
        let mut paragraph_ends = vec![];
        let mut line_bound = vec![];
        for block in parse_blocks(text) {
            if block.is_line_bound() {
                line_bound.push(block.span);
            } else if block.kind == BlockKind::Text {
                paragraph_ends.extend(block.inline_bodies(text).iter().map(|p| p.end));
            } else {
                paragraph_ends.push(block.content_span.end);
            }
        }
        Self {
            paragraph_ends,
            line_bound,
        }
    }

    fn in_line_bound(&self, span: Span) -> bool {
        self.line_bound
            .iter()
            .any(|r| span.start < r.end && r.start < span.end)
    }

    fn ends_paragraph(&self, at: usize) -> bool {
        self.paragraph_ends.contains(&at)
    }
}

fn trim_line_break(s: &str) -> &str {
    let s = s.strip_suffix('\n').unwrap_or(s);
    s.strip_suffix('\r').unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn shorthand_ending_a_paragraph_becomes_comment_embed() {
        let out = normalize_legacy("Call [PHONE:055 1:Desk]\n\nor [MAP:https://m.test/h:Hotel]");
        assert_eq!(
            out.content,
            concat!(
                "Call <!-- PHONE: 055 1 -->\n[📞 Desk]\n",
                "\nor <!-- MAP: https://m.test/h -->\n[📍 Hotel]\n"
            )
        );
        assert_eq!(out.rewritten, 2);
    }

    #[test]
    fn mid_paragraph_shorthand_is_kept() {
        let text = "Call [PHONE:055 1:Desk] or [MAP:https://m.test/h:Hotel]!";
        let out = normalize_legacy(text);
        assert_eq!(out.content, text);
        assert_eq!(out.rewritten, 0);
    }

    #[test]
    fn image_comment_becomes_island_with_alt() {
        let out = normalize_legacy("<!-- IMAGE: /lobby.jpg -->\n[Immagine: Lobby]\n\nWelcome");
        assert_eq!(
            out.content,
            concat!(
                r#"{"type":"image","url":"/lobby.jpg","position":"center","caption":null,"width":null,"alt":"Lobby"}"#,
                "\n\nWelcome"
            )
        );
    }

    #[test]
    fn image_comment_inside_paragraph_drops_swallowed_line_break() {
        let out = normalize_legacy("<!-- IMAGE: /lobby.jpg -->\n[Immagine: Lobby]\nWelcome");
        assert_eq!(
            out.content,
            concat!(
                r#"{"type":"image","url":"/lobby.jpg","position":"center","caption":null,"width":null,"alt":"Lobby"}"#,
                "Welcome"
            )
        );
    }

    #[test]
    fn line_bound_regions_are_untouched() {
        let text = "<!-- HEADING:1 -->\nCall [PHONE:055 1:Desk]\n<!-- LIST:BULLET -->\n- [MAP:u:Hotel]\n- Spa\n";
        let out = normalize_legacy(text);
        assert_eq!(out.content, text);
        assert_eq!(out.rewritten, 0);
    }

    #[rstest]
    #[case::list_item("<!-- LIST:BULLET -->\n- Call [PHONE:055 1:Desk]\n- Spa\n")]
    #[case::heading("<!-- HEADING:1 -->\nCall [PHONE:055 1:Desk] today\n")]
    #[case::paragraph_end("Call [PHONE:055 1:Desk]\nNext line\n\nMore [MAP:https://m.test/h:Hotel]")]
    #[case::mid_paragraph("Call [PHONE:055 1:Desk] today")]
    #[case::quote_end("<!-- QUOTE -->\nRing [PHONE:1:Desk]\n")]
    #[case::image_name("<!-- IMAGE: /x.jpg -->\n[Immagine: x.jpg]\n")]
    #[case::image_then_text("<!-- IMAGE: /x.jpg -->\n[Immagine: X]\nWelcome\n\nBye")]
    #[case::image_mid_line("See <!-- IMAGE: /x.jpg -->more")]
    fn rendering_survives_normalization(#[case] text: &str) {
        let out = normalize_legacy(text);
        assert_eq!(render(&out.content, &[]), render(text, &[]));
    }

    #[test]
    fn canonical_content_is_untouched() {
        let text = "<!-- HEADING:1 -->\nCiao\n<!-- PHONE: 1 -->\n[📞 x]\n[IMAGE_1] **b**";
        let out = normalize_legacy(text);
        assert_eq!(out.content, text);
        assert_eq!(out.rewritten, 0);
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_legacy("[PHONE:1:a]\n<!-- IMAGE: /x.jpg -->\n[Immagine: X]\n[MAP:u]");
        assert!(once.rewritten > 0);
        let twice = normalize_legacy(&once.content);
        assert_eq!(twice.content, once.content);
        assert_eq!(twice.rewritten, 0);
    }
}
