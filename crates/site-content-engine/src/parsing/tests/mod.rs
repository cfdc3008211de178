//! Whole-document parsing tests.
//!
//! Documents are reduced to a one-line-per-body outline and compared with
//! inline snapshots.

mod invariants;

use rstest::rstest;

use crate::parsing::{
    blocks::{BlockKind, paragraphs},
    inline::InlineNode,
    parse_document, parse_inline_span,
};

fn outline(text: &str) -> String {
    let doc = parse_document(text);
    invariants::check(text, &doc.blocks);

    let mut lines = vec![];
    for b in &doc.blocks {
        match b.kind {
            BlockKind::Text => {
                for p in paragraphs(text, b.content_span) {
                    lines.push(format!("para: {}", inlines(text, &parse_inline_span(text, p))));
                }
            }
            BlockKind::Region(kind) if !b.items.is_empty() => {
                let items: Vec<String> = b
                    .items
                    .iter()
                    .map(|i| inlines(text, &parse_inline_span(text, *i)))
                    .collect();
                lines.push(format!("{kind:?}: {}", items.join(" | ")));
            }
            BlockKind::Region(kind) => {
                let body = parse_inline_span(text, b.content_span);
                lines.push(format!("{kind:?}: {}", inlines(text, &body)));
            }
        }
    }
    lines.join("\n")
}

fn inlines(text: &str, nodes: &[InlineNode]) -> String {
    nodes
        .iter()
        .map(|n| match n {
            InlineNode::Text(sp) => sp.slice(text).replace('\n', "⏎"),
            InlineNode::Emphasis { kind, children, .. } => {
                format!("{kind:?}({})", inlines(text, children))
            }
            InlineNode::Link { label, url, .. } => {
                format!("Link({} -> {})", inlines(text, label), url.slice(text))
            }
            InlineNode::Embed { encoding, .. } => format!("<{encoding:?}>"),
        })
        .collect()
}

#[test]
fn hotel_page_outline() {
    let text = concat!(
        "<!-- HEADING:1 -->\nWelcome to **Villa Rosa**\n",
        "Relax by the *pool*.\n\nBook [here](https://b.test).\n",
        "<!-- LIST:BULLET -->\n- Spa\n- __Free__ parking\n",
        "<!-- FORMAT:CENTER -->\nCall [PHONE:055 1:Desk]\n",
    );
    insta::assert_snapshot!(outline(text), @r"
    Heading(One): Welcome to Bold(Villa Rosa)
    para: Relax by the Italic(pool).
    para: Book Link(here -> https://b.test).
    List(Bullet): Spa | Underline(Free) parking
    Format(Center): Call <Shorthand>
    ");
}

#[test]
fn quote_with_island_and_numbered_list() {
    let text = concat!(
        "<!-- QUOTE -->\nA *lovely* stay\n",
        "<!-- LIST:NUMBERED -->\n1. Check in\n2. Relax\n",
        r#"{"type":"image","url":"/pool.jpg","position":"full"}"#,
    );
    insta::assert_snapshot!(outline(text), @r"
    Quote: A Italic(lovely) stay
    List(Numbered): Check in | Relax
    para: <Island>
    ");
}

#[rstest]
#[case::half_typed_sentinel("<!-- HEAD")]
#[case::truncated_island(r#"{"type":"image","url":"/a.jp"#)]
#[case::unclosed_link("[label](https://x")]
#[case::unclosed_bold("**bold")]
#[case::wrong_island_type(r#"{"type":"video","url":"/a.mp4"}"#)]
fn malformed_input_stays_literal(#[case] text: &str) {
    assert_eq!(outline(text), format!("para: {text}"));
}

#[test]
fn same_kind_does_not_nest() {
    let text = "**a **b** c**";
    // First close wins.
    assert_eq!(outline(text), "para: Bold(a )bBold( c)");
}

#[test]
fn empty_document() {
    assert!(parse_document("").blocks.is_empty());
}

#[test]
fn blank_lines_only_have_no_paragraphs() {
    assert_eq!(outline("\n\n\n"), "");
}
