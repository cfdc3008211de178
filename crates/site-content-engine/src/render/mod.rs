//! # Rendering
//!
//! Turns a document into presentational HTML. Regions become block elements,
//! embeds become links and figures, emphasis and links become inline
//! elements. Blank lines separate paragraphs; a single newline becomes
//! `<br>`.
//!
//! Output is not escaped: content comes from the site operator, who is
//! trusted to write HTML.

use crate::{
    gallery::ImageDescriptor,
    grammar::{Emphasis, ImageIsland, ListStyle, RegionKind, kinds::EmbedKeyword},
    parsing::{
        BlockKind, BlockNode, Embed, InlineNode, Span, paragraphs, parse_document,
        parse_inline_span,
    },
};

const EXTERNAL: &str = r#"target="_blank" rel="noopener noreferrer""#;

/// Renders `document` to HTML. `gallery` resolves `[IMAGE_n]` placeholders.
///
/// Pure: the same inputs always give the same output.
pub fn render(document: &str, gallery: &[ImageDescriptor]) -> String {
    let mut w = HtmlWriter::new(document, gallery);
    for block in parse_document(document).blocks {
        w.block(&block);
    }
    w.out
}

struct HtmlWriter<'a> {
    src: &'a str,
    gallery: &'a [ImageDescriptor],
    out: String,
}

impl<'a> HtmlWriter<'a> {
    fn new(src: &'a str, gallery: &'a [ImageDescriptor]) -> Self {
        Self {
            src,
            gallery,
            out: String::with_capacity(src.len() * 2),
        }
    }

    fn block(&mut self, b: &BlockNode) {
        match b.kind {
            BlockKind::Text => {
                for p in paragraphs(self.src, b.content_span) {
                    self.paragraph(p);
                }
            }
            BlockKind::Region(RegionKind::Heading(level)) => {
                let tag = format!("h{}", level.number());
                self.wrapped(&tag, "", b.content_span);
            }
            BlockKind::Region(RegionKind::List(style)) => {
                let tag = match style {
                    ListStyle::Bullet => "ul",
                    ListStyle::Numbered => "ol",
                };
                self.out.push_str(&format!("<{tag}>"));
                for item in &b.items {
                    self.wrapped("li", "", *item);
                }
                self.out.push_str(&format!("</{tag}>"));
            }
            BlockKind::Region(RegionKind::Format(align)) => {
                let attrs = format!(r#" style="text-align: {};""#, align.css());
                self.wrapped("div", &attrs, b.content_span);
            }
            BlockKind::Region(RegionKind::Quote) => {
                self.wrapped("blockquote", "", b.content_span);
            }
        }
    }

    /// A paragraph holding nothing but one image is emitted as a bare figure.
    fn paragraph(&mut self, span: Span) {
        let src = self.src;
        let nodes = parse_inline_span(src, span);
        let mut visible = nodes.iter().filter(|n| match n {
            InlineNode::Text(sp) => !sp.slice(src).trim().is_empty(),
            _ => true,
        });
        if let (Some(InlineNode::Embed { embed, .. }), None) = (visible.next(), visible.next())
            && self.image(embed)
        {
            return;
        }
        self.out.push_str("<p>");
        self.inlines(&nodes);
        self.out.push_str("</p>");
    }

    fn wrapped(&mut self, tag: &str, attrs: &str, body: Span) {
        self.out.push_str(&format!("<{tag}{attrs}>"));
        let nodes = parse_inline_span(self.src, body);
        self.inlines(&nodes);
        self.out.push_str(&format!("</{tag}>"));
    }

    fn inlines(&mut self, nodes: &[InlineNode]) {
        for node in nodes {
            match node {
                InlineNode::Text(sp) => self.text(*sp),
                InlineNode::Emphasis { kind, children, .. } => {
                    let tag = match kind {
                        Emphasis::Bold => "strong",
                        Emphasis::Italic => "em",
                        Emphasis::Underline => "u",
                    };
                    self.out.push_str(&format!("<{tag}>"));
                    self.inlines(children);
                    self.out.push_str(&format!("</{tag}>"));
                }
                InlineNode::Link { label, url, .. } => {
                    let url = url.slice(self.src);
                    self.out.push_str(&format!(r#"<a href="{url}" {EXTERNAL}>"#));
                    self.inlines(label);
                    self.out.push_str("</a>");
                }
                InlineNode::Embed { full, embed, .. } => {
                    if !self.embed(embed) {
                        self.text(*full);
                    }
                }
            }
        }
    }

    fn text(&mut self, sp: Span) {
        let s = sp.slice(self.src);
        let mut lines = s.split('\n');
        if let Some(first) = lines.next() {
            self.out.push_str(first.trim_end_matches('\r'));
        }
        for line in lines {
            self.out.push_str("<br>");
            self.out.push_str(line.trim_end_matches('\r'));
        }
    }

    /// Returns false when the embed cannot be drawn and should stay literal.
    fn embed(&mut self, embed: &Embed) -> bool {
        match embed {
            Embed::Phone(phone) => {
                self.out.push_str(&format!(
                    r#"<a href="{}" class="content-phone">{} {}</a>"#,
                    phone.href(),
                    EmbedKeyword::Phone.label_prefix(),
                    phone.label
                ));
                true
            }
            Embed::Map(map) => {
                self.out.push_str(&format!(
                    r#"<a href="{}" class="content-map" {EXTERNAL}>{} {}</a>"#,
                    map.url,
                    EmbedKeyword::Map.label_prefix(),
                    map.label
                ));
                true
            }
            _ => self.image(embed),
        }
    }

    fn image(&mut self, embed: &Embed) -> bool {
        match embed {
            Embed::ImageIsland(island) => self.figure(island),
            Embed::ImageComment { url, name } => {
                let mut island = ImageIsland::new(url.as_str());
                island.alt = Some(name.clone());
                self.figure(&island);
            }
            Embed::GalleryImage(n) => {
                let Some(image) = n.checked_sub(1).and_then(|i| self.gallery.get(i)) else {
                    log::debug!("gallery placeholder {n} has no image");
                    return false;
                };
                self.figure(&image.to_island());
            }
            Embed::Phone(_) | Embed::Map(_) => return false,
        }
        true
    }

    fn figure(&mut self, island: &ImageIsland) {
        let style = island
            .width
            .as_ref()
            .map(|w| format!(r#" style="width: {};""#, w.css()))
            .unwrap_or_default();
        self.out.push_str(&format!(
            r#"<figure class="content-image image-{}"{style}><img src="{}" alt="{}">"#,
            island.position,
            island.url,
            island.alt_text()
        ));
        if let Some(caption) = island.caption.as_deref().filter(|c| !c.is_empty()) {
            self.out.push_str(&format!("<figcaption>{caption}</figcaption>"));
        }
        self.out.push_str("</figure>");
    }
}
