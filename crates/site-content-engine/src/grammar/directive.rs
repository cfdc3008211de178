use super::kinds::{
    Alignment, Emphasis, HeadingLevel, ImageIsland, Link, ListStyle, MapEmbed, PhoneEmbed,
    RegionKind, Shorthand,
};

/// Every formatting or embed intent the grammar can express.
///
/// Paired directives (emphasis, headings, alignment, quote) wrap a body;
/// lists rewrite their body into items; links, phones, maps and images are
/// self-contained and carry their own data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Bold,
    Italic,
    Underline,
    Heading(HeadingLevel),
    List(ListStyle),
    Alignment(Alignment),
    Quote,
    Link { url: String, label: String },
    Phone { number: String, label: String },
    Map { url: String, label: String },
    ImageIsland(ImageIsland),
}

impl Directive {
    /// Open/close markers for directives that wrap a selection verbatim.
    pub fn markers(&self) -> Option<(String, String)> {
        let emphasis = |e: Emphasis| Some((e.delimiter().to_string(), e.delimiter().to_string()));
        let region = |r: RegionKind| Some((r.sentinel(), r.terminator().to_string()));
        match self {
            Directive::Bold => emphasis(Emphasis::Bold),
            Directive::Italic => emphasis(Emphasis::Italic),
            Directive::Underline => emphasis(Emphasis::Underline),
            Directive::Heading(level) => region(RegionKind::Heading(*level)),
            Directive::Alignment(align) => region(RegionKind::Format(*align)),
            Directive::Quote => region(RegionKind::Quote),
            Directive::List(_)
            | Directive::Link { .. }
            | Directive::Phone { .. }
            | Directive::Map { .. }
            | Directive::ImageIsland(_) => None,
        }
    }

    /// Canonical text for this directive applied to `body`.
    ///
    /// Embeds ignore `body`. A link with an empty label uses `body`, then the URL.
    pub fn encode(&self, body: &str) -> String {
        if let Some((open, close)) = self.markers() {
            return format!("{open}{body}{close}");
        }
        match self {
            Directive::List(style) => encode_list(*style, body),
            Directive::Link { url, label } => {
                let label = [label.as_str(), body, url.as_str()]
                    .into_iter()
                    .find(|s| !s.trim().is_empty())
                    .unwrap_or_default();
                Link::encode(label, url)
            }
            Directive::Phone { number, label } => PhoneEmbed {
                number: number.clone(),
                label: label.clone(),
            }
            .encode(),
            Directive::Map { url, label } => MapEmbed {
                url: url.clone(),
                label: label.clone(),
            }
            .encode(),
            Directive::ImageIsland(island) => island.encode(),
            _ => body.to_string(),
        }
    }

    /// One-line form of a phone or map embed, for line-bound regions.
    pub fn encode_shorthand(&self) -> Option<String> {
        let shorthand = match self {
            Directive::Phone { number, label } => Shorthand::Phone(PhoneEmbed {
                number: number.clone(),
                label: label.clone(),
            }),
            Directive::Map { url, label } => Shorthand::Map(MapEmbed {
                url: url.clone(),
                label: label.clone(),
            }),
            _ => return None,
        };
        Some(shorthand.encode())
    }
}

/// Turns each non-blank body line into an item; an empty body yields one empty item.
fn encode_list(style: ListStyle, body: &str) -> String {
    let mut out = RegionKind::List(style).sentinel();
    let items: Vec<&str> = body
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if items.is_empty() {
        out.push_str(&style.marker(1));
        out.push('\n');
        return out;
    }
    for (i, item) in items.iter().enumerate() {
        out.push_str(&style.marker(i + 1));
        out.push_str(item);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn emphasis_wraps_body() {
        assert_eq!(Directive::Bold.encode("hi"), "**hi**");
        assert_eq!(Directive::Italic.encode("hi"), "*hi*");
        assert_eq!(Directive::Underline.encode("hi"), "__hi__");
    }

    #[test]
    fn regions_wrap_with_sentinel_and_terminator() {
        assert_eq!(
            Directive::Heading(HeadingLevel::Two).encode("Rooms"),
            "<!-- HEADING:2 -->\nRooms\n"
        );
        assert_eq!(
            Directive::Alignment(Alignment::Center).encode("Welcome"),
            "<!-- FORMAT:CENTER -->\nWelcome\n"
        );
        assert_eq!(Directive::Quote.encode("Lovely"), "<!-- QUOTE -->\nLovely\n");
    }

    #[test]
    fn lists_number_their_items() {
        assert_eq!(
            Directive::List(ListStyle::Numbered).encode("Pool\n\n Spa \n"),
            "<!-- LIST:NUMBERED -->\n1. Pool\n2. Spa\n"
        );
        assert_eq!(
            Directive::List(ListStyle::Bullet).encode(""),
            "<!-- LIST:BULLET -->\n- \n"
        );
    }

    #[test]
    fn link_label_falls_back_to_body_then_url() {
        let link = |label: &str| Directive::Link {
            url: "https://example.com".into(),
            label: label.into(),
        };
        assert_eq!(link("Book").encode("ignored"), "[Book](https://example.com)");
        assert_eq!(link("").encode("selected"), "[selected](https://example.com)");
        assert_eq!(link("").encode(""), "[https://example.com](https://example.com)");
    }

    #[test]
    fn embeds_ignore_body() {
        let map = Directive::Map {
            url: "https://maps.example/x".into(),
            label: "Find us".into(),
        };
        assert_eq!(map.encode("body"), "<!-- MAP: https://maps.example/x -->\n[📍 Find us]\n");
    }

    #[test]
    fn only_phone_and_map_have_shorthands() {
        let phone = Directive::Phone {
            number: "055 1".into(),
            label: "Desk".into(),
        };
        assert_eq!(phone.encode_shorthand().as_deref(), Some("[PHONE:055 1:Desk]"));
        assert_eq!(Directive::Bold.encode_shorthand(), None);
    }
}
