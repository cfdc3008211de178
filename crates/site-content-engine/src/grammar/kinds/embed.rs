use std::sync::LazyLock;

use regex::Regex;

use super::region::Sentinel;

static COMMENT_EMBED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^<!--[ \t]*(IMAGE|PHONE|MAP):[ \t]*([^\n]*?)[ \t]*-->(?:\r?\n\[([^\]\n]*)\][ \t]*(?:\r?\n|$)|\r?\n)?",
    )
    .expect("comment embed pattern")
});

static SHORTHAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(PHONE|MAP):([^\]\n]+)\]").expect("shorthand pattern"));

static GALLERY_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[IMAGE_([0-9]+)\]").expect("gallery placeholder pattern"));

/// Keyword of an HTML-comment embed sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmbedKeyword {
    Image,
    Phone,
    Map,
}

impl EmbedKeyword {
    pub fn keyword(self) -> &'static str {
        match self {
            EmbedKeyword::Image => "IMAGE",
            EmbedKeyword::Phone => "PHONE",
            EmbedKeyword::Map => "MAP",
        }
    }

    /// Prefix written inside the bracketed label line.
    pub fn label_prefix(self) -> &'static str {
        match self {
            EmbedKeyword::Image => "Immagine:",
            EmbedKeyword::Phone => "📞",
            EmbedKeyword::Map => "📍",
        }
    }

    fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "IMAGE" => Some(EmbedKeyword::Image),
            "PHONE" => Some(EmbedKeyword::Phone),
            "MAP" => Some(EmbedKeyword::Map),
            _ => None,
        }
    }
}

/// An embed in HTML-comment form: `<!-- KEYWORD: value -->\n[prefix label]\n`.
///
/// The label line is optional when reading; a comment without one still
/// counts as an embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEmbed {
    pub keyword: EmbedKeyword,
    pub value: String,
    pub label: Option<String>,
}

impl CommentEmbed {
    /// Recognizes a comment embed at the start of `s`, returning it and the bytes consumed.
    pub fn parse(s: &str) -> Option<(CommentEmbed, usize)> {
        let caps = COMMENT_EMBED.captures(s)?;
        let keyword = EmbedKeyword::from_keyword(&caps[1])?;
        let value = caps[2].trim();
        if value.is_empty() {
            return None;
        }
        let label = caps.get(3).map(|m| {
            let raw = m.as_str().trim();
            raw.strip_prefix(keyword.label_prefix())
                .unwrap_or(raw)
                .trim_start()
                .to_string()
        });
        let embed = CommentEmbed {
            keyword,
            value: value.to_string(),
            label,
        };
        Some((embed, caps.get(0)?.end()))
    }

    pub fn encode(&self) -> String {
        let mut out = format!(
            "{} {}: {} {}\n",
            Sentinel::OPEN,
            self.keyword.keyword(),
            self.value,
            Sentinel::CLOSE
        );
        if let Some(label) = &self.label {
            out.push_str(&format!("[{} {label}]\n", self.keyword.label_prefix()));
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneEmbed {
    pub number: String,
    pub label: String,
}

impl PhoneEmbed {
    /// Canonical comment encoding.
    pub fn encode(&self) -> String {
        CommentEmbed {
            keyword: EmbedKeyword::Phone,
            value: self.number.clone(),
            label: Some(self.label.clone()),
        }
        .encode()
    }

    /// `tel:` target with the number's whitespace removed.
    pub fn href(&self) -> String {
        let digits: String = self.number.chars().filter(|c| !c.is_whitespace()).collect();
        format!("tel:{digits}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEmbed {
    pub url: String,
    pub label: String,
}

impl MapEmbed {
    /// Canonical comment encoding.
    pub fn encode(&self) -> String {
        CommentEmbed {
            keyword: EmbedKeyword::Map,
            value: self.url.clone(),
            label: Some(self.label.clone()),
        }
        .encode()
    }
}

/// Legacy bracket shorthands `[PHONE:number:label]` and `[MAP:url:label]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shorthand {
    Phone(PhoneEmbed),
    Map(MapEmbed),
}

impl Shorthand {
    /// Recognizes a shorthand at the start of `s`, returning it and the bytes consumed.
    ///
    /// Phone numbers never contain `:`, so the phone body splits on the first
    /// colon. Map URLs do, so the map body splits on the last colon unless that
    /// colon belongs to the URL scheme (`https://…`). A missing label falls
    /// back to the number or URL.
    pub fn parse(s: &str) -> Option<(Shorthand, usize)> {
        let caps = SHORTHAND.captures(s)?;
        let body = caps[2].trim();
        let end = caps.get(0)?.end();
        let shorthand = match &caps[1] {
            "PHONE" => {
                let (number, label) = body.split_once(':').unwrap_or((body, ""));
                let number = number.trim();
                if number.is_empty() {
                    return None;
                }
                Shorthand::Phone(PhoneEmbed {
                    number: number.to_string(),
                    label: non_empty_or(label.trim(), number),
                })
            }
            "MAP" => {
                let (url, label) = match body.rsplit_once(':') {
                    Some((url, label)) if !label.starts_with("//") => (url.trim(), label.trim()),
                    _ => (body, ""),
                };
                if url.is_empty() {
                    return None;
                }
                Shorthand::Map(MapEmbed {
                    url: url.to_string(),
                    label: non_empty_or(label, url),
                })
            }
            _ => return None,
        };
        Some((shorthand, end))
    }

    /// Single-line encoding, for headings and list items. Characters that
    /// would close the brackets or move the colon split become spaces; a label
    /// equal to its number or URL is left out.
    pub fn encode(&self) -> String {
        let (keyword, value, label) = match self {
            Shorthand::Phone(p) => (
                EmbedKeyword::Phone,
                one_line(&p.number, ':'),
                one_line(&p.label, ']'),
            ),
            Shorthand::Map(m) => (
                EmbedKeyword::Map,
                one_line(&m.url, ']'),
                one_line(&m.label, ':'),
            ),
        };
        if label.trim().is_empty() || label.trim() == value.trim() {
            format!("[{}:{value}]", keyword.keyword())
        } else {
            format!("[{}:{value}:{label}]", keyword.keyword())
        }
    }
}

fn one_line(s: &str, also: char) -> String {
    s.chars()
        .map(|c| if matches!(c, ']' | '\n' | '\r') || c == also { ' ' } else { c })
        .collect()
}

/// `[IMAGE_n]` reference to the n-th (1-based) gallery image.
pub struct GalleryPlaceholder;

impl GalleryPlaceholder {
    pub fn parse(s: &str) -> Option<(usize, usize)> {
        let caps = GALLERY_PLACEHOLDER.captures(s)?;
        let n = caps[1].parse().ok()?;
        Some((n, caps.get(0)?.end()))
    }

    pub fn encode(n: usize) -> String {
        format!("[IMAGE_{n}]")
    }
}

fn non_empty_or(s: &str, fallback: &str) -> String {
    if s.is_empty() {
        fallback.to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_phone_comment_with_label() {
        let s = "<!-- PHONE: +39 055 123 -->\n[📞 Call us]\nafter";
        let (embed, len) = CommentEmbed::parse(s).unwrap();
        assert_eq!(embed.keyword, EmbedKeyword::Phone);
        assert_eq!(embed.value, "+39 055 123");
        assert_eq!(embed.label.as_deref(), Some("Call us"));
        assert_eq!(&s[len..], "after");
    }

    #[test]
    fn parses_image_comment_pair() {
        let s = "<!-- IMAGE: /img/pool.jpg -->\n[Immagine: pool.jpg]\n";
        let (embed, len) = CommentEmbed::parse(s).unwrap();
        assert_eq!(embed.keyword, EmbedKeyword::Image);
        assert_eq!(embed.value, "/img/pool.jpg");
        assert_eq!(embed.label.as_deref(), Some("pool.jpg"));
        assert_eq!(len, s.len());
    }

    #[test]
    fn comment_without_label_line_still_parses() {
        let (embed, len) = CommentEmbed::parse("<!-- MAP: https://maps.example/x -->\nNext").unwrap();
        assert_eq!(embed.value, "https://maps.example/x");
        assert_eq!(embed.label, None);
        assert_eq!(len, "<!-- MAP: https://maps.example/x -->\n".len());
    }

    #[test]
    fn comment_with_empty_value_is_rejected() {
        assert_eq!(CommentEmbed::parse("<!-- PHONE:  -->\n"), None);
        assert_eq!(CommentEmbed::parse("<!-- PHONE: 123"), None);
    }

    #[test]
    fn phone_encoding_round_trips() {
        let phone = PhoneEmbed {
            number: "+39 055 123".into(),
            label: "Reception".into(),
        };
        let encoded = phone.encode();
        assert_eq!(encoded, "<!-- PHONE: +39 055 123 -->\n[📞 Reception]\n");
        let (embed, len) = CommentEmbed::parse(&encoded).unwrap();
        assert_eq!(embed.label.as_deref(), Some("Reception"));
        assert_eq!(len, encoded.len());
        assert_eq!(phone.href(), "tel:+39055123");
    }

    #[test]
    fn phone_shorthand_splits_on_first_colon() {
        let (sh, len) = Shorthand::parse("[PHONE:+39 055 123:Front desk: 24h] x").unwrap();
        assert_eq!(
            sh,
            Shorthand::Phone(PhoneEmbed {
                number: "+39 055 123".into(),
                label: "Front desk: 24h".into(),
            })
        );
        assert_eq!(len, "[PHONE:+39 055 123:Front desk: 24h]".len());
    }

    #[test]
    fn map_shorthand_splits_on_last_colon() {
        let (sh, _) = Shorthand::parse("[MAP:https://maps.example/?q=1:Find us]").unwrap();
        assert_eq!(
            sh,
            Shorthand::Map(MapEmbed {
                url: "https://maps.example/?q=1".into(),
                label: "Find us".into(),
            })
        );
    }

    #[test]
    fn map_shorthand_without_label_keeps_scheme() {
        let (sh, _) = Shorthand::parse("[MAP:https://maps.example/x]").unwrap();
        assert_eq!(
            sh,
            Shorthand::Map(MapEmbed {
                url: "https://maps.example/x".into(),
                label: "https://maps.example/x".into(),
            })
        );
    }

    #[test]
    fn gallery_placeholder() {
        assert_eq!(GalleryPlaceholder::parse("[IMAGE_2] tail"), Some((2, 9)));
        assert_eq!(GalleryPlaceholder::parse("[IMAGE_] tail"), None);
        assert_eq!(GalleryPlaceholder::encode(7), "[IMAGE_7]");
    }

    #[test]
    fn shorthand_encoding_stays_on_one_line() {
        let map = Shorthand::Map(MapEmbed {
            url: "https://m.test/h".into(),
            label: "Hotel: [main]\nwing".into(),
        });
        let encoded = map.encode();
        assert_eq!(encoded, "[MAP:https://m.test/h:Hotel  [main  wing]");
        let (Shorthand::Map(parsed), len) = Shorthand::parse(&encoded).unwrap() else {
            panic!("expected a map shorthand");
        };
        assert_eq!(len, encoded.len());
        assert_eq!(parsed.url, "https://m.test/h");
        assert_eq!(parsed.label, "Hotel  [main  wing");

        let phone = Shorthand::Phone(PhoneEmbed {
            number: "055 1".into(),
            label: "055 1".into(),
        });
        assert_eq!(phone.encode(), "[PHONE:055 1]");
    }
}
