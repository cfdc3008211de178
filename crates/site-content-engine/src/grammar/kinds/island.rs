use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Placement of an image relative to the surrounding text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImagePosition {
    Left,
    #[default]
    Center,
    Right,
    Full,
}

impl ImagePosition {
    pub const ALL: [ImagePosition; 4] = [
        ImagePosition::Left,
        ImagePosition::Center,
        ImagePosition::Right,
        ImagePosition::Full,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ImagePosition::Left => "left",
            ImagePosition::Center => "center",
            ImagePosition::Right => "right",
            ImagePosition::Full => "full",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for ImagePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Island width: either a pixel count (`"width":320`) or a CSS length (`"width":"50%"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageWidth {
    Pixels(u32),
    Css(String),
}

impl ImageWidth {
    /// Parses user input: bare digits become pixels, anything else is kept as CSS.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        Some(match s.parse::<u32>() {
            Ok(px) => ImageWidth::Pixels(px),
            Err(_) => ImageWidth::Css(s.to_string()),
        })
    }

    /// CSS length for a `width:` declaration.
    pub fn css(&self) -> String {
        match self {
            ImageWidth::Pixels(px) => format!("{px}px"),
            ImageWidth::Css(s) => s.clone(),
        }
    }
}

/// Structured image payload serialized inline in the document:
/// `{"type":"image","url":…,"position":…,"caption":…,"width":…}`.
///
/// `alt` is only written when set; it carries the name of images migrated
/// from the comment form, which showed it as alt text and never as a caption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageIsland {
    pub url: String,
    #[serde(default)]
    pub position: ImagePosition,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub width: Option<ImageWidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// Tagged wrapper so only `"type":"image"` payloads are accepted.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Island {
    Image(ImageIsland),
}

impl ImageIsland {
    pub const TYPE: &'static str = "image";
    pub const OPEN: u8 = b'{';

    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            position: ImagePosition::default(),
            caption: None,
            width: None,
            alt: None,
        }
    }

    /// Canonical inline encoding, with `type` first and field order fixed.
    pub fn encode(&self) -> String {
        let mut value = json!({
            "type": Self::TYPE,
            "url": self.url,
            "position": self.position,
            "caption": self.caption,
            "width": self.width,
        });
        if let Some(alt) = &self.alt {
            value["alt"] = json!(alt);
        }
        value.to_string()
    }

    /// Text for the `alt` attribute: `alt`, else the caption.
    pub fn alt_text(&self) -> &str {
        self.alt
            .as_deref()
            .or(self.caption.as_deref())
            .unwrap_or_default()
    }

    /// Recognizes an island at the start of `s`, returning it and the bytes consumed.
    ///
    /// Only objects whose first key is `"type"` are attempted; anything that
    /// fails to deserialize (truncated JSON, other types, missing url) is
    /// rejected so the caller can leave it as literal text.
    pub fn parse(s: &str) -> Option<(ImageIsland, usize)> {
        let rest = s.strip_prefix(Self::OPEN as char)?;
        if !rest.trim_start().starts_with("\"type\"") {
            return None;
        }
        let mut stream = serde_json::Deserializer::from_str(s).into_iter::<Island>();
        match stream.next() {
            Some(Ok(Island::Image(island))) if !island.url.trim().is_empty() => {
                Some((island, stream.byte_offset()))
            }
            Some(Err(e)) => {
                log::debug!("ignoring malformed image island: {e}");
                None
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn encodes_with_type_first() {
        let island = ImageIsland {
            url: "/img/a.jpg".into(),
            position: ImagePosition::Left,
            caption: Some("Lobby".into()),
            width: Some(ImageWidth::Css("50%".into())),
            alt: None,
        };
        assert_eq!(
            island.encode(),
            r#"{"type":"image","url":"/img/a.jpg","position":"left","caption":"Lobby","width":"50%"}"#
        );
    }

    #[test]
    fn parse_consumes_exactly_the_object() {
        let island = ImageIsland::new("/img/a.jpg");
        let encoded = island.encode();
        let text = format!("{encoded} trailing");
        let (parsed, len) = ImageIsland::parse(&text).unwrap();
        assert_eq!(parsed, island);
        assert_eq!(len, encoded.len());
    }

    #[test]
    fn parse_accepts_numeric_width_and_missing_fields() {
        let (parsed, _) =
            ImageIsland::parse(r#"{"type": "image", "url": "/x.png", "width": 320}"#).unwrap();
        assert_eq!(parsed.position, ImagePosition::Center);
        assert_eq!(parsed.caption, None);
        assert_eq!(parsed.width, Some(ImageWidth::Pixels(320)));
    }

    #[test]
    fn alt_is_written_only_when_set() {
        let mut island = ImageIsland::new("/lobby.jpg");
        assert!(!island.encode().contains("alt"));

        island.alt = Some("Lobby".into());
        let encoded = island.encode();
        assert!(encoded.ends_with(r#","alt":"Lobby"}"#));
        let (parsed, _) = ImageIsland::parse(&encoded).unwrap();
        assert_eq!(parsed.alt_text(), "Lobby");
        assert_eq!(parsed.caption, None);
    }

    #[test]
    fn parse_rejects_other_payloads() {
        assert!(ImageIsland::parse(r#"{"type":"video","url":"/x.mp4"}"#).is_none());
        assert!(ImageIsland::parse(r#"{"url":"/x.png","type":"image"}"#).is_none());
        assert!(ImageIsland::parse(r#"{"type":"image","url":"/x.png""#).is_none());
        assert!(ImageIsland::parse(r#"{"type":"image","url":""}"#).is_none());
        assert!(ImageIsland::parse("{ not json").is_none());
    }

    #[test]
    fn position_parsing_is_case_insensitive() {
        assert_eq!(ImagePosition::parse("FULL"), Some(ImagePosition::Full));
        assert_eq!(ImagePosition::parse(" right "), Some(ImagePosition::Right));
        assert_eq!(ImagePosition::parse("top"), None);
    }

    #[test]
    fn width_parsing() {
        assert_eq!(ImageWidth::parse("320"), Some(ImageWidth::Pixels(320)));
        assert_eq!(ImageWidth::parse("40%"), Some(ImageWidth::Css("40%".into())));
        assert_eq!(ImageWidth::parse("  "), None);
        assert_eq!(ImageWidth::Pixels(320).css(), "320px");
    }
}
