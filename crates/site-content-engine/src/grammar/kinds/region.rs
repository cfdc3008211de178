use std::sync::LazyLock;

use regex::Regex;

/// Shared HTML-comment sentinel delimiters used by region and embed directives.
pub struct Sentinel;

impl Sentinel {
    pub const OPEN: &'static str = "<!--";
    pub const CLOSE: &'static str = "-->";
}

static REGION_SENTINEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<!--[ \t]*(FORMAT|HEADING|LIST|QUOTE)(?::[ \t]*([A-Z0-9]+))?[ \t]*-->[ \t]*(?:\r?\n|$)")
        .expect("region sentinel pattern")
});

static BULLET_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-[ \t]+").expect("bullet item pattern"));

static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[ \t]+").expect("numbered item pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn keyword(self) -> &'static str {
        match self {
            Alignment::Left => "LEFT",
            Alignment::Center => "CENTER",
            Alignment::Right => "RIGHT",
            Alignment::Justify => "JUSTIFY",
        }
    }

    /// CSS `text-align` value.
    pub fn css(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }

    fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "LEFT" => Some(Alignment::Left),
            "CENTER" => Some(Alignment::Center),
            "RIGHT" => Some(Alignment::Right),
            "JUSTIFY" => Some(Alignment::Justify),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingLevel {
    One,
    Two,
}

impl HeadingLevel {
    pub fn number(self) -> u8 {
        match self {
            HeadingLevel::One => 1,
            HeadingLevel::Two => 2,
        }
    }

    fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "1" => Some(HeadingLevel::One),
            "2" => Some(HeadingLevel::Two),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListStyle {
    Bullet,
    Numbered,
}

impl ListStyle {
    pub fn keyword(self) -> &'static str {
        match self {
            ListStyle::Bullet => "BULLET",
            ListStyle::Numbered => "NUMBERED",
        }
    }

    /// Marker for the 1-based item `n`, including the trailing space.
    pub fn marker(self, n: usize) -> String {
        match self {
            ListStyle::Bullet => "- ".to_string(),
            ListStyle::Numbered => format!("{n}. "),
        }
    }

    /// Length of the item marker at the start of `line`, if it is an item of this style.
    pub fn item_marker_len(self, line: &str) -> Option<usize> {
        let re = match self {
            ListStyle::Bullet => &BULLET_ITEM,
            ListStyle::Numbered => &NUMBERED_ITEM,
        };
        re.find(line).map(|m| m.end())
    }

    fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "BULLET" => Some(ListStyle::Bullet),
            "NUMBERED" => Some(ListStyle::Numbered),
            _ => None,
        }
    }
}

/// Region directives: a sentinel line followed by a body.
///
/// Regions of the same kind never nest; a region body ends before the next
/// region sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Heading(HeadingLevel),
    List(ListStyle),
    Format(Alignment),
    Quote,
}

impl RegionKind {
    /// The sentinel line including its trailing newline, e.g. `<!-- HEADING:1 -->\n`.
    pub fn sentinel(self) -> String {
        let body = match self {
            RegionKind::Heading(level) => format!("HEADING:{}", level.number()),
            RegionKind::List(style) => format!("LIST:{}", style.keyword()),
            RegionKind::Format(align) => format!("FORMAT:{}", align.keyword()),
            RegionKind::Quote => "QUOTE".to_string(),
        };
        format!("{} {body} {}\n", Sentinel::OPEN, Sentinel::CLOSE)
    }

    /// Terminator written after a region body.
    pub fn terminator(self) -> &'static str {
        "\n"
    }

    /// Recognizes a region sentinel at the very start of `s`.
    ///
    /// Returns the kind and the number of bytes consumed, including the
    /// newline that ends the sentinel line. Unknown keywords, half-typed
    /// sentinels and sentinels followed by text on the same line yield `None`.
    pub fn parse_sentinel(s: &str) -> Option<(RegionKind, usize)> {
        let caps = REGION_SENTINEL.captures(s)?;
        let arg = caps.get(2).map(|m| m.as_str());
        let kind = match (&caps[1], arg) {
            ("FORMAT", Some(a)) => RegionKind::Format(Alignment::from_keyword(a)?),
            ("HEADING", Some(a)) => RegionKind::Heading(HeadingLevel::from_keyword(a)?),
            ("LIST", Some(a)) => RegionKind::List(ListStyle::from_keyword(a)?),
            ("QUOTE", None) => RegionKind::Quote,
            _ => return None,
        };
        Some((kind, caps.get(0)?.end()))
    }
}
