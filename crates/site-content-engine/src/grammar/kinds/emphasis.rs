/// Inline emphasis with paired, identical open/close delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emphasis {
    Bold,
    Italic,
    Underline,
}

impl Emphasis {
    pub const BOLD: &'static str = "**";
    pub const ITALIC: &'static str = "*";
    pub const UNDERLINE: &'static str = "__";

    /// Order in which the inline parser tries emphasis at a single position.
    /// Bold must precede italic since `**` also starts with `*`.
    pub const PRECEDENCE: [Emphasis; 3] = [Emphasis::Bold, Emphasis::Underline, Emphasis::Italic];

    pub fn delimiter(self) -> &'static str {
        match self {
            Emphasis::Bold => Self::BOLD,
            Emphasis::Italic => Self::ITALIC,
            Emphasis::Underline => Self::UNDERLINE,
        }
    }

    /// Finds the closing delimiter in `content` (the text after the opener).
    ///
    /// The match is non-greedy, confined to the current line, and requires at
    /// least one character of content. Italic skips over `**` pairs so that
    /// `*a **b** c*` closes on the final star.
    pub fn find_close(self, content: &str) -> Option<usize> {
        let delim = self.delimiter().as_bytes();
        let b = content.as_bytes();
        let mut i = 1;
        while i + delim.len() <= b.len() {
            if b[i - 1] == b'\n' || b[i] == b'\n' {
                return None;
            }
            if self == Emphasis::Italic && b[i..].starts_with(Self::BOLD.as_bytes()) {
                i += Self::BOLD.len();
                continue;
            }
            if b[i..].starts_with(delim) {
                return Some(i);
            }
            i += 1;
        }
        None
    }
}
