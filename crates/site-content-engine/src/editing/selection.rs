use std::ops::Range;

/// A selection captured from the document: offsets plus the selected text.
///
/// `end >= start` always holds. The text is a copy taken at capture time and
/// may go stale once the document changes; mutations slice the document
/// again instead of trusting it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl Selection {
    /// An empty selection at `at`.
    pub fn caret(at: usize) -> Self {
        Self {
            start: at,
            end: at,
            text: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}
