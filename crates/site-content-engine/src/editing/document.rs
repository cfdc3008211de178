use std::ops::Range;

use xi_rope::{Rope, delta::DeltaElement};

use crate::editing::{Cmd, HistorySnapshot, Patch, Selection};

/// The content being edited.
///
/// The whole content string lives in one `xi_rope::Rope`, which is the only
/// source of truth: directive tokens are plain text inside it, and saving
/// writes the rope bytes back verbatim. Every change goes through
/// [`Document::apply`], which compiles a [`Cmd`] into a delta.
///
/// ```rust
/// # use site_content_engine::editing::{Cmd, Document};
/// let mut doc = Document::from_text("hello world");
/// let patch = doc.apply(Cmd::WrapSelection {
///     range: 0..5,
///     open: "**".to_string(),
///     close: "**".to_string(),
/// });
/// assert_eq!(doc.text(), "**hello** world");
/// assert_eq!(patch.new_selection, 0..9);
/// ```
#[derive(Clone)]
pub struct Document {
    pub(crate) buffer: Rope,
    /// Current selection as byte offsets into `buffer`.
    pub(crate) selection: Range<usize>,
    /// Incremented on every edit.
    pub(crate) version: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document.
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// Seeds a document from host-supplied content. The caret starts at the end.
    pub fn from_text(text: &str) -> Self {
        let buffer = Rope::from(text);
        let len = buffer.len();
        Self {
            buffer,
            selection: len..len,
            version: 0,
        }
    }

    /// Apply command to document.
    ///
    /// Offsets in `cmd` are clamped into the document first, so this never
    /// panics. The returned [`Patch`] lists the inserted ranges, the new
    /// selection and the new version.
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let cmd = cmd.clamped(self);
        let delta = crate::editing::commands::compile_command(self, &cmd);

        let mut changed = Vec::new();
        let mut cursor = 0;
        for op in delta.els.iter() {
            match op {
                DeltaElement::Copy(from, to) => {
                    cursor += to - from;
                }
                DeltaElement::Insert(inserted) => {
                    let end = cursor + inserted.len();
                    changed.push(cursor..end);
                    cursor = end;
                }
            }
        }

        self.buffer = delta.apply(&self.buffer);
        self.selection = crate::editing::commands::transform_selection_for_command(&cmd);
        self.version += 1;

        Patch {
            changed,
            new_selection: self.selection.clone(),
            version: self.version,
        }
    }

    /// Splices `text` at `position`. Everything else is unchanged byte for byte.
    pub fn insert_at_cursor(&mut self, text: &str, position: usize) -> Patch {
        self.apply(Cmd::InsertText {
            at: position,
            text: text.to_string(),
        })
    }

    /// Wraps `selection` in `open`/`close`.
    ///
    /// The wrapped body is read from the document, not from
    /// `selection.text`, which may be stale.
    pub fn wrap_selection(&mut self, open: &str, close: &str, selection: &Selection) -> Patch {
        self.apply(Cmd::WrapSelection {
            range: selection.range(),
            open: open.to_string(),
            close: close.to_string(),
        })
    }

    /// Replaces the whole content with a history snapshot.
    pub fn restore(&mut self, snapshot: &HistorySnapshot) -> Patch {
        let len = self.len();
        let mut patch = self.apply(Cmd::ReplaceRange {
            range: 0..len,
            text: snapshot.content.clone(),
        });
        self.set_selection(snapshot.selection.clone());
        patch.new_selection = self.selection.clone();
        patch
    }

    /// Get the current selection range
    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Sets the selection, clamped into the document.
    pub fn set_selection(&mut self, selection: Range<usize>) {
        let start = self.clamp_offset(selection.start);
        let end = self.clamp_offset(selection.end).max(start);
        self.selection = start..end;
    }

    /// Captures the current selection with its text.
    pub fn selection_snapshot(&self) -> Selection {
        Selection {
            start: self.selection.start,
            end: self.selection.end,
            text: self.slice(self.selection.clone()),
        }
    }

    /// Get the current version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get the current text content
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Text in `range`, clamped to the document.
    pub fn slice(&self, range: Range<usize>) -> String {
        let start = self.clamp_offset(range.start);
        let end = self.clamp_offset(range.end).max(start);
        self.buffer.slice_to_cow(start..end).into_owned()
    }

    /// Clamps `at` into `[0, len]` and moves it back to a char boundary.
    pub fn clamp_offset(&self, at: usize) -> usize {
        let mut at = at;
        if at > self.len() {
            log::debug!("clamping offset {at} to document length {}", self.len());
            at = self.len();
        }
        let text = self.buffer.slice_to_cow(0..self.len());
        while !text.is_char_boundary(at) {
            at -= 1;
        }
        at
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        // Rope nodes don't implement PartialEq
        self.text() == other.text()
            && self.selection == other.selection
            && self.version == other.version
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("text", &self.text())
            .field("selection", &self.selection)
            .field("version", &self.version)
            .finish()
    }
}
