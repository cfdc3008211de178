use std::ops::Range;

use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

use crate::editing::Document;

/// Commands that can be applied to the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Splice `text` at `at`; the caret lands after it.
    InsertText { at: usize, text: String },
    /// Surround `range` with `open`/`close`. An empty range inserts the bare
    /// marker pair with the caret between them.
    WrapSelection {
        range: Range<usize>,
        open: String,
        close: String,
    },
    ReplaceRange { range: Range<usize>, text: String },
    DeleteRange { range: Range<usize> },
}

impl Cmd {
    /// Same command with every offset clamped and snapped to a char boundary.
    pub(crate) fn clamped(self, doc: &Document) -> Cmd {
        let range = |r: Range<usize>| {
            let start = doc.clamp_offset(r.start);
            start..doc.clamp_offset(r.end).max(start)
        };
        match self {
            Cmd::InsertText { at, text } => Cmd::InsertText {
                at: doc.clamp_offset(at),
                text,
            },
            Cmd::WrapSelection { range: r, open, close } => Cmd::WrapSelection {
                range: range(r),
                open,
                close,
            },
            Cmd::ReplaceRange { range: r, text } => Cmd::ReplaceRange {
                range: range(r),
                text,
            },
            Cmd::DeleteRange { range: r } => Cmd::DeleteRange { range: range(r) },
        }
    }
}

/// Compile a command into a delta
pub(crate) fn compile_command(doc: &Document, cmd: &Cmd) -> Delta<RopeInfo> {
    let mut builder = Builder::new(doc.len());
    match cmd {
        Cmd::InsertText { at, text } => {
            builder.replace(*at..*at, Rope::from(text));
        }
        Cmd::WrapSelection { range, open, close } => {
            let body = doc.slice(range.clone());
            builder.replace(range.clone(), Rope::from(format!("{open}{body}{close}")));
        }
        Cmd::ReplaceRange { range, text } => {
            builder.replace(range.clone(), Rope::from(text));
        }
        Cmd::DeleteRange { range } => {
            builder.delete(range.clone());
        }
    }
    builder.build()
}

/// Selection after `cmd` has been applied. Offsets refer to the new text.
pub(crate) fn transform_selection_for_command(cmd: &Cmd) -> Range<usize> {
    match cmd {
        Cmd::InsertText { at, text } => {
            let caret = at + text.len();
            caret..caret
        }
        Cmd::WrapSelection { range, open, close } => {
            if range.is_empty() {
                // Caret between the markers so typing fills them.
                let caret = range.start + open.len();
                caret..caret
            } else {
                range.start..(range.end + open.len() + close.len())
            }
        }
        Cmd::ReplaceRange { range, text } => {
            let caret = range.start + text.len();
            caret..caret
        }
        Cmd::DeleteRange { range } => range.start..range.start,
    }
}
