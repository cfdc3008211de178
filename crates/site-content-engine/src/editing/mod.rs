//! # Editing
//!
//! The document model and everything that changes it.
//!
//! - **`document`**: [`Document`], an `xi_rope::Rope` plus selection and version
//! - **`commands`**: [`Cmd`] and its compilation into rope deltas
//! - **`history`**: snapshot-based undo/redo
//! - **`patch`**: what an edit changed
//! - **`selection`**: a captured selection with its text
//!
//! `Document::apply` is the only writer. Callers decide when to commit a
//! [`HistorySnapshot`]; the editor does so once per user-visible mutation.

pub mod commands;
pub mod document;
pub mod history;
pub mod patch;
pub mod selection;

pub use commands::Cmd;
pub use document::Document;
pub use history::{History, HistorySnapshot};
pub use patch::Patch;
pub use selection::Selection;
