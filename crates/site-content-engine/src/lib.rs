pub mod editing;
pub mod editor;
pub mod gallery;
pub mod grammar;
pub mod io;
pub mod normalize;
pub mod parsing;
pub mod render;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{Cmd, Document, History, HistorySnapshot, Patch, Selection};
pub use editor::{
    CommandOutcome, Dialog, Editor, EditorCommand, EditorHost, EditorOptions, Metadata,
    MetadataPrompt, MetadataRequest, NoopHost,
};
pub use gallery::{Gallery, ImageDescriptor};
pub use grammar::{Directive, ImageIsland, ImagePosition, ImageWidth};
pub use normalize::{Normalized, normalize_legacy};
pub use render::render;
