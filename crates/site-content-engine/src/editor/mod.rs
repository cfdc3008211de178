//! # Command layer
//!
//! [`Editor`] owns a [`Document`], its [`History`] and the image [`Gallery`],
//! and maps the toolbar vocabulary ([`EditorCommand`]) onto them. Every
//! committed mutation pushes exactly one history snapshot and notifies the
//! [`EditorHost`].
//!
//! Commands that need operator input (link, phone, map, image) either run
//! against a synchronous [`MetadataPrompt`] via [`Editor::execute_with`], or
//! in two phases via [`Editor::open_dialog`] and [`Editor::confirm_dialog`]
//! for event-driven front-ends. Cancelling never touches the document.

pub mod command;
pub mod prompt;

pub use command::{CommandParseError, EditorCommand};
pub use prompt::{Dialog, Metadata, MetadataPrompt, MetadataRequest, NoPrompt};

use crate::{
    editing::{Cmd, Document, History, HistorySnapshot, Patch, Selection},
    gallery::{Gallery, ImageDescriptor},
    grammar::Directive,
    parsing::{Encoding, line_break_at, nth_image_embed, parse_blocks},
    render::render,
};

/// Receives notifications from an [`Editor`].
pub trait EditorHost {
    /// Called after every commit with the full new content.
    fn on_change(&mut self, _content: &str) {}

    /// Called when an image enters the gallery.
    fn on_image_add(&mut self, _image: &ImageDescriptor) {}
}

/// A host that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHost;

impl EditorHost for NoopHost {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorOptions {
    /// Maximum number of history snapshots; `None` keeps everything.
    pub history_limit: Option<usize>,
}

/// Result of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The document changed and a snapshot was committed.
    Applied(Patch),
    /// The operator cancelled; nothing changed.
    Cancelled,
    /// Nothing to do (undo at the oldest snapshot, out-of-range index, ...).
    Unchanged,
}

impl CommandOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, CommandOutcome::Applied(_))
    }
}

pub struct Editor<H: EditorHost = NoopHost> {
    document: Document,
    history: History,
    gallery: Gallery,
    host: H,
    /// Typing since the last commit; committed as one snapshot.
    batch_open: bool,
}

impl Editor<NoopHost> {
    pub fn new(content: &str) -> Self {
        Self::with_host(content, NoopHost, EditorOptions::default())
    }
}

impl<H: EditorHost> Editor<H> {
    pub fn with_host(content: &str, host: H, options: EditorOptions) -> Self {
        let document = Document::from_text(content);
        let history = History::with_limit(snapshot_of(&document), options.history_limit);
        Self {
            document,
            history,
            gallery: Gallery::new(),
            host,
            batch_open: false,
        }
    }

    /// Replaces the gallery with host data. Does not notify the host.
    pub fn with_gallery(mut self, gallery: Gallery) -> Self {
        self.gallery = gallery;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn content(&self) -> String {
        self.document.text()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn selection(&self) -> Selection {
        self.document.selection_snapshot()
    }

    pub fn set_selection(&mut self, range: std::ops::Range<usize>) {
        self.document.set_selection(range);
    }

    /// Renders the current content with the current gallery.
    pub fn render(&self) -> String {
        render(&self.content(), self.gallery.images())
    }

    /// Runs a command. Commands that need metadata are cancelled.
    pub fn execute(&mut self, command: EditorCommand) -> CommandOutcome {
        self.execute_with(command, &mut NoPrompt)
    }

    /// Runs a command, asking `prompt` for metadata when needed.
    pub fn execute_with<P>(&mut self, command: EditorCommand, prompt: &mut P) -> CommandOutcome
    where
        P: MetadataPrompt + ?Sized,
    {
        match command {
            EditorCommand::Undo => return self.undo(),
            EditorCommand::Redo => return self.redo(),
            _ => {}
        }
        if let Some(dialog) = self.open_dialog(command) {
            return match prompt.prompt(&dialog.request) {
                Some(metadata) => self.confirm_dialog(dialog, metadata),
                None => {
                    log::debug!("{command} cancelled");
                    CommandOutcome::Cancelled
                }
            };
        }
        match command.directive() {
            Some(directive) => {
                self.end_batch();
                let selection = self.document.selection_snapshot();
                let patch = self.apply_directive(&directive, &selection);
                self.commit(patch)
            }
            None => CommandOutcome::Unchanged,
        }
    }

    /// Opens a metadata dialog anchored at the current selection.
    ///
    /// Returns `None` for commands that need no metadata. Pending typing is
    /// committed first so the anchor refers to settled content.
    pub fn open_dialog(&mut self, command: EditorCommand) -> Option<Dialog> {
        let anchor = self.document.selection_snapshot();
        let request = command.metadata_request(&anchor.text)?;
        self.end_batch();
        Some(Dialog {
            command,
            request,
            anchor,
        })
    }

    /// Completes a dialog. Mismatched or incomplete metadata cancels.
    pub fn confirm_dialog(&mut self, dialog: Dialog, metadata: Metadata) -> CommandOutcome {
        if !dialog.request.accepts(&metadata) {
            log::warn!(
                "{} dialog answered with mismatched metadata, cancelling",
                dialog.command
            );
            return CommandOutcome::Cancelled;
        }
        let Some(directive) = metadata.into_directive() else {
            log::debug!("{} dialog left a required field blank", dialog.command);
            return CommandOutcome::Cancelled;
        };
        self.end_batch();

        let at = dialog.anchor.start;
        let patch = match &directive {
            Directive::Link { .. } => self.apply_directive(&directive, &dialog.anchor),
            _ => {
                let text = match directive.encode_shorthand() {
                    Some(shorthand) if self.in_line_bound_region(at) => shorthand,
                    _ => directive.encode(""),
                };
                self.document.insert_at_cursor(&text, at)
            }
        };
        if let Directive::ImageIsland(island) = &directive {
            let image = ImageDescriptor::from_island(island);
            let index = self.gallery.add(image);
            if let Some(image) = self.gallery.get(index) {
                self.host.on_image_add(image);
            }
        }
        self.commit(patch)
    }

    /// Replaces the selection with typed text. Part of the open batch; no
    /// snapshot is taken until [`Editor::end_batch`].
    pub fn type_text(&mut self, text: &str) -> Patch {
        self.batch_open = true;
        let range = self.document.selection();
        self.document.apply(Cmd::ReplaceRange {
            range,
            text: text.to_string(),
        })
    }

    /// Deletes the selection, or the character before the caret. Part of the
    /// open batch.
    pub fn erase(&mut self) -> Patch {
        let range = self.document.selection();
        let range = if range.is_empty() {
            let caret = range.start;
            let text = self.document.slice(0..caret);
            let prev = text.chars().next_back().map_or(0, char::len_utf8);
            (caret - prev)..caret
        } else {
            range
        };
        if !range.is_empty() {
            self.batch_open = true;
        }
        self.document.apply(Cmd::DeleteRange { range })
    }

    /// Commits pending typing as one snapshot. Returns whether anything was committed.
    pub fn end_batch(&mut self) -> bool {
        if !self.batch_open {
            return false;
        }
        self.batch_open = false;
        if self.document.text() == self.history.current().content {
            return false;
        }
        self.push_snapshot();
        self.notify_change();
        true
    }

    /// Replaces the whole content with the host's edited text, as one batch.
    pub fn set_content(&mut self, content: &str) -> CommandOutcome {
        self.end_batch();
        if self.document.text() == content {
            return CommandOutcome::Unchanged;
        }
        let patch = self.document.apply(Cmd::ReplaceRange {
            range: 0..self.document.len(),
            text: content.to_string(),
        });
        self.commit(patch)
    }

    pub fn undo(&mut self) -> CommandOutcome {
        self.end_batch();
        let Some(snapshot) = self.history.undo().cloned() else {
            return CommandOutcome::Unchanged;
        };
        self.restore(&snapshot)
    }

    pub fn redo(&mut self) -> CommandOutcome {
        self.end_batch();
        let Some(snapshot) = self.history.redo().cloned() else {
            return CommandOutcome::Unchanged;
        };
        self.restore(&snapshot)
    }

    /// Adds an image to the gallery without touching the content.
    pub fn add_image(&mut self, image: ImageDescriptor) -> usize {
        let index = self.gallery.add(image);
        if let Some(image) = self.gallery.get(index) {
            self.host.on_image_add(image);
        }
        index
    }

    pub fn move_image_up(&mut self, index: usize) -> bool {
        self.gallery.move_up(index)
    }

    pub fn move_image_down(&mut self, index: usize) -> bool {
        self.gallery.move_down(index)
    }

    pub fn toggle_image_insert(&mut self, index: usize) -> bool {
        self.gallery.toggle_insert_in_content(index)
    }

    /// Removes gallery image `index` and the `index`-th image embed in the
    /// content. Out-of-range indices are no-ops.
    pub fn delete_gallery_image(&mut self, index: usize) -> CommandOutcome {
        if self.gallery.remove(index).is_none() {
            return CommandOutcome::Unchanged;
        }
        self.end_batch();
        let content = self.content();
        let Some(occurrence) = nth_image_embed(&content, index) else {
            log::debug!("gallery image {index} had no embed in the content");
            return CommandOutcome::Unchanged;
        };
        // Islands are inserted on their own line; take the line break with them.
        let mut range = occurrence.span.range();
        if occurrence.encoding == Encoding::Island
            && (range.start == 0 || content[..range.start].ends_with('\n'))
        {
            range.end += line_break_at(&content, range.end);
        }
        let patch = self.document.apply(Cmd::DeleteRange { range });
        self.commit(patch)
    }

    /// Inserts every flagged gallery image at the caret, in one mutation.
    pub fn insert_from_gallery(&mut self) -> CommandOutcome {
        let islands = self.gallery.take_pending_insertions();
        if islands.is_empty() {
            return CommandOutcome::Unchanged;
        }
        self.end_batch();
        let text: String = islands.iter().map(|i| i.encode() + "\n").collect();
        let at = self.document.selection().start;
        let patch = self.document.insert_at_cursor(&text, at);
        self.commit(patch)
    }

    /// Whether `at` lies in a heading or list, where a multi-line embed would
    /// end the region early.
    fn in_line_bound_region(&self, at: usize) -> bool {
        let content = self.content();
        parse_blocks(&content)
            .iter()
            .any(|b| b.is_line_bound() && b.contains(&content, at))
    }

    fn apply_directive(&mut self, directive: &Directive, selection: &Selection) -> Patch {
        if let Some((open, close)) = directive.markers() {
            return self.document.wrap_selection(&open, &close, selection);
        }
        let body = self.document.slice(selection.range());
        let encoded = directive.encode(&body);
        let mut patch = self.document.apply(Cmd::ReplaceRange {
            range: selection.range(),
            text: encoded,
        });
        if matches!(directive, Directive::List(_)) {
            // Caret at the end of the last item, before its newline.
            let caret = patch.new_selection.end.saturating_sub(1);
            self.document.set_selection(caret..caret);
            patch.new_selection = self.document.selection();
        }
        patch
    }

    fn restore(&mut self, snapshot: &HistorySnapshot) -> CommandOutcome {
        let patch = self.document.restore(snapshot);
        self.notify_change();
        CommandOutcome::Applied(patch)
    }

    fn commit(&mut self, patch: Patch) -> CommandOutcome {
        self.batch_open = false;
        self.push_snapshot();
        self.notify_change();
        CommandOutcome::Applied(patch)
    }

    fn push_snapshot(&mut self) {
        self.history.push(snapshot_of(&self.document));
    }

    fn notify_change(&mut self) {
        let content = self.document.text();
        self.host.on_change(&content);
    }
}

fn snapshot_of(document: &Document) -> HistorySnapshot {
    HistorySnapshot::new(document.text(), document.selection())
}
