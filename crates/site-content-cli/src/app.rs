use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use site_content_config::EditorSettings;
use site_content_engine::{
    CommandOutcome, Dialog, Editor, EditorCommand, EditorHost, EditorOptions, Gallery,
    ImageDescriptor, ImageIsland, ImagePosition, ImageWidth, Metadata, MetadataRequest, io,
    normalize_legacy,
};
use std::path::PathBuf;

/// Tracks unsaved changes.
#[derive(Debug, Default)]
pub struct SaveTracker {
    pub dirty: bool,
}

impl EditorHost for SaveTracker {
    fn on_change(&mut self, _content: &str) {
        self.dirty = true;
    }

    fn on_image_add(&mut self, image: &ImageDescriptor) {
        log::info!("added {} to the gallery", image.url);
    }
}

pub struct Field {
    pub label: &'static str,
    pub value: String,
}

impl Field {
    fn new(label: &'static str, value: &str) -> Self {
        Self {
            label,
            value: value.to_string(),
        }
    }
}

/// Modal form collecting metadata for an open dialog.
pub struct Prompt {
    pub dialog: Dialog,
    pub fields: Vec<Field>,
    pub focus: usize,
}

impl Prompt {
    fn new(dialog: Dialog) -> Self {
        let fields = match &dialog.request {
            MetadataRequest::Link { label } => vec![
                Field::new("URL", ""),
                Field::new("Label", label.as_deref().unwrap_or_default()),
            ],
            MetadataRequest::Phone => vec![Field::new("Number", ""), Field::new("Label", "")],
            MetadataRequest::Map => vec![Field::new("URL", ""), Field::new("Label", "")],
            MetadataRequest::Image => vec![
                Field::new("URL", ""),
                Field::new("Caption", ""),
                Field::new("Position", ImagePosition::default().as_str()),
                Field::new("Width", ""),
            ],
        };
        Self {
            dialog,
            fields,
            focus: 0,
        }
    }

    pub fn title(&self) -> String {
        format!("{} (Tab: next field, Enter: confirm, Esc: cancel)", self.dialog.command)
    }

    fn value(&self, i: usize) -> String {
        self.fields
            .get(i)
            .map(|f| f.value.clone())
            .unwrap_or_default()
    }

    fn metadata(&self) -> Metadata {
        match self.dialog.request {
            MetadataRequest::Link { .. } => Metadata::Link {
                url: self.value(0),
                label: self.value(1),
            },
            MetadataRequest::Phone => Metadata::Phone {
                number: self.value(0),
                label: self.value(1),
            },
            MetadataRequest::Map => Metadata::Map {
                url: self.value(0),
                label: self.value(1),
            },
            MetadataRequest::Image => {
                let mut island = ImageIsland::new(self.value(0));
                island.caption = Some(self.value(1));
                island.position = ImagePosition::parse(&self.value(2)).unwrap_or_default();
                island.width = ImageWidth::parse(&self.value(3));
                Metadata::Image(island)
            }
        }
    }

    fn focused(&mut self) -> Option<&mut String> {
        self.fields.get_mut(self.focus).map(|f| &mut f.value)
    }

    fn is_last(&self) -> bool {
        self.focus + 1 >= self.fields.len()
    }
}

pub enum Mode {
    Normal,
    Prompt(Prompt),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

pub struct App {
    pub editor: Editor<SaveTracker>,
    pub mode: Mode,
    pub status: String,
    pub gallery_cursor: usize,
    document_path: PathBuf,
    gallery_path: Option<PathBuf>,
    /// Fixed end of a shift-selection; `caret` is the moving end.
    anchor: usize,
    caret: usize,
    quit_armed: bool,
}

impl App {
    /// Opens a document, starting empty when the file does not exist yet.
    pub fn open(
        document_path: PathBuf,
        gallery_path: Option<PathBuf>,
        settings: &EditorSettings,
    ) -> Result<Self> {
        let mut content = match io::read_content(&document_path) {
            Ok(content) => content,
            Err(io::IoError::NotFound(path)) => {
                log::info!("{} does not exist yet, starting empty", path.display());
                String::new()
            }
            Err(e) => return Err(e.into()),
        };
        if settings.normalize_on_load {
            content = normalize_legacy(&content).content;
        }
        let images = match &gallery_path {
            Some(path) if path.exists() => io::read_gallery(path)?,
            _ => vec![],
        };

        let options = EditorOptions {
            history_limit: settings.history_limit,
        };
        let editor = Editor::with_host(&content, SaveTracker::default(), options)
            .with_gallery(Gallery::from_images(images));
        Ok(Self::new(editor, document_path, gallery_path))
    }

    pub fn new(
        editor: Editor<SaveTracker>,
        document_path: PathBuf,
        gallery_path: Option<PathBuf>,
    ) -> Self {
        let mut app = Self {
            editor,
            mode: Mode::Normal,
            status: String::new(),
            gallery_cursor: 0,
            document_path,
            gallery_path,
            anchor: 0,
            caret: 0,
            quit_armed: false,
        };
        app.sync_from_editor();
        app
    }

    pub fn document_path(&self) -> &PathBuf {
        &self.document_path
    }

    pub fn is_dirty(&self) -> bool {
        self.editor.host().dirty
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if matches!(self.mode, Mode::Prompt(_)) {
            self.handle_prompt_key(key);
            return Action::Continue;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        match key.code {
            KeyCode::Esc => return self.request_quit(),
            KeyCode::Char('q') if ctrl => return self.request_quit(),
            KeyCode::Char('s') if ctrl => match self.save() {
                Ok(()) => self.status = format!("Saved {}", self.document_path.display()),
                Err(e) => self.status = format!("Save failed: {e}"),
            },
            KeyCode::Char('z') if ctrl => self.run(EditorCommand::Undo),
            KeyCode::Char('y') if ctrl => self.run(EditorCommand::Redo),
            KeyCode::Char(c) if alt => match toolbar_command(c) {
                Some(command) => self.run(command),
                None => self.status = format!("No command on Alt-{c}"),
            },
            KeyCode::Char(_) if ctrl => {}
            KeyCode::Char(c) => {
                let mut buf = [0; 4];
                self.editor.type_text(c.encode_utf8(&mut buf));
                self.sync_from_editor();
            }
            KeyCode::Enter => {
                self.editor.type_text("\n");
                self.sync_from_editor();
            }
            KeyCode::Backspace => {
                self.editor.erase();
                self.sync_from_editor();
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down
            | KeyCode::Home | KeyCode::End => self.move_caret(key.code, shift),
            KeyCode::F(n) => self.gallery_key(n),
            _ => {}
        }
        self.quit_armed = false;
        Action::Continue
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Mode::Prompt(prompt) = &mut self.mode else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                log::debug!("{} prompt dismissed", prompt.dialog.command);
                self.status = format!("{} cancelled", prompt.dialog.command);
                self.mode = Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => {
                prompt.focus = (prompt.focus + 1) % prompt.fields.len().max(1);
            }
            KeyCode::BackTab | KeyCode::Up => {
                let len = prompt.fields.len().max(1);
                prompt.focus = (prompt.focus + len - 1) % len;
            }
            KeyCode::Enter if !prompt.is_last() => prompt.focus += 1,
            KeyCode::Enter => self.confirm_prompt(),
            KeyCode::Backspace => {
                if let Some(value) = prompt.focused() {
                    value.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(value) = prompt.focused() {
                    value.push(c);
                }
            }
            _ => {}
        }
    }

    fn confirm_prompt(&mut self) {
        let Mode::Prompt(prompt) = std::mem::replace(&mut self.mode, Mode::Normal) else {
            return;
        };
        let command = prompt.dialog.command;
        let metadata = prompt.metadata();
        let outcome = self.editor.confirm_dialog(prompt.dialog, metadata);
        self.report(command, &outcome);
        self.sync_from_editor();
    }

    fn run(&mut self, command: EditorCommand) {
        if let Some(dialog) = self.editor.open_dialog(command) {
            self.mode = Mode::Prompt(Prompt::new(dialog));
            return;
        }
        let outcome = self.editor.execute(command);
        self.report(command, &outcome);
        self.sync_from_editor();
    }

    fn report(&mut self, command: EditorCommand, outcome: &CommandOutcome) {
        self.status = match outcome {
            CommandOutcome::Applied(_) => format!("{command}"),
            CommandOutcome::Cancelled => format!("{command} cancelled"),
            CommandOutcome::Unchanged => format!("{command}: nothing to do"),
        };
    }

    /// F2/F3 pick a gallery image, F4/F5 reorder it, F6 flags it for
    /// insertion, F7 inserts flagged images, F8 deletes it.
    fn gallery_key(&mut self, n: u8) {
        let len = self.editor.gallery().len();
        let i = self.gallery_cursor;
        match n {
            2 => self.gallery_cursor = i.saturating_sub(1),
            3 if i + 1 < len => self.gallery_cursor = i + 1,
            4 if self.editor.move_image_up(i) => self.gallery_cursor = i - 1,
            5 if self.editor.move_image_down(i) => self.gallery_cursor = i + 1,
            6 => {
                self.editor.toggle_image_insert(i);
            }
            7 => {
                let outcome = self.editor.insert_from_gallery();
                self.status = match outcome {
                    CommandOutcome::Applied(_) => "Inserted flagged images".to_string(),
                    _ => "No images flagged for insertion".to_string(),
                };
            }
            8 => {
                self.editor.delete_gallery_image(i);
                self.gallery_cursor = i.min(self.editor.gallery().len().saturating_sub(1));
                self.status = format!("Deleted gallery image {}", i + 1);
            }
            _ => {}
        }
        self.sync_from_editor();
    }

    fn move_caret(&mut self, code: KeyCode, extend: bool) {
        self.editor.end_batch();
        let text = self.editor.content();
        let at = self.caret;
        self.caret = match code {
            KeyCode::Left => prev_boundary(&text, at),
            KeyCode::Right => next_boundary(&text, at),
            KeyCode::Up => vertical(&text, at, true),
            KeyCode::Down => vertical(&text, at, false),
            KeyCode::Home => line_start(&text, at),
            KeyCode::End => line_end(&text, at),
            _ => at,
        };
        if !extend {
            self.anchor = self.caret;
        }
        let range = self.anchor.min(self.caret)..self.anchor.max(self.caret);
        self.editor.set_selection(range);
    }

    fn sync_from_editor(&mut self) {
        let range = self.editor.document().selection();
        self.anchor = range.start;
        self.caret = range.end;
    }

    fn request_quit(&mut self) -> Action {
        if self.is_dirty() && !self.quit_armed {
            self.quit_armed = true;
            self.status = "Unsaved changes: press again to quit, Ctrl-s to save".to_string();
            return Action::Continue;
        }
        Action::Quit
    }

    pub fn save(&mut self) -> Result<()> {
        self.editor.end_batch();
        io::write_content(&self.document_path, &self.editor.content())?;
        if let Some(path) = &self.gallery_path {
            io::write_gallery(path, self.editor.gallery().images())?;
        }
        self.editor.host_mut().dirty = false;
        log::info!("saved {}", self.document_path.display());
        Ok(())
    }
}

/// Alt-key toolbar bindings.
pub fn toolbar_command(c: char) -> Option<EditorCommand> {
    Some(match c {
        'b' => EditorCommand::Bold,
        'i' => EditorCommand::Italic,
        'u' => EditorCommand::Underline,
        '1' => EditorCommand::Heading1,
        '2' => EditorCommand::Heading2,
        'l' => EditorCommand::BulletList,
        'n' => EditorCommand::NumberedList,
        'a' => EditorCommand::AlignLeft,
        'c' => EditorCommand::AlignCenter,
        'r' => EditorCommand::AlignRight,
        'j' => EditorCommand::AlignJustify,
        'k' => EditorCommand::Link,
        'q' => EditorCommand::Quote,
        'g' => EditorCommand::InsertImage,
        'p' => EditorCommand::InsertPhone,
        'm' => EditorCommand::InsertMap,
        _ => return None,
    })
}

fn prev_boundary(text: &str, at: usize) -> usize {
    text[..at]
        .chars()
        .next_back()
        .map_or(at, |c| at - c.len_utf8())
}

fn next_boundary(text: &str, at: usize) -> usize {
    text[at..].chars().next().map_or(at, |c| at + c.len_utf8())
}

fn line_start(text: &str, at: usize) -> usize {
    text[..at].rfind('\n').map_or(0, |i| i + 1)
}

fn line_end(text: &str, at: usize) -> usize {
    text[at..].find('\n').map_or(text.len(), |i| at + i)
}

/// Caret on the previous or next line, keeping the column in characters.
fn vertical(text: &str, at: usize, up: bool) -> usize {
    let start = line_start(text, at);
    let column = text[start..at].chars().count();
    let target = if up {
        if start == 0 {
            return 0;
        }
        line_start(text, start - 1)
    } else {
        let end = line_end(text, at);
        if end == text.len() {
            return end;
        }
        end + 1
    };
    let end = line_end(text, target);
    text[target..end]
        .char_indices()
        .nth(column)
        .map_or(end, |(i, _)| target + i)
}
