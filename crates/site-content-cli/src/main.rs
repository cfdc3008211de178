mod app;

use anyhow::{Context, Result};
use app::{Action, App, Mode};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use site_content_config::{Config, EditorSettings};
use site_content_engine::{io, normalize_legacy, render};
use std::{
    io::{Stdout, stdout},
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(name = "site-content", version, about = "Edit and render rich site content")]
struct Cli {
    /// Config file to use instead of ~/.config/site-content/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file pointing at a content directory
    Init {
        content_path: PathBuf,
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Open a document in the terminal editor
    Edit {
        document: PathBuf,
        /// Gallery JSON stored next to the document
        #[arg(long)]
        gallery: Option<PathBuf>,
    },
    /// Print a document as HTML
    Render {
        document: PathBuf,
        /// Gallery JSON resolving [IMAGE_n] placeholders
        #[arg(long)]
        gallery: Option<PathBuf>,
    },
    /// Rewrite legacy shorthand and image comment embeds
    Normalize {
        document: PathBuf,
        /// Write the result back instead of printing it
        #[arg(long)]
        write: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = match (&cli.command, &cli.config) {
        (Commands::Init { .. }, _) => None,
        (_, Some(path)) => Config::load_from_path(path)?,
        (_, None) => Config::load()?,
    };
    if let Some(config) = &config {
        log::info!("content path: {}", config.content_path.display());
    }
    let resolve = |path: &PathBuf| resolve_path(config.as_ref(), path);

    match &cli.command {
        Commands::Init {
            content_path,
            force,
        } => {
            let path = init(cli.config.as_deref(), content_path, *force)?;
            eprintln!("Wrote {}", path.display());
            Ok(())
        }
        Commands::Edit { document, gallery } => {
            let settings = config.as_ref().map(|c| c.editor.clone()).unwrap_or_default();
            edit(resolve(document), gallery.as_ref().map(resolve), &settings)
        }
        Commands::Render { document, gallery } => {
            let content = io::read_content(&resolve(document))?;
            let images = match gallery {
                Some(path) => io::read_gallery(&resolve(path))?,
                None => vec![],
            };
            println!("{}", render(&content, &images));
            Ok(())
        }
        Commands::Normalize { document, write } => {
            let path = resolve(document);
            let content = io::read_content(&path)?;
            let normalized = normalize_legacy(&content);
            if *write {
                io::write_content(&path, &normalized.content)?;
                eprintln!(
                    "Rewrote {} embed(s) in {}",
                    normalized.rewritten,
                    path.display()
                );
            } else {
                print!("{}", normalized.content);
            }
            Ok(())
        }
    }
}

/// Writes a fresh config to `config_path`, or the default location.
fn init(config_path: Option<&Path>, content_path: &Path, force: bool) -> Result<PathBuf> {
    let path = config_path.map_or_else(Config::config_path, Path::to_path_buf);
    if path.exists() && !force {
        anyhow::bail!("{} already exists, pass --force to replace it", path.display());
    }
    let config = Config::new(std::path::absolute(content_path)?);
    match config_path {
        Some(config_path) => config.save_to_path(config_path)?,
        None => config.save()?,
    }
    log::info!("content path: {}", config.content_path.display());
    Ok(path)
}

/// Relative paths are taken from the configured content directory.
fn resolve_path(config: Option<&Config>, path: &Path) -> PathBuf {
    match config {
        Some(config) => config.resolve(path),
        None => path.to_path_buf(),
    }
}

fn edit(document: PathBuf, gallery: Option<PathBuf>, settings: &EditorSettings) -> Result<()> {
    let mut app = App::open(document.clone(), gallery, settings)
        .with_context(|| format!("opening {}", document.display()))?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && app.handle_key(key) == Action::Quit
        {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)].as_ref())
        .split(f.area());
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)].as_ref())
        .split(rows[0]);
    let panes = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(columns[0]);

    // Source panel
    let dirty = if app.is_dirty() { " *" } else { "" };
    let title = format!("{}{dirty}", app.document_path().display());
    let source = Paragraph::new(source_lines(app))
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    f.render_widget(source, panes[0]);

    // Preview panel
    let preview = Paragraph::new(app.editor.render())
        .block(Block::default().borders(Borders::ALL).title("HTML"))
        .wrap(Wrap { trim: false });
    f.render_widget(preview, panes[1]);

    // Gallery panel
    let images: Vec<ListItem> = app
        .editor
        .gallery()
        .images()
        .iter()
        .enumerate()
        .map(|(i, image)| {
            let flag = if image.insert_in_content { "[x]" } else { "[ ]" };
            let style = if i == app.gallery_cursor {
                Style::default().bg(Color::Yellow).fg(Color::Black)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(
                format!("{flag} {} {} ({})", i + 1, image.url, image.position),
                style,
            )))
        })
        .collect();
    let gallery = List::new(images).block(Block::default().borders(Borders::ALL).title("Gallery"));
    f.render_widget(gallery, columns[1]);

    // Instructions
    let help = vec![
        Line::from(Span::raw(
            "Alt-b/i/u: Style | Alt-1/2: Heading | Alt-l/n: List | Alt-a/c/r/j: Align | Alt-q: Quote | Alt-k: Link | Alt-p/m/g: Phone/Map/Image",
        )),
        Line::from(Span::raw(format!(
            "Ctrl-z/y: Undo/Redo | Ctrl-s: Save | Esc: Quit | F2-F8: Gallery | {}",
            app.status
        ))),
    ];
    f.render_widget(Paragraph::new(help), rows[1]);

    if let Mode::Prompt(prompt) = &app.mode {
        let area = centered(f.area(), 60, prompt.fields.len() as u16 + 2);
        let lines: Vec<Line> = prompt
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let style = if i == prompt.focus {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::styled(format!("{}: ", field.label), style),
                    Span::raw(field.value.clone()),
                ])
            })
            .collect();
        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(prompt.title())),
            area,
        );
    }
}

/// Source text with the selection (or caret) highlighted.
fn source_lines(app: &App) -> Vec<Line<'static>> {
    let content = app.editor.content();
    let selection = app.editor.document().selection();
    let (start, end) = if selection.is_empty() {
        let caret = app.caret();
        let next = content[caret..]
            .chars()
            .next()
            .filter(|c| *c != '\n')
            .map_or(caret, |c| caret + c.len_utf8());
        (caret, next)
    } else {
        (selection.start, selection.end)
    };
    let highlight = Style::default().add_modifier(Modifier::REVERSED);

    let mut lines = vec![];
    let mut offset = 0;
    for raw in content.split('\n') {
        let line_end = offset + raw.len();
        let a = start.clamp(offset, line_end) - offset;
        let b = end.clamp(offset, line_end) - offset;
        let mut spans = vec![Span::raw(raw[..a].to_string())];
        if a < b {
            spans.push(Span::styled(raw[a..b].to_string(), highlight));
        } else if selection.is_empty() && (offset..=line_end).contains(&start) && a == b {
            spans.push(Span::styled(" ", highlight));
        }
        spans.push(Span::raw(raw[b..].to_string()));
        lines.push(Line::from(spans));
        offset = line_end + 1;
    }
    lines
}

fn centered(area: Rect, width_pct: u16, height: u16) -> Rect {
    let width = area.width * width_pct / 100;
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height: height.min(area.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn init_writes_a_loadable_config() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("conf").join("config.toml");
        let content = temp.path().join("pages");

        let written = init(Some(&config_path), &content, false).unwrap();
        assert_eq!(written, config_path);

        let config = Config::load_from_path(&config_path).unwrap().unwrap();
        assert_eq!(config.content_path, content);
        assert_eq!(config.resolve(Path::new("home.txt")), content.join("home.txt"));
    }

    #[test]
    fn init_keeps_existing_config_unless_forced() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        init(Some(&config_path), &temp.path().join("old"), false).unwrap();

        assert!(init(Some(&config_path), &temp.path().join("new"), false).is_err());
        let config = Config::load_from_path(&config_path).unwrap().unwrap();
        assert_eq!(config.content_path, temp.path().join("old"));

        init(Some(&config_path), &temp.path().join("new"), true).unwrap();
        let config = Config::load_from_path(&config_path).unwrap().unwrap();
        assert_eq!(config.content_path, temp.path().join("new"));
    }

    #[test]
    fn relative_paths_resolve_against_config() {
        let config = Config::new("/srv/site");
        assert_eq!(
            resolve_path(Some(&config), Path::new("home.txt")),
            PathBuf::from("/srv/site/home.txt")
        );
        assert_eq!(
            resolve_path(None, Path::new("home.txt")),
            PathBuf::from("home.txt")
        );
    }
}
