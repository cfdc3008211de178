use pretty_assertions::assert_eq;
use rstest::rstest;
use site_content_engine::{
    Cmd, CommandOutcome, Document, Editor, EditorCommand, Gallery, ImageDescriptor, ImageIsland,
    Metadata, MetadataRequest, normalize_legacy, render,
};

const HOTEL_PAGE: &str = concat!(
    "<!-- HEADING:1 -->\n",
    "Hotel Belvedere\n",
    "Welcome to **our** *lake* house.\n",
    "\n",
    "<!-- LIST:BULLET -->\n",
    "- Pool\n",
    "- Spa\n",
    "<!-- QUOTE -->\n",
    "Best stay ever\n",
    "\n",
    "Call <!-- PHONE: 055 123 -->\n[📞 Reception]\n",
);

fn images(urls: &[&str]) -> String {
    urls.iter()
        .map(|u| ImageIsland::new(*u).encode() + "\n")
        .collect()
}

// ============ Render tests ============

#[test]
fn render_is_idempotent() {
    let gallery = vec![ImageDescriptor::new("/a.jpg")];
    let first = render(HOTEL_PAGE, &gallery);
    let second = render(HOTEL_PAGE, &gallery);
    assert_eq!(first, second);
}

#[test]
fn hotel_page_fixture() {
    insta::assert_snapshot!(
        render(HOTEL_PAGE, &[]),
        @r#"<h1>Hotel Belvedere</h1><p>Welcome to <strong>our</strong> <em>lake</em> house.</p><ul><li>Pool</li><li>Spa</li></ul><blockquote>Best stay ever</blockquote><p>Call <a href="tel:055123" class="content-phone">📞 Reception</a></p>"#
    );
}

#[rstest]
#[case::unclosed_bold("**open", "<p>**open</p>")]
#[case::broken_link("[label](", "<p>[label](</p>")]
#[case::unknown_region("<!-- FOO -->", "<p><!-- FOO --></p>")]
fn malformed_markup_renders_literally(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(render(input, &[]), expected);
}

// ============ Mutation tests ============

#[test]
fn wrap_hello_in_bold() {
    let mut doc = Document::from_text("hello world");
    doc.set_selection(0..5);
    let selection = doc.selection_snapshot();

    let patch = doc.wrap_selection("**", "**", &selection);

    assert_eq!(doc.text(), "**hello** world");
    assert_eq!(patch.new_selection, 0..9);
}

#[test]
fn splice_island_in_the_middle() {
    let island = ImageIsland::new("/pool.jpg").encode();
    let mut doc = Document::from_text("abcdef");

    let patch = doc.apply(Cmd::InsertText {
        at: 3,
        text: island.clone(),
    });

    assert_eq!(doc.text(), format!("abc{island}def"));
    let caret = 3 + island.len();
    assert_eq!(patch.new_selection, caret..caret);
    assert!(render(&doc.text(), &[]).contains(r#"<img src="/pool.jpg""#));
}

#[test]
fn out_of_range_offsets_are_clamped() {
    let mut doc = Document::from_text("abc");

    doc.apply(Cmd::InsertText {
        at: 99,
        text: "!".to_string(),
    });

    assert_eq!(doc.text(), "abc!");
}

// ============ History tests ============

#[test]
fn insert_then_undo_restores() {
    let mut editor = Editor::new("Welcome");
    editor.set_selection(0..7);

    assert!(editor.execute(EditorCommand::Bold).is_applied());
    assert_eq!(editor.content(), "**Welcome**");

    editor.undo();
    assert_eq!(editor.content(), "Welcome");
}

#[test]
fn undo_then_redo_restores() {
    let mut editor = Editor::new("Welcome");
    editor.set_selection(0..7);
    editor.execute(EditorCommand::Italic);
    let after = editor.content();

    editor.undo();
    editor.redo();

    assert_eq!(editor.content(), after);
}

#[test]
fn new_mutation_after_undo_kills_redo() {
    let mut editor = Editor::new("ab");
    editor.set_selection(0..1);
    editor.execute(EditorCommand::Bold);
    editor.set_selection(0..0);
    editor.execute(EditorCommand::Underline);

    editor.undo();
    editor.undo();
    editor.set_selection(2..2);
    editor.type_text("c");
    editor.end_batch();

    assert_eq!(editor.content(), "abc");
    assert_eq!(editor.redo(), CommandOutcome::Unchanged);
    assert_eq!(editor.content(), "abc");
}

#[test]
fn cancelled_prompt_leaves_document_and_history_alone() {
    let mut editor = Editor::new("Call us");
    let mut cancel = |_: &MetadataRequest| -> Option<Metadata> { None };

    let outcome = editor.execute_with(EditorCommand::InsertPhone, &mut cancel);

    assert_eq!(outcome, CommandOutcome::Cancelled);
    assert_eq!(editor.content(), "Call us");
    assert_eq!(editor.history().len(), 1);
}

// ============ Gallery tests ============

#[test]
fn deleting_gallery_image_removes_matching_embed() {
    let content = images(&["/a.jpg", "/b.jpg", "/c.jpg"]);
    let gallery = Gallery::from_images(vec![
        ImageDescriptor::new("/a.jpg"),
        ImageDescriptor::new("/b.jpg"),
        ImageDescriptor::new("/c.jpg"),
    ]);
    let mut editor = Editor::new(&content).with_gallery(gallery);

    assert!(editor.delete_gallery_image(1).is_applied());

    let left: Vec<&str> = editor.gallery().images().iter().map(|i| i.url.as_str()).collect();
    assert_eq!(left, vec!["/a.jpg", "/c.jpg"]);
    let a = ImageIsland::new("/a.jpg").encode();
    let c = ImageIsland::new("/c.jpg").encode();
    assert_eq!(editor.content(), format!("{a}\n{c}\n"));
}

// ============ Normalization tests ============

#[test]
fn legacy_normalization_is_idempotent() {
    let legacy = "[PHONE:055 1:Desk]\n<!-- IMAGE: /lobby.jpg -->\n[Immagine: Lobby]\n";
    let once = normalize_legacy(legacy);
    let twice = normalize_legacy(&once.content);

    assert!(once.rewritten > 0);
    assert_eq!(twice.rewritten, 0);
    assert_eq!(twice.content, once.content);
    assert_eq!(render(legacy, &[]).matches("content-phone").count(), 1);
    assert_eq!(render(&once.content, &[]), render(legacy, &[]));
}
