use std::{fs, rc::Rc};

use serde_json::{json, Value};
use stickies::{
    App, Board, Color, Commands, Config, DraftCommands, FileStore, KeyValueStore, NoteInput,
    DRAFT_KEY, NOTES_KEY,
};
use tempfile::TempDir;

fn open(dir: &TempDir) -> Board {
    Board::open(Rc::new(FileStore::open(dir.path()).unwrap()))
}

fn app(dir: &TempDir) -> App {
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        editor_command: None,
    };
    App::new(open(dir), config, dir.path().join("config.json"))
}

fn stored_notes(dir: &TempDir) -> Value {
    FileStore::open(dir.path())
        .unwrap()
        .load(NOTES_KEY)
        .unwrap()
        .unwrap()
}

#[test]
fn notes_survive_restart() {
    let dir = tempfile::tempdir().unwrap();

    let (first, second) = {
        let mut board = open(&dir);
        let first = board
            .notes_mut()
            .add(NoteInput {
                title: "Milk".into(),
                content: "Buy 2%".into(),
                color: Color::White,
                image: None,
            })
            .unwrap();
        let second = board
            .notes_mut()
            .add(NoteInput {
                title: "Call mom".into(),
                color: Color::Pink,
                ..Default::default()
            })
            .unwrap();
        board.notes_mut().toggle_pin(first).unwrap();
        (first, second)
    };

    let board = open(&dir);
    let ids: Vec<_> = board.notes().notes().iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![second, first]);
    assert!(board.notes().get(first).unwrap().is_pinned);
    assert_eq!(board.notes().get(second).unwrap().color, Color::Pink);

    let visible: Vec<_> = board.visible().iter().map(|n| n.id).collect();
    assert_eq!(visible, vec![first, second]);
}

#[test]
fn stored_layout_uses_original_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let mut board = open(&dir);
    board
        .notes_mut()
        .add(NoteInput {
            title: "T".into(),
            ..Default::default()
        })
        .unwrap();

    let notes = stored_notes(&dir);
    let record = &notes[0];
    assert_eq!(record["title"], json!("T"));
    assert_eq!(record["color"], json!("#fff"));
    assert_eq!(record["isPinned"], json!(false));
    assert_eq!(record["image"], Value::Null);
    assert!(record["createdAt"].as_str().is_some_and(|s| !s.is_empty()));
    assert!(record["id"].is_u64());
}

#[test]
fn legacy_records_without_color_load() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("keepNotes.json"),
        r#"[{"id":1712345678901,"title":"old","content":"from before colors","createdAt":"2024-04-05T19:34:38.901Z","isPinned":false}]"#,
    )
    .unwrap();

    let board = open(&dir);
    let note = board.notes().get(1712345678901).unwrap();
    assert_eq!(note.color, Color::White);
    assert_eq!(note.content, "from before colors");
}

#[test]
fn corrupt_collection_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("keepNotes.json"), "[{ truncated").unwrap();

    let mut board = open(&dir);
    assert!(board.notes().is_empty());
    board
        .notes_mut()
        .add(NoteInput {
            content: "fresh".into(),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(stored_notes(&dir).as_array().unwrap().len(), 1);
}

#[test]
fn draft_survives_restart_until_submitted() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(&dir);
    app.run(Commands::Draft(DraftCommands::Set {
        title: Some("Half".into()),
        content: None,
        color: Some(Color::Green),
    }))
    .unwrap();

    let mut app = self::app(&dir);
    assert!(app.board().draft().is_expanded());
    assert_eq!(app.board().draft().title(), "Half");
    assert_eq!(app.board().draft().color(), Color::Green);

    app.run(Commands::Draft(DraftCommands::Submit { image: None }))
        .unwrap();
    assert_eq!(app.board().notes().len(), 1);
    assert!(FileStore::open(dir.path())
        .unwrap()
        .load(DRAFT_KEY)
        .unwrap()
        .is_none());
}

#[test]
fn cli_flow_add_pin_color_delete() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(&dir);

    app.run(Commands::Add {
        title: Some("Milk".into()),
        content: Some("Buy 2%".into()),
        color: None,
        image: None,
        edit: false,
    })
    .unwrap();
    app.run(Commands::Add {
        title: None,
        content: None,
        color: None,
        image: None,
        edit: false,
    })
    .unwrap();
    assert_eq!(app.board().notes().len(), 1);

    let id = app.board().notes().notes()[0].id;
    app.run(Commands::Pin { id }).unwrap();
    app.run(Commands::Color {
        id,
        color: Color::Black,
    })
    .unwrap();
    let note = app.board().notes().get(id).unwrap();
    assert!(note.is_pinned);
    assert_eq!(note.color, Color::Black);

    assert!(app.run(Commands::Pin { id: id + 1 }).is_err());

    app.run(Commands::Delete { id, force: true }).unwrap();
    assert!(app.board().notes().is_empty());
    assert_eq!(stored_notes(&dir), json!([]));
}

#[test]
fn image_attachment_round_trips_through_cli() {
    let dir = tempfile::tempdir().unwrap();
    let picture = dir.path().join("pic.png");
    fs::write(&picture, [0x89, b'P', b'N', b'G']).unwrap();

    let mut app = app(&dir);
    app.run(Commands::Add {
        title: None,
        content: None,
        color: None,
        image: Some(picture),
        edit: false,
    })
    .unwrap();
    let id = app.board().notes().notes()[0].id;

    let out = dir.path().join("out.png");
    app.run(Commands::Image {
        id,
        output: Some(out.clone()),
    })
    .unwrap();
    assert_eq!(fs::read(&out).unwrap(), vec![0x89, b'P', b'N', b'G']);
    assert!(app.board().enlarged().is_none());

    let stored = stored_notes(&dir);
    assert!(stored[0]["image"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
}
