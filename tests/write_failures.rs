use std::{fs, process::Command};

use serde_json::Value;

fn stickies(dir: &std::path::Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_stickies"));
    command
        .arg("--config")
        .arg(dir.join("config.json"))
        .arg("--data-dir")
        .arg(dir.join("data"))
        .env_remove("RUST_LOG");
    command
}

#[test]
fn unwritable_notes_fail_with_warning_and_keep_draft() {
    let dir = tempfile::tempdir().unwrap();
    // A directory where the notes file belongs makes every save fail
    fs::create_dir_all(dir.path().join("data").join("keepNotes.json")).unwrap();

    let output = stickies(dir.path())
        .args(["add", "-T", "Milk", "-c", "Buy 2%"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning:"), "stderr: {}", stderr);
    assert!(stderr.contains("keepNotes"), "stderr: {}", stderr);

    let draft: Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("data").join("noteDraft.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(draft["title"], "Milk");
    assert_eq!(draft["content"], "Buy 2%");
}

#[test]
fn successful_add_exits_cleanly() {
    let dir = tempfile::tempdir().unwrap();

    let output = stickies(dir.path())
        .args(["add", "-T", "Milk"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Note created with ID:"), "stdout: {}", stdout);
    assert!(!dir.path().join("data").join("noteDraft.json").exists());
}
