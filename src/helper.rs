use std::{
    fs,
    io::{BufRead, Write},
    path::Path,
    process::Command,
};

use log::{debug, info};
use shell_words::split;
use tempfile::Builder;

use crate::{Result, StickiesError};

/// Lines starting with this marker are stripped from editor output
const COMMENT_MARKER: &str = "#!";

/// Asks a yes/no question, defaulting to no
pub fn confirm(mut input: impl BufRead, mut output: impl Write, question: &str) -> Result<bool> {
    write!(output, "{} [y/N]: ", question)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// First non-empty line of `content`, cut to `max_chars` characters
pub fn content_preview(content: &str, max_chars: usize) -> String {
    let first_line = content
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("");

    if first_line.chars().count() <= max_chars {
        first_line.to_string()
    } else {
        let cut: String = first_line.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

/// Opens `editor_cmd` on a temporary file seeded with `existing` and returns
/// what the user saved, minus the instruction lines
pub fn edit_in_editor(editor_cmd: &str, heading: &str, existing: &str) -> Result<String> {
    let temp_file = Builder::new().prefix("stickies-").suffix(".txt").tempfile()?;
    let temp_path = temp_file.path().to_path_buf();

    let mut template = String::new();
    template.push_str(&format!("{} {}\n", COMMENT_MARKER, heading));
    template.push_str(&format!(
        "{} Lines starting with {} are ignored. Save and exit when done.\n",
        COMMENT_MARKER, COMMENT_MARKER
    ));
    template.push_str(existing);
    fs::write(&temp_path, template)?;

    info!("Opening editor to write note content. Save and exit when done...");
    launch_editor(editor_cmd, &temp_path)?;

    let content = fs::read_to_string(&temp_path)?;
    Ok(strip_editor_comments(&content))
}

fn launch_editor(editor_cmd: &str, file_path: &Path) -> Result<()> {
    let args = split(editor_cmd).map_err(|e| StickiesError::EditorError {
        message: format!("Failed to parse editor command: {}", e),
    })?;

    let Some((program, rest)) = args.split_first() else {
        return Err(StickiesError::EditorError {
            message: "Empty editor command".to_string(),
        });
    };

    debug!("Launching editor {} on {}", program, file_path.display());
    let status = Command::new(program).args(rest).arg(file_path).status()?;

    if !status.success() {
        return Err(StickiesError::EditorError {
            message: "Editor exited with non-zero status".to_string(),
        });
    }

    Ok(())
}

fn strip_editor_comments(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.starts_with(COMMENT_MARKER))
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}
