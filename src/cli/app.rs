//! CLI module for the stickies application
//!
//! This module turns parsed commands into operations on the board and
//! prints the results.
use std::{
    fs,
    io::{stdin, stdout},
    path::{Path, PathBuf},
};

use console::style;
use log::info;

use crate::{
    confirm, content_preview, edit_in_editor, Board, Color, Commands, Config, DataUri,
    DraftCommands, ImageChange, Note, NoteEdit, NoteId, Result, StickiesError,
};

/// CLI Application handler - processes CLI commands against a board
pub struct App {
    board: Board,

    /// Application configuration
    config: Config,

    /// Where `config` was read from and is written back to
    config_path: PathBuf,
}

impl App {
    pub fn new(board: Board, config: Config, config_path: PathBuf) -> Self {
        Self {
            board,
            config,
            config_path,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Run the CLI application with the given command
    pub fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Add {
                title,
                content,
                color,
                image,
                edit,
            } => self.handle_add(title, content, color, image, edit),

            Commands::Draft(draft) => self.handle_draft(draft),

            Commands::List {
                search,
                limit,
                json,
                detailed,
            } => self.list_notes(search.unwrap_or_default(), limit, json, detailed),

            Commands::Search { query, limit, json } => {
                self.list_notes(query, limit, json, false)
            }

            Commands::Show { id, json } => self.handle_show(id, json),

            Commands::Edit {
                id,
                title,
                content,
                color,
                image,
                remove_image,
                edit,
            } => {
                let image = match (image, remove_image) {
                    (Some(path), _) => ImageChange::Replace(DataUri::from_file(&path)?),
                    (None, true) => ImageChange::Remove,
                    (None, false) => ImageChange::Keep,
                };
                self.handle_edit(id, title, content, color, image, edit)
            }

            Commands::Color { id, color } => {
                if !self.board.recolor(id, color)? {
                    return Err(StickiesError::NoteNotFound { id });
                }
                println!("Note {} is now {}", id, color);
                Ok(())
            }

            Commands::Pin { id } => {
                if !self.board.notes_mut().toggle_pin(id)? {
                    return Err(StickiesError::NoteNotFound { id });
                }
                let pinned = self.note(id)?.is_pinned;
                println!("Note {} {}", id, if pinned { "pinned" } else { "unpinned" });
                Ok(())
            }

            Commands::Delete { id, force } => self.handle_delete(id, force),

            Commands::Image { id, output } => self.handle_image(id, output),

            Commands::Config { show, set, reset } => self.handle_config(show, set, reset),
        }
    }

    fn note(&self, id: NoteId) -> Result<&Note> {
        self.board
            .notes()
            .get(id)
            .ok_or(StickiesError::NoteNotFound { id })
    }

    /// Fills the draft with the given fields and submits it
    fn handle_add(
        &mut self,
        title: Option<String>,
        content: Option<String>,
        color: Option<Color>,
        image: Option<PathBuf>,
        edit: bool,
    ) -> Result<()> {
        let color = color.map(composer_color).transpose()?;
        let image = image.as_deref().map(DataUri::from_file).transpose()?;

        let content = if edit {
            let heading = title.as_deref().unwrap_or("New note");
            let existing = content.as_deref().unwrap_or("");
            Some(edit_in_editor(
                &self.config.get_editor_command(),
                heading,
                existing,
            )?)
        } else {
            content
        };

        let draft = self.board.draft_mut();
        draft.expand();
        if let Some(title) = title {
            draft.set_title(title)?;
        }
        if let Some(content) = content {
            draft.set_content(content)?;
        }
        if let Some(color) = color {
            draft.set_color(color)?;
        }
        draft.attach_image(image);

        self.submit_and_report()
    }

    fn submit_and_report(&mut self) -> Result<()> {
        match self.board.submit_draft()? {
            Some(id) => println!("Note created with ID: {}", id),
            None => println!("Nothing to add: the note has no title, content or image."),
        }
        Ok(())
    }

    fn handle_draft(&mut self, command: DraftCommands) -> Result<()> {
        match command {
            DraftCommands::Show => {
                let draft = self.board.draft();
                if !draft.is_expanded() {
                    println!("No draft in progress.");
                    return Ok(());
                }
                println!("Title: {}", style(draft.title()).bold());
                println!("Color: {}", draft.color());
                if !draft.content().is_empty() {
                    println!("\n{}", draft.content());
                }
            }
            DraftCommands::Set {
                title,
                content,
                color,
            } => {
                let draft = self.board.draft_mut();
                draft.expand();
                if let Some(title) = title {
                    draft.set_title(title)?;
                }
                if let Some(content) = content {
                    draft.set_content(content)?;
                }
                if let Some(color) = color {
                    draft.set_color(composer_color(color)?)?;
                }
                println!("Draft saved.");
            }
            DraftCommands::Submit { image } => {
                let image = image.as_deref().map(DataUri::from_file).transpose()?;
                self.board.draft_mut().attach_image(image);
                self.submit_and_report()?;
            }
            DraftCommands::Close => {
                if self.board.draft_mut().close()? {
                    println!("Draft closed.");
                } else {
                    println!("The draft has text; submit it or clear it before closing.");
                }
            }
        }
        Ok(())
    }

    /// Lists the projected view, optionally filtered by `search`
    fn list_notes(&mut self, search: String, limit: usize, json: bool, detailed: bool) -> Result<()> {
        self.board.set_search(search);
        let visible = self.board.visible();
        let shown = if limit > 0 && visible.len() > limit {
            &visible[..limit]
        } else {
            &visible[..]
        };

        if shown.is_empty() {
            println!("No notes found matching the criteria.");
            return Ok(());
        }

        if json {
            println!("{}", serde_json::to_string_pretty(shown)?);
            return Ok(());
        }

        display_notes_text(shown, detailed);
        if shown.len() < visible.len() {
            println!(
                "\nShowing {} of {} notes. Use --limit to show more.",
                shown.len(),
                visible.len()
            );
        } else {
            println!(
                "\nFound {} note{}",
                shown.len(),
                if shown.len() == 1 { "" } else { "s" }
            );
        }
        Ok(())
    }

    fn handle_show(&self, id: NoteId, json: bool) -> Result<()> {
        let note = self.note(id)?;
        if json {
            println!("{}", serde_json::to_string_pretty(note)?);
        } else {
            display_notes_text(std::slice::from_ref(note), true);
        }
        Ok(())
    }

    fn handle_edit(
        &mut self,
        id: NoteId,
        title: Option<String>,
        content: Option<String>,
        color: Option<Color>,
        image: ImageChange,
        open_editor: bool,
    ) -> Result<()> {
        let content = if open_editor {
            let note = self.note(id)?;
            Some(edit_in_editor(
                &self.config.get_editor_command(),
                &note.title,
                &note.content,
            )?)
        } else {
            content
        };

        let edit = NoteEdit {
            title,
            content,
            color,
            image,
        };
        if !self.board.edit(id, edit)? {
            return Err(StickiesError::NoteNotFound { id });
        }

        println!("Note {} updated successfully", id);
        Ok(())
    }

    fn handle_delete(&mut self, id: NoteId, force: bool) -> Result<()> {
        let note = self.note(id)?;

        if !force {
            println!("You are about to delete the following note:");
            println!("ID:      {}", note.id);
            println!("Title:   {}", note.title);
            println!("Created: {}", note.created_at.format("%Y-%m-%d %H:%M:%S"));
            let preview = content_preview(&note.content, 100);
            if !preview.is_empty() {
                println!("\n{}", preview);
            }
            println!("\nThis action cannot be undone!");

            let question = "Are you sure you want to delete this note?";
            if !confirm(stdin().lock(), stdout(), question)? {
                println!("Deletion cancelled.");
                return Ok(());
            }
        }

        self.board.notes_mut().delete(id)?;
        println!("Note {} has been permanently deleted.", id);
        Ok(())
    }

    /// Enlarges the note's image; with `output` the decoded bytes are written there
    fn handle_image(&mut self, id: NoteId, output: Option<PathBuf>) -> Result<()> {
        self.note(id)?;
        if !self.board.enlarge(id) {
            println!("Note {} has no image.", id);
            return Ok(());
        }

        let Some(image) = self.board.enlarged() else {
            return Ok(());
        };
        match output {
            Some(path) => {
                write_image(image, &path)?;
                println!("Image written to {}", path.display());
            }
            None => {
                let size = image.decode()?.len();
                println!("{} image, {} bytes", image.mime(), size);
                println!("Use --output <file.{}> to save it.", image.extension());
            }
        }
        self.board.dismiss();
        Ok(())
    }

    fn handle_config(&mut self, show: bool, set: Option<String>, reset: bool) -> Result<()> {
        let show = show || (set.is_none() && !reset);

        if reset {
            self.config = Config::default();
            self.config.save(&self.config_path)?;
            println!("Configuration reset to defaults.");
        }

        if let Some(assignment) = set {
            self.config.set(&assignment)?;
            self.config.save(&self.config_path)?;
            println!("Configuration updated.");
        }

        if show {
            println!("Config file: {}", self.config_path.display());
            println!("{}", serde_json::to_string_pretty(&self.config)?);
        }
        Ok(())
    }
}

/// New notes may only use the composer palette
fn composer_color(color: Color) -> Result<Color> {
    if Color::COMPOSER.contains(&color) {
        Ok(color)
    } else {
        Err(StickiesError::InvalidColor {
            value: color.name().to_string(),
        })
    }
}

fn write_image(image: &DataUri, path: &Path) -> Result<()> {
    let bytes = image.decode()?;
    fs::write(path, &bytes)?;
    info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Display notes in text format
fn display_notes_text(notes: &[Note], detailed: bool) {
    let term_width = terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80);

    for (i, note) in notes.iter().enumerate() {
        if i > 0 {
            println!("{}", "-".repeat(term_width.min(50)));
        }

        let created_at = note.created_at.format("%Y-%m-%d %H:%M");
        let pin = if note.is_pinned { " [pinned]" } else { "" };
        println!(
            "ID: {} | Created: {} | {}{}",
            note.id,
            created_at,
            note.color.name(),
            style(pin).yellow()
        );
        if !note.title.is_empty() {
            println!("Title: {}", style(&note.title).bold());
        }

        if detailed {
            if !note.content.is_empty() {
                println!("\n{}", note.content);
            }
        } else {
            let preview = content_preview(&note.content, 100);
            if !preview.is_empty() {
                println!("\n{}", preview);
            }
        }

        if let Some(image) = &note.image {
            println!("{}", style(format!("[{} attached]", image.mime())).cyan());
        }
    }
}
