//! Shared types for the stickies application.
//!
//! Holds the crate-wide `Result` alias, the change events emitted by the note
//! collection and the clap subcommand definitions.
use std::path::PathBuf;

use clap::Subcommand;

use crate::{Color, NoteId, StickiesError};

/// A specialized Result type for stickies operations.
pub type Result<T> = std::result::Result<T, StickiesError>;

/// A mutation that was applied to the note collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionEvent {
    Added(NoteId),
    Updated(NoteId),
    Deleted(NoteId),
    PinToggled(NoteId),
}

impl CollectionEvent {
    /// The id of the note the event concerns
    pub fn id(&self) -> NoteId {
        match *self {
            CollectionEvent::Added(id)
            | CollectionEvent::Updated(id)
            | CollectionEvent::Deleted(id)
            | CollectionEvent::PinToggled(id) => id,
        }
    }
}

/// Available subcommands for the stickies application
#[derive(Subcommand)]
pub enum Commands {
    /// Compose a note and add it in one step
    Add {
        /// Title of the note
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// Body of the note
        #[clap(short, long)]
        content: Option<String>,

        /// Background color (name or hex, e.g. yellow or #ffeb3b)
        #[clap(long)]
        color: Option<Color>,

        /// Image file to attach
        #[clap(short, long)]
        image: Option<PathBuf>,

        /// Write the body in an editor before adding
        #[clap(short, long)]
        edit: bool,
    },

    /// Work with the note currently being composed
    #[clap(subcommand)]
    Draft(DraftCommands),

    /// List notes, pinned first
    List {
        /// Only show notes whose title or content contains this text
        #[clap(short, long)]
        search: Option<String>,

        /// Limit the number of notes shown (0 shows all)
        #[clap(short = 'n', long, default_value_t = 0)]
        limit: usize,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,

        /// Show full content instead of a preview
        #[clap(short, long)]
        detailed: bool,
    },

    /// Search notes by title or content
    Search {
        /// Search text, matched case-insensitively
        query: String,

        /// Limit the number of results (0 shows all)
        #[clap(short = 'n', long, default_value_t = 0)]
        limit: usize,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Show a single note
    Show {
        /// ID of the note
        id: u64,

        /// Format output as raw JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Edit an existing note
    Edit {
        /// ID of the note to edit
        id: u64,

        /// New title
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// New content
        #[clap(short, long)]
        content: Option<String>,

        /// New background color
        #[clap(long)]
        color: Option<Color>,

        /// Replace the attached image
        #[clap(short, long, conflicts_with = "remove_image")]
        image: Option<PathBuf>,

        /// Drop the attached image
        #[clap(long)]
        remove_image: bool,

        /// Edit the content in an editor
        #[clap(short, long, conflicts_with = "content")]
        edit: bool,
    },

    /// Change the background color of a note
    Color {
        /// ID of the note
        id: u64,

        /// New color (name or hex)
        color: Color,
    },

    /// Pin or unpin a note
    Pin {
        /// ID of the note
        id: u64,
    },

    /// Delete a note by ID
    Delete {
        /// ID of the note to delete
        id: u64,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Open the image attached to a note
    Image {
        /// ID of the note
        id: u64,

        /// Write the decoded image to this file
        #[clap(short, long)]
        output: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        /// Show current configuration
        #[clap(short = 'S', long)]
        show: bool,

        /// Update a configuration setting (key=value)
        #[clap(short, long)]
        set: Option<String>,

        /// Reset configuration to defaults
        #[clap(short, long)]
        reset: bool,
    },
}

/// Subcommands operating on the draft
#[derive(Subcommand)]
pub enum DraftCommands {
    /// Show the saved draft
    Show,

    /// Update draft fields; each change is saved immediately
    Set {
        #[clap(short = 'T', long)]
        title: Option<String>,

        #[clap(short, long)]
        content: Option<String>,

        #[clap(long)]
        color: Option<Color>,
    },

    /// Turn the draft into a note
    Submit {
        /// Image file to attach
        #[clap(short, long)]
        image: Option<PathBuf>,
    },

    /// Close the composer; only discards a draft that has no text
    Close,
}
