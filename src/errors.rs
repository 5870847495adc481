//! Error types for the stickies application.
//!
//! This module defines the error categories that can surface while managing
//! notes, drafts and their persisted state.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the stickies application.
#[derive(Error, Debug)]
pub enum StickiesError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A durable write for a storage key failed.
    #[error("Failed to save '{key}': {source}")]
    StorageWrite {
        key: String,
        #[source]
        source: io::Error,
    },

    /// Note was not found when performing an operation.
    #[error("Note not found: {id}")]
    NoteNotFound { id: u64 },

    /// No id is left above the largest one in use.
    #[error("No note ids left after {last}")]
    IdsExhausted { last: u64 },

    /// The attached image is not a usable data URI or file.
    #[error("Invalid image: {message}")]
    InvalidImage { message: String },

    /// The given value is not part of the color palette.
    #[error("Unknown color: {value}")]
    InvalidColor { value: String },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {path}")]
    DirectoryError { path: PathBuf },

    #[error("{message}")]
    EditorError { message: String },
}
