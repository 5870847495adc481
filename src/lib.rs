//! Sticky notes library
//!
//! This library provides colored, pinnable notes with optional image
//! attachments, a persisted draft for the note being composed, and a
//! search-filtered, pinned-first view of the collection.

mod board;
mod cli;
mod collection;
mod config;
mod draft;
mod errors;
mod helper;
mod image;
mod note;
mod storage;
mod types;
mod view;

// Re-export key components
pub use board::*;
pub use cli::*;
pub use collection::*;
pub use config::*;
pub use draft::*;
pub use errors::*;
pub use helper::*;
pub use image::*;
pub use note::*;
pub use storage::*;
pub use types::*;
pub use view::*;
