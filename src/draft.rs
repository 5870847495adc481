//! The note currently being composed.
//!
//! Text fields and color are saved on every change so unfinished work
//! survives a restart. The attached image lives only in memory.
use std::{fmt, rc::Rc};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    Color, DataUri, KeyValueStore, NoteCollection, NoteId, NoteInput, Result, DRAFT_KEY,
};

/// The persisted shape of a draft
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredDraft {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    color: Color,
}

pub struct Draft {
    title: String,
    content: String,
    color: Color,
    image: Option<DataUri>,
    expanded: bool,
    store: Rc<dyn KeyValueStore>,
}

impl Draft {
    /// Restores the saved draft, expanding the composer when it holds text
    pub fn load(store: Rc<dyn KeyValueStore>) -> Self {
        let saved = match store.load(DRAFT_KEY) {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!("Saved draft could not be read, discarding: {}", e);
                StoredDraft::default()
            }),
            Ok(None) => StoredDraft::default(),
            Err(e) => {
                warn!("Saved draft could not be read, discarding: {}", e);
                StoredDraft::default()
            }
        };

        let expanded = !saved.title.is_empty() || !saved.content.is_empty();
        if expanded {
            debug!("Restored unfinished draft");
        }

        Self {
            title: saved.title,
            content: saved.content,
            color: saved.color,
            image: None,
            expanded,
            store,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn image(&self) -> Option<&DataUri> {
        self.image.as_ref()
    }

    /// Whether the composer shows all fields or a single line
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn expand(&mut self) {
        self.expanded = true;
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        self.title = title.into();
        self.save()
    }

    pub fn set_content(&mut self, content: impl Into<String>) -> Result<()> {
        self.content = content.into();
        self.save()
    }

    pub fn set_color(&mut self, color: Color) -> Result<()> {
        self.color = color;
        self.save()
    }

    /// Attaches or clears the image. Not persisted.
    pub fn attach_image(&mut self, image: Option<DataUri>) {
        self.image = image;
    }

    /// A snapshot of the fields a note would be built from
    pub fn input(&self) -> NoteInput {
        NoteInput {
            title: self.title.clone(),
            content: self.content.clone(),
            color: self.color,
            image: self.image.clone(),
        }
    }

    /// Commits the draft as a new note and starts over.
    ///
    /// A draft without text or image adds nothing and returns `Ok(None)`.
    /// If the add fails the draft is kept. Once the note exists, a saved
    /// draft that cannot be removed is overwritten with an empty one, and
    /// any failure there is only logged.
    pub fn submit(&mut self, notes: &mut NoteCollection) -> Result<Option<NoteId>> {
        let input = self.input();
        if input.is_blank() {
            debug!("Ignoring submit of blank draft");
            return Ok(None);
        }

        let id = notes.add(input)?;
        info!("Draft submitted as note {}", id);

        self.title.clear();
        self.content.clear();
        self.color = Color::default();
        self.image = None;
        self.expanded = false;
        if let Err(e) = self.store.remove(DRAFT_KEY) {
            warn!("Note {} added but the saved draft could not be removed: {}", id, e);
            if let Err(e) = self.save() {
                warn!("Saved draft could not be cleared either: {}", e);
            }
        }
        Ok(Some(id))
    }

    /// Collapses and discards the draft, but only if it has no text.
    /// Returns whether the composer closed.
    pub fn close(&mut self) -> Result<bool> {
        if !self.title.trim().is_empty() || !self.content.trim().is_empty() {
            debug!("Refusing to close a draft with text");
            return Ok(false);
        }

        self.expanded = false;
        self.color = Color::default();
        self.store.remove(DRAFT_KEY)?;
        Ok(true)
    }

    fn save(&self) -> Result<()> {
        let stored = StoredDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            color: self.color,
        };
        self.store.save(DRAFT_KEY, &serde_json::to_value(stored)?)
    }
}

impl fmt::Debug for Draft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Draft")
            .field("title", &self.title)
            .field("content", &self.content)
            .field("color", &self.color)
            .field("image", &self.image.as_ref().map(|i| i.mime().to_string()))
            .field("expanded", &self.expanded)
            .finish()
    }
}
