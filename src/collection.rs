//! The authoritative, newest-first list of committed notes.
//!
//! Every mutation rewrites the whole collection to the store and then
//! notifies subscribers.
use std::{collections::HashSet, fmt, rc::Rc};

use chrono::Utc;
use log::{debug, info, warn};
use serde_json::{Map, Value};

use crate::{
    CollectionEvent, Color, IdGenerator, KeyValueStore, Note, NoteId, NoteInput, Result, NOTES_KEY,
};

type Listener = Box<dyn FnMut(&CollectionEvent, &[Note])>;

pub struct NoteCollection {
    notes: Vec<Note>,
    ids: IdGenerator,
    store: Rc<dyn KeyValueStore>,
    listeners: Vec<Listener>,
}

impl NoteCollection {
    /// Loads the stored collection.
    ///
    /// Never fails: an unreadable collection starts empty and unreadable
    /// records are skipped, both with a warning.
    pub fn load(store: Rc<dyn KeyValueStore>) -> Self {
        let notes = match store.load(NOTES_KEY) {
            Ok(Some(value)) => parse_notes(value),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Stored notes could not be read, starting empty: {}", e);
                Vec::new()
            }
        };
        info!("Loaded {} notes", notes.len());

        Self {
            ids: IdGenerator::seeded(notes.iter().map(|n| n.id)),
            notes,
            store,
            listeners: Vec::new(),
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Registers a listener called after every effective mutation
    pub fn subscribe(&mut self, listener: impl FnMut(&CollectionEvent, &[Note]) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Creates a note from `input` and puts it at the head of the collection
    pub fn add(&mut self, input: NoteInput) -> Result<NoteId> {
        let id = self.ids.next_id()?;
        let note = Note::new(id, input, Utc::now());
        info!("Adding note {}", id);

        self.notes.insert(0, note);
        self.commit(CollectionEvent::Added(id))?;
        Ok(id)
    }

    /// Replaces the note with the given id by `replacement`.
    ///
    /// The id itself cannot change. Returns `Ok(false)` if no note matched.
    pub fn update(&mut self, id: NoteId, mut replacement: Note) -> Result<bool> {
        let Some(slot) = self.notes.iter_mut().find(|n| n.id == id) else {
            debug!("Update of unknown note {} ignored", id);
            return Ok(false);
        };

        if replacement.id != id {
            warn!(
                "Replacement for note {} carried id {}, keeping {}",
                id, replacement.id, id
            );
            replacement.id = id;
        }
        *slot = replacement;

        self.commit(CollectionEvent::Updated(id))?;
        Ok(true)
    }

    /// Removes the note with the given id. Returns `Ok(false)` if absent.
    pub fn delete(&mut self, id: NoteId) -> Result<bool> {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        if self.notes.len() == before {
            debug!("Delete of unknown note {} ignored", id);
            return Ok(false);
        }

        info!("Deleted note {}", id);
        self.commit(CollectionEvent::Deleted(id))?;
        Ok(true)
    }

    /// Flips the pin flag of one note. Returns `Ok(false)` if absent.
    pub fn toggle_pin(&mut self, id: NoteId) -> Result<bool> {
        let Some(note) = self.notes.iter_mut().find(|n| n.id == id) else {
            return Ok(false);
        };
        note.is_pinned = !note.is_pinned;
        debug!("Note {} pinned: {}", id, note.is_pinned);

        self.commit(CollectionEvent::PinToggled(id))?;
        Ok(true)
    }

    /// Writes the full collection, then notifies listeners.
    /// Listeners run even when the write fails, since memory already changed.
    fn commit(&mut self, event: CollectionEvent) -> Result<()> {
        let saved = self.persist();
        for listener in self.listeners.iter_mut() {
            listener(&event, &self.notes);
        }
        saved
    }

    fn persist(&self) -> Result<()> {
        let value = serde_json::to_value(&self.notes)?;
        self.store.save(NOTES_KEY, &value)
    }
}

impl fmt::Debug for NoteCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoteCollection")
            .field("notes", &self.notes)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Turns the stored array into notes.
///
/// Older records without a color get the default color, and records without a
/// creation time are stamped with the load time.
fn parse_notes(value: Value) -> Vec<Note> {
    let Value::Array(records) = value else {
        warn!("Stored notes are not a list, starting empty");
        return Vec::new();
    };

    let loaded_at = Value::from(Utc::now().to_rfc3339());
    let mut seen = HashSet::new();
    let mut notes = Vec::with_capacity(records.len());
    for mut record in records {
        if let Value::Object(fields) = &mut record {
            backfill(fields, "color", || Value::from(String::from(Color::default())));
            backfill(fields, "createdAt", || loaded_at.clone());
        }

        match serde_json::from_value::<Note>(record) {
            Ok(note) if !seen.insert(note.id) => {
                warn!("Skipping note with duplicate id {}", note.id);
            }
            Ok(note) => notes.push(note),
            Err(e) => warn!("Skipping unreadable note record: {}", e),
        }
    }
    notes
}

/// Sets `key` when it is absent or null
fn backfill(fields: &mut Map<String, Value>, key: &str, default: impl FnOnce() -> Value) {
    let slot = fields.entry(key).or_insert(Value::Null);
    if slot.is_null() {
        *slot = default();
    }
}
