//! Ties the controllers together the way a single screen uses them.
//!
//! The board owns the collection, the draft, the search term and the
//! enlarged image, and keeps the projected view current by listening to
//! collection changes.
use std::{
    cell::{Ref, RefCell},
    rc::Rc,
};

use log::{debug, trace};

use crate::{
    project, Color, DataUri, Draft, KeyValueStore, Note, NoteCollection, NoteId, Result,
};

/// What to do with a note's image when editing it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageChange {
    #[default]
    Keep,
    Replace(DataUri),
    Remove,
}

/// Changed fields for an edit; unset fields keep their current value
#[derive(Debug, Clone, Default)]
pub struct NoteEdit {
    pub title: Option<String>,
    pub content: Option<String>,
    pub color: Option<Color>,
    pub image: ImageChange,
}

impl NoteEdit {
    /// Merges the changes over `note`, producing a complete replacement
    pub fn apply(self, note: &Note) -> Note {
        let image = match self.image {
            ImageChange::Keep => note.image.clone(),
            ImageChange::Replace(image) => Some(image),
            ImageChange::Remove => None,
        };

        Note {
            title: self.title.unwrap_or_else(|| note.title.clone()),
            content: self.content.unwrap_or_else(|| note.content.clone()),
            color: self.color.unwrap_or(note.color),
            image,
            ..note.clone()
        }
    }
}

pub struct Board {
    notes: NoteCollection,
    draft: Draft,
    search: Rc<RefCell<String>>,
    visible: Rc<RefCell<Vec<Note>>>,
    enlarged: Option<DataUri>,
}

impl Board {
    /// Loads notes and draft from `store` and computes the initial view
    pub fn open(store: Rc<dyn KeyValueStore>) -> Self {
        let mut notes = NoteCollection::load(Rc::clone(&store));
        let draft = Draft::load(store);

        let search = Rc::new(RefCell::new(String::new()));
        let visible = Rc::new(RefCell::new(owned(project(notes.notes(), ""))));

        {
            let search = Rc::clone(&search);
            let visible = Rc::clone(&visible);
            notes.subscribe(move |event, all| {
                trace!("Recomputing view after {:?}", event);
                *visible.borrow_mut() = owned(project(all, &search.borrow()));
            });
        }

        Self {
            notes,
            draft,
            search,
            visible,
            enlarged: None,
        }
    }

    pub fn notes(&self) -> &NoteCollection {
        &self.notes
    }

    pub fn notes_mut(&mut self) -> &mut NoteCollection {
        &mut self.notes
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    /// Submits the draft into this board's collection
    pub fn submit_draft(&mut self) -> Result<Option<NoteId>> {
        self.draft.submit(&mut self.notes)
    }

    pub fn search(&self) -> String {
        self.search.borrow().clone()
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        *self.search.borrow_mut() = term.into();
        debug!("Search term set to '{}'", self.search.borrow());
        *self.visible.borrow_mut() = owned(project(self.notes.notes(), &self.search.borrow()));
    }

    /// The notes to display, pinned first and filtered by the search term
    pub fn visible(&self) -> Ref<'_, [Note]> {
        Ref::map(self.visible.borrow(), |v| v.as_slice())
    }

    /// Applies `edit` to a note as a full replacement. `Ok(false)` if absent.
    pub fn edit(&mut self, id: NoteId, edit: NoteEdit) -> Result<bool> {
        let Some(current) = self.notes.get(id) else {
            return Ok(false);
        };
        let replacement = edit.apply(current);
        self.notes.update(id, replacement)
    }

    pub fn recolor(&mut self, id: NoteId, color: Color) -> Result<bool> {
        self.edit(
            id,
            NoteEdit {
                color: Some(color),
                ..Default::default()
            },
        )
    }

    /// Shows a note's image enlarged, replacing any other.
    /// Returns false if the note has no image.
    pub fn enlarge(&mut self, id: NoteId) -> bool {
        match self.notes.get(id).and_then(|n| n.image.clone()) {
            Some(image) => {
                self.enlarged = Some(image);
                true
            }
            None => false,
        }
    }

    pub fn dismiss(&mut self) {
        self.enlarged = None;
    }

    pub fn enlarged(&self) -> Option<&DataUri> {
        self.enlarged.as_ref()
    }
}

fn owned(view: Vec<&Note>) -> Vec<Note> {
    view.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, NoteInput};

    fn board() -> Board {
        Board::open(Rc::new(MemoryStore::new()))
    }

    fn add(board: &mut Board, title: &str, content: &str) -> NoteId {
        board
            .notes_mut()
            .add(NoteInput {
                title: title.into(),
                content: content.into(),
                ..Default::default()
            })
            .unwrap()
    }

    fn visible_ids(board: &Board) -> Vec<NoteId> {
        board.visible().iter().map(|n| n.id).collect()
    }

    #[test]
    fn view_follows_collection_changes() {
        let mut board = board();
        let a = add(&mut board, "A", "");
        let b = add(&mut board, "B", "");
        assert_eq!(visible_ids(&board), vec![b, a]);

        board.notes_mut().toggle_pin(a).unwrap();
        assert_eq!(visible_ids(&board), vec![a, b]);

        board.notes_mut().delete(a).unwrap();
        assert_eq!(visible_ids(&board), vec![b]);
    }

    #[test]
    fn view_follows_search_term() {
        let mut board = board();
        let a = add(&mut board, "Milk", "");
        add(&mut board, "Bread", "");

        board.set_search("MIL");
        assert_eq!(visible_ids(&board), vec![a]);

        let c = add(&mut board, "", "almond milk");
        assert_eq!(visible_ids(&board), vec![c, a]);

        board.set_search("");
        assert_eq!(board.visible().len(), 3);
    }

    #[test]
    fn submitted_draft_shows_up() {
        let mut board = board();
        board.draft_mut().set_title("From draft").unwrap();
        let id = board.submit_draft().unwrap().unwrap();
        assert_eq!(visible_ids(&board), vec![id]);
    }

    #[test]
    fn edit_keeps_untouched_fields() {
        let mut board = board();
        let image: DataUri = "data:image/png;base64,AAAA".parse().unwrap();
        let id = board
            .notes_mut()
            .add(NoteInput {
                title: "T".into(),
                content: "C".into(),
                color: Color::Green,
                image: Some(image.clone()),
            })
            .unwrap();
        board.notes_mut().toggle_pin(id).unwrap();
        let before = board.notes().get(id).unwrap().clone();

        let changed = board
            .edit(
                id,
                NoteEdit {
                    content: Some("C2".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(changed);

        let after = board.notes().get(id).unwrap();
        assert_eq!(after.content, "C2");
        assert_eq!(after.image, Some(image));
        assert!(after.is_pinned);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.title, before.title);
        assert_eq!(after.color, Color::Green);

        board.recolor(id, Color::Black).unwrap();
        assert_eq!(board.notes().get(id).unwrap().color, Color::Black);
        assert!(!board.recolor(id + 1, Color::Black).unwrap());
    }

    #[test]
    fn image_can_be_removed_on_edit() {
        let mut board = board();
        let id = board
            .notes_mut()
            .add(NoteInput {
                image: Some("data:image/png;base64,AAAA".parse().unwrap()),
                ..Default::default()
            })
            .unwrap();

        board
            .edit(
                id,
                NoteEdit {
                    image: ImageChange::Remove,
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(board.notes().get(id).unwrap().image, None);
    }

    #[test]
    fn one_enlarged_image_at_a_time() {
        let mut board = board();
        let first: DataUri = "data:image/png;base64,AAAA".parse().unwrap();
        let second: DataUri = "data:image/gif;base64,AAAA".parse().unwrap();
        let plain = add(&mut board, "no image", "");
        let a = board
            .notes_mut()
            .add(NoteInput {
                image: Some(first.clone()),
                ..Default::default()
            })
            .unwrap();
        let b = board
            .notes_mut()
            .add(NoteInput {
                image: Some(second.clone()),
                ..Default::default()
            })
            .unwrap();

        assert!(!board.enlarge(plain));
        assert!(board.enlarged().is_none());

        assert!(board.enlarge(a));
        assert_eq!(board.enlarged(), Some(&first));
        assert!(board.enlarge(b));
        assert_eq!(board.enlarged(), Some(&second));

        board.dismiss();
        assert!(board.enlarged().is_none());
    }
}
