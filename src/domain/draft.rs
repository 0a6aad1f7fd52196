// src/domain/draft.rs
use crate::domain::{Note, NoteFields};

/// Local, unsaved copy of the selected note's title and content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub content: String,
}

impl Draft {
    pub fn from_note(note: Option<&Note>) -> Self {
        match note {
            Some(note) => Self {
                title: note.title.clone(),
                content: note.content.clone(),
            },
            None => Self::default(),
        }
    }

    /// True when the draft differs from the persisted note
    pub fn differs_from(&self, note: &Note) -> bool {
        self.title != note.title || self.content != note.content
    }

    pub fn to_fields(&self) -> NoteFields {
        NoteFields::new(self.title.clone(), self.content.clone())
    }
}
