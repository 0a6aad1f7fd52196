// src/application/notes_api.rs
use crate::domain::{ApiError, Note, NoteFields, NoteId};

/// Remote note collection the controller talks to.
///
/// Each call is a single attempt; implementations do not retry.
pub trait NotesApi {
    fn list(&mut self) -> Result<Vec<Note>, ApiError>;

    fn create(&mut self, fields: &NoteFields) -> Result<Note, ApiError>;

    fn update(&mut self, id: &NoteId, fields: &NoteFields) -> Result<Note, ApiError>;

    /// Remove a note. The server may answer with no body at all.
    fn delete(&mut self, id: &NoteId) -> Result<(), ApiError>;
}
