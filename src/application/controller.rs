// src/application/controller.rs
use crate::application::NotesApi;
use crate::constants::{NEW_NOTE_CONTENT, NEW_NOTE_TITLE};
use crate::domain::{ApiError, Draft, Note, NoteFields, NoteId};
use tracing::{debug, info, instrument, warn};

/// What the controller is doing right now.
///
/// Starts out `Loading` until the first `load` finishes; `Busy` covers every
/// mutating request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Loading,
    Idle,
    Busy,
}

/// Owns the local copy of the note list, the selection and the draft, and
/// keeps them in step with the server after every call.
pub struct NotesController<A: NotesApi> {
    api: A,
    notes: Vec<Note>,
    selected_id: Option<NoteId>,
    draft: Draft,
    activity: Activity,
    error: Option<String>,
    new_note: NoteFields,
}

impl<A: NotesApi> NotesController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            notes: Vec::new(),
            selected_id: None,
            draft: Draft::default(),
            activity: Activity::Loading,
            error: None,
            new_note: NoteFields::new(NEW_NOTE_TITLE, NEW_NOTE_CONTENT),
        }
    }

    /// Override the title/content used by `new_note`
    pub fn with_new_note_fields(mut self, fields: NoteFields) -> Self {
        self.new_note = fields;
        self
    }

    /// Fetch the whole collection and select its first entry
    #[instrument(level = "debug", skip(self))]
    pub fn load(&mut self) -> Result<(), ApiError> {
        if self.activity == Activity::Busy {
            warn!("Ignoring load while busy");
            return Ok(());
        }
        self.activity = Activity::Loading;
        self.error = None;

        let result = self.api.list();
        self.activity = Activity::Idle;

        match result {
            Ok(notes) => {
                info!(count = notes.len(), "Loaded notes");
                let first = notes.first().map(|n| n.id.clone());
                self.notes = notes;
                self.set_selection(first);
                Ok(())
            }
            Err(e) => Err(self.fail(e, "Failed to load notes")),
        }
    }

    /// Create the placeholder note, put it on top and select it
    pub fn new_note(&mut self) -> Result<(), ApiError> {
        let fields = self.new_note.clone();
        self.create_note(fields)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn create_note(&mut self, fields: NoteFields) -> Result<(), ApiError> {
        if !self.begin("create") {
            return Ok(());
        }

        let result = self.api.create(&fields);
        self.activity = Activity::Idle;

        match result {
            Ok(created) => {
                info!(id = %created.id, "Created note");
                let id = created.id.clone();
                self.notes.insert(0, created);
                self.set_selection(Some(id));
                Ok(())
            }
            Err(e) => Err(self.fail(e, "Failed to create note")),
        }
    }

    /// Select a note by id. Returns false when the id is not in the list.
    pub fn select(&mut self, id: &NoteId) -> bool {
        if self.activity != Activity::Idle {
            return false;
        }
        if !self.notes.iter().any(|n| &n.id == id) {
            debug!(%id, "Select of unknown note");
            self.error = Some(format!("No note with id {}", id));
            return false;
        }
        self.set_selection(Some(id.clone()));
        true
    }

    pub fn edit_title(&mut self, title: impl Into<String>) -> bool {
        if !self.can_edit() {
            return false;
        }
        self.draft.title = title.into();
        true
    }

    pub fn edit_content(&mut self, content: impl Into<String>) -> bool {
        if !self.can_edit() {
            return false;
        }
        self.draft.content = content.into();
        true
    }

    /// Throw away local edits
    pub fn revert(&mut self) {
        self.draft = Draft::from_note(self.selected());
    }

    /// Send the draft of the selected note to the server
    #[instrument(level = "debug", skip(self))]
    pub fn save(&mut self) -> Result<(), ApiError> {
        let Some(id) = self.selected_id.clone() else {
            return Ok(());
        };
        if !self.begin("save") {
            return Ok(());
        }

        let fields = self.draft.to_fields();
        let result = self.api.update(&id, &fields);
        self.activity = Activity::Idle;

        match result {
            Ok(updated) => {
                info!(id = %updated.id, "Saved note");
                let id = updated.id.clone();
                if let Some(slot) = self.notes.iter_mut().find(|n| n.id == id) {
                    *slot = updated;
                }
                self.set_selection(Some(id));
                Ok(())
            }
            Err(e) => Err(self.fail(e, "Failed to save note")),
        }
    }

    /// Delete the selected note after `confirm` agrees.
    ///
    /// Returns whether a note was deleted.
    #[instrument(level = "debug", skip(self, confirm))]
    pub fn delete<F>(&mut self, confirm: F) -> Result<bool, ApiError>
    where
        F: FnOnce(&str) -> bool,
    {
        let Some(note) = self.selected().cloned() else {
            return Ok(false);
        };
        if self.activity != Activity::Idle {
            return Ok(false);
        }
        if !confirm(&format!("Delete \"{}\"?", note.title)) {
            debug!(id = %note.id, "Delete not confirmed");
            return Ok(false);
        }
        self.begin("delete");

        let result = self.api.delete(&note.id);
        self.activity = Activity::Idle;

        match result {
            Ok(()) => {
                info!(id = %note.id, "Deleted note");
                self.notes.retain(|n| n.id != note.id);
                if self.selected_id.as_ref() == Some(&note.id) {
                    let next = self.notes.first().map(|n| n.id.clone());
                    self.set_selection(next);
                }
                Ok(true)
            }
            Err(e) => Err(self.fail(e, "Failed to delete note")),
        }
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn selected(&self) -> Option<&Note> {
        let id = self.selected_id.as_ref()?;
        self.notes.iter().find(|n| &n.id == id)
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.selected()
            .map(|note| self.draft.differs_from(note))
            .unwrap_or(false)
    }

    pub fn can_edit(&self) -> bool {
        self.activity == Activity::Idle && self.selected().is_some()
    }

    pub fn can_save(&self) -> bool {
        self.can_edit() && self.is_dirty()
    }

    pub fn can_delete(&self) -> bool {
        self.can_edit()
    }

    /// Title/content used by `new_note`
    pub fn new_note_fields(&self) -> &NoteFields {
        &self.new_note
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn set_selection(&mut self, id: Option<NoteId>) {
        self.selected_id = id;
        self.draft = Draft::from_note(self.selected());
    }

    fn begin(&mut self, action: &str) -> bool {
        if self.activity != Activity::Idle {
            warn!(action, activity = ?self.activity, "Rejecting action while not idle");
            return false;
        }
        self.error = None;
        self.activity = Activity::Busy;
        true
    }

    fn fail(&mut self, err: ApiError, fallback: &str) -> ApiError {
        let err = if err.message().is_empty() {
            ApiError::RequestFailed {
                status: err.status(),
                message: fallback.to_string(),
            }
        } else {
            err
        };
        warn!(error = %err, "Request failed");
        self.error = Some(err.to_string());
        err
    }
}
