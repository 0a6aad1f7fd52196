// src/util/testing.rs

use anyhow::Result;
use std::env;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::NotesApi;
use crate::domain::{ApiError, Note, NoteFields, NoteId};

/// Build a note with fixed timestamps
pub fn sample_note(id: i64, title: &str, content: &str) -> Note {
    Note {
        id: NoteId::Int(id),
        title: title.to_string(),
        content: content.to_string(),
        created_at: Some("2024-01-01T09:00:00".to_string()),
        updated_at: Some("2024-01-01T09:00:00".to_string()),
    }
}

/// Shared in-memory stand-in for the notes backend
///
/// Behaves like a well-mannered server: ids are handed out sequentially, updates
/// bump `updated_at`, and deletes of unknown ids answer 404. Failures configured
/// through the builder are returned once, by the next call of that operation.
///
/// # Examples
///
/// ```
/// use simple_notes::util::testing::{sample_note, MockNotesApi};
///
/// let mock = MockNotesApi::builder()
///     .with_note(sample_note(1, "Groceries", "milk"))
///     .build();
/// assert_eq!(mock.notes().len(), 1);
/// ```
pub struct MockNotesApi {
    notes: Vec<Note>,
    next_id: i64,
    tick: u32,
    list_failure: Option<ApiError>,
    create_failure: Option<ApiError>,
    update_failure: Option<ApiError>,
    delete_failure: Option<ApiError>,
    calls: Vec<String>,
}

impl MockNotesApi {
    pub fn builder() -> MockNotesApiBuilder {
        MockNotesApiBuilder::new()
    }

    /// Server side view of the collection
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Operations received so far, e.g. `"list"`, `"update 3"`
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    fn stamp(&mut self) -> String {
        self.tick += 1;
        format!("2024-01-02T10:{:02}:00", self.tick % 60)
    }

    fn not_found() -> ApiError {
        ApiError::from_status(404, Some("Note not found".to_string()))
    }
}

impl NotesApi for MockNotesApi {
    fn list(&mut self) -> Result<Vec<Note>, ApiError> {
        self.calls.push("list".to_string());
        if let Some(err) = self.list_failure.take() {
            return Err(err);
        }
        Ok(self.notes.clone())
    }

    fn create(&mut self, fields: &NoteFields) -> Result<Note, ApiError> {
        self.calls.push("create".to_string());
        if let Some(err) = self.create_failure.take() {
            return Err(err);
        }
        let now = self.stamp();
        let note = Note {
            id: NoteId::Int(self.next_id),
            title: fields.title.clone(),
            content: fields.content.clone(),
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };
        self.next_id += 1;
        self.notes.insert(0, note.clone());
        Ok(note)
    }

    fn update(&mut self, id: &NoteId, fields: &NoteFields) -> Result<Note, ApiError> {
        self.calls.push(format!("update {}", id));
        if let Some(err) = self.update_failure.take() {
            return Err(err);
        }
        let now = self.stamp();
        let note = self
            .notes
            .iter_mut()
            .find(|n| &n.id == id)
            .ok_or_else(Self::not_found)?;
        note.title = fields.title.clone();
        note.content = fields.content.clone();
        note.updated_at = Some(now);
        Ok(note.clone())
    }

    fn delete(&mut self, id: &NoteId) -> Result<(), ApiError> {
        self.calls.push(format!("delete {}", id));
        if let Some(err) = self.delete_failure.take() {
            return Err(err);
        }
        let before = self.notes.len();
        self.notes.retain(|n| &n.id != id);
        if self.notes.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }
}

/// Builder for MockNotesApi
///
/// Provides a fluent interface for configuring mock behavior.
pub struct MockNotesApiBuilder {
    notes: Vec<Note>,
    list_failure: Option<ApiError>,
    create_failure: Option<ApiError>,
    update_failure: Option<ApiError>,
    delete_failure: Option<ApiError>,
}

impl MockNotesApiBuilder {
    pub fn new() -> Self {
        Self {
            notes: vec![],
            list_failure: None,
            create_failure: None,
            update_failure: None,
            delete_failure: None,
        }
    }

    /// Append a note to the server side collection
    pub fn with_note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    pub fn with_list_failure(mut self, err: ApiError) -> Self {
        self.list_failure = Some(err);
        self
    }

    pub fn with_create_failure(mut self, err: ApiError) -> Self {
        self.create_failure = Some(err);
        self
    }

    pub fn with_update_failure(mut self, err: ApiError) -> Self {
        self.update_failure = Some(err);
        self
    }

    pub fn with_delete_failure(mut self, err: ApiError) -> Self {
        self.delete_failure = Some(err);
        self
    }

    pub fn build(self) -> MockNotesApi {
        let next_id = self
            .notes
            .iter()
            .filter_map(|n| match n.id {
                NoteId::Int(id) => Some(id),
                NoteId::Text(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;
        MockNotesApi {
            notes: self.notes,
            next_id,
            tick: 0,
            list_failure: self.list_failure,
            create_failure: self.create_failure,
            update_failure: self.update_failure,
            delete_failure: self.delete_failure,
            calls: vec![],
        }
    }
}

impl Default for MockNotesApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["hyper", "reqwest", "rustls", "mio", "axum", "tower"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}
