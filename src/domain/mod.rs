// src/domain/mod.rs
pub mod draft;
pub mod error;
pub mod note;

pub use draft::Draft;
pub use error::ApiError;
pub use note::{Note, NoteFields, NoteId};
