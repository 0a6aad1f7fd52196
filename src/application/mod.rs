// src/application/mod.rs
pub mod controller;
pub mod notes_api;

pub use controller::{Activity, NotesController};
pub use notes_api::NotesApi;
