// src/infrastructure/mod.rs
pub mod config;
pub mod editor;
pub mod http;

pub use config::{ResolvedBaseUrl, Settings};
pub use http::HttpNotesApi;
