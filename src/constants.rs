// src/constants.rs
//
// Application-wide constants. Each constant is documented with its purpose and
// usage context.

/// Base URL used when no flag, environment variable or settings file names one.
///
/// Used in: `infrastructure/config.rs`
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variables consulted for the base URL, highest priority first.
///
/// `NOTES_API_BASE_URL` is the legacy name and only wins when the others are unset.
///
/// Used in: `infrastructure/config.rs`
pub const BASE_URL_ENV_VARS: &[&str] = &["NOTES_API_BASE", "NOTES_BACKEND_URL", "NOTES_API_BASE_URL"];

/// Collection path of the notes resource, appended to the base URL.
///
/// Used in: `infrastructure/http.rs`
pub const NOTES_PATH: &str = "/notes";

/// Title and content of the stub created by the "new" action.
///
/// Used in: `infrastructure/config.rs` (settings defaults)
pub const NEW_NOTE_TITLE: &str = "Untitled Note";
pub const NEW_NOTE_CONTENT: &str = "Write something...";

/// Directory below the platform config dir holding `config.toml`.
///
/// Used in: `infrastructure/config.rs`
pub const CONFIG_DIR_NAME: &str = "simple-notes";
pub const CONFIG_FILE_NAME: &str = "config.toml";
