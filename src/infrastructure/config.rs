// src/infrastructure/config.rs
use crate::constants::{
    BASE_URL_ENV_VARS, CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_BASE_URL, NEW_NOTE_CONTENT,
    NEW_NOTE_TITLE,
};
use crate::domain::NoteFields;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// TOML settings file
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub new_note: NewNoteSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct ApiSettings {
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct NewNoteSettings {
    #[serde(default = "default_new_title")]
    pub title: String,
    #[serde(default = "default_new_content")]
    pub content: String,
}

fn default_new_title() -> String { NEW_NOTE_TITLE.to_string() }
fn default_new_content() -> String { NEW_NOTE_CONTENT.to_string() }

impl Default for NewNoteSettings {
    fn default() -> Self {
        Self {
            title: default_new_title(),
            content: default_new_content(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config {}", path.display()))?;

        Ok(settings)
    }

    /// Load from an explicit path, or from the default location when it exists.
    ///
    /// An explicit path has to exist; a missing default file means defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!(?path, "Loading settings from explicit path");
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => {
                debug!(?path, "Loading settings from default path");
                Self::load(path)
            }
            _ => {
                debug!("No settings file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// `<config_dir>/simple-notes/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn new_note_fields(&self) -> NoteFields {
        NoteFields::new(self.new_note.title.clone(), self.new_note.content.clone())
    }
}

/// Where the base URL came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseUrlSource {
    Flag,
    Env(String),
    ConfigFile,
    Default,
}

impl fmt::Display for BaseUrlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseUrlSource::Flag => f.write_str("--base-url"),
            BaseUrlSource::Env(name) => write!(f, "${}", name),
            BaseUrlSource::ConfigFile => f.write_str("config file"),
            BaseUrlSource::Default => f.write_str("default"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBaseUrl {
    pub url: String,
    pub source: BaseUrlSource,
}

/// Strip trailing slashes so `{base}{path}` never doubles them
pub fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Pick the first non-blank candidate, in order, falling back to the default.
pub fn resolve_base_url<I>(candidates: I) -> ResolvedBaseUrl
where
    I: IntoIterator<Item = (BaseUrlSource, Option<String>)>,
{
    let found = candidates.into_iter().find_map(|(source, value)| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(|v| (source, v))
    });

    let (source, raw) = found.unwrap_or((BaseUrlSource::Default, DEFAULT_BASE_URL.to_string()));
    ResolvedBaseUrl {
        url: normalize_base_url(&raw),
        source,
    }
}

/// Base URL lookup in its fixed priority order: flag, environment variables,
/// settings file, default.
///
/// `lookup_env` is `std::env::var(..).ok()` outside of tests.
pub fn resolve_from<F>(flag: Option<&str>, settings: &Settings, lookup_env: F) -> ResolvedBaseUrl
where
    F: Fn(&str) -> Option<String>,
{
    let mut candidates = vec![(BaseUrlSource::Flag, flag.map(str::to_string))];
    candidates.extend(
        BASE_URL_ENV_VARS
            .iter()
            .map(|name| (BaseUrlSource::Env(name.to_string()), lookup_env(name))),
    );
    candidates.push((BaseUrlSource::ConfigFile, settings.api.base_url.clone()));

    let resolved = resolve_base_url(candidates);
    info!(url = %resolved.url, source = %resolved.source, "Resolved API base URL");
    resolved
}
