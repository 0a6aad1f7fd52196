// src/infrastructure/editor.rs
use crate::domain::Draft;
use anyhow::{bail, Context, Result};
use std::env;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::Builder;
use tracing::{debug, instrument};

/// Editor buffer layout: title on the first line, a blank line, then content.
pub fn to_buffer(draft: &Draft) -> String {
    format!("{}\n\n{}", draft.title, draft.content)
}

/// Inverse of `to_buffer`. A missing blank separator line means everything
/// after the title is content.
pub fn from_buffer(buffer: &str) -> Draft {
    let (title, rest) = match buffer.split_once('\n') {
        Some((title, rest)) => (title, rest),
        None => (buffer, ""),
    };
    let content = rest.strip_prefix('\n').unwrap_or(rest);
    // editors like to append a final newline
    let content = content.strip_suffix('\n').unwrap_or(content);

    Draft {
        title: title.trim_end_matches('\r').to_string(),
        content: content.to_string(),
    }
}

/// `$VISUAL`, then `$EDITOR`, then `vi`
pub fn editor_command() -> String {
    ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|name| env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| "vi".to_string())
}

/// Open the draft in the user's editor and return what was saved
#[instrument(level = "debug", skip(draft))]
pub fn edit_draft(draft: &Draft) -> Result<Draft> {
    let mut file = Builder::new()
        .prefix("simple-notes-")
        .suffix(".md")
        .rand_bytes(5)
        .tempfile()
        .context("Failed to create temporary file")?;

    file.write_all(to_buffer(draft).as_bytes())
        .context("Failed to write draft to temporary file")?;
    file.flush().context("Failed to flush temporary file")?;

    let editor = editor_command();
    run_editor(&editor, file.path())?;

    let edited = std::fs::read_to_string(file.path())
        .with_context(|| format!("Failed to read back {}", file.path().display()))?;
    debug!(len = edited.len(), "Read edited buffer");
    Ok(from_buffer(&edited))
}

fn run_editor(editor: &str, path: &Path) -> Result<()> {
    // allow "code --wait" style commands
    let mut parts = editor.split_whitespace();
    let program = parts.next().context("Empty editor command")?;

    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .with_context(|| format!("Failed to launch editor '{}'", editor))?;

    if !status.success() {
        bail!("Editor '{}' exited with {}", editor, status);
    }
    Ok(())
}
