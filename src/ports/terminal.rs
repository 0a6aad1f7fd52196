// src/ports/terminal.rs
use crate::application::{Activity, NotesApi, NotesController};
use crate::domain::Note;
use crate::util::text::{format_timestamp, single_line};
use std::fmt::Write;

const TITLE_WIDTH: usize = 40;

/// Plain-text rendering of the list/detail view
#[derive(Debug, Default)]
pub struct TerminalPresenter;

impl TerminalPresenter {
    pub fn new() -> Self {
        Self
    }

    pub fn render_header(&self) -> String {
        "▣ Simple Notes\n  A tiny retro notebook. No login. Just notes.\n".to_string()
    }

    /// Sidebar: count and one line per note, selection marked with `>`
    pub fn render_list<A: NotesApi>(&self, controller: &NotesController<A>) -> String {
        let notes = controller.notes();
        let mut out = String::new();
        let _ = writeln!(out, "Notes ({} total)", notes.len());

        if notes.is_empty() {
            if controller.activity() == Activity::Loading {
                out.push_str("  Loading notes...\n");
            } else {
                out.push_str("  No notes yet. Type `new` to create your first note.\n");
            }
            return out;
        }

        let selected = controller.selected().map(|n| &n.id);
        for note in notes {
            let marker = if Some(&note.id) == selected { '>' } else { ' ' };
            let _ = writeln!(out, "{}", self.list_line(note, marker));
        }
        out
    }

    fn list_line(&self, note: &Note, marker: char) -> String {
        format!(
            "{} [{}] {:<width$}  Updated • {}",
            marker,
            note.id,
            single_line(&note.title, TITLE_WIDTH),
            format_timestamp(note.updated_at.as_deref()),
            width = TITLE_WIDTH
        )
        .trim_end()
        .to_string()
    }

    /// Editor pane: status pills, banner, draft, save hint
    pub fn render_detail<A: NotesApi>(&self, controller: &NotesController<A>) -> String {
        let mut out = String::new();

        match controller.selected() {
            Some(note) => {
                let _ = writeln!(
                    out,
                    "[ID #{}] [Created: {}] [Updated: {}]",
                    note.id,
                    format_timestamp(note.created_at.as_deref()),
                    format_timestamp(note.updated_at.as_deref())
                );
            }
            None => out.push_str("[No note selected]\n"),
        }

        if let Some(error) = controller.error() {
            let _ = writeln!(out, "! {}", error);
        }

        if controller.selected().is_some() {
            let draft = controller.draft();
            let _ = writeln!(out, "Title:   {}", draft.title);
            out.push_str("Content:\n");
            for line in draft.content.lines() {
                let _ = writeln!(out, "  {}", line);
            }
            let hint = if controller.is_dirty() {
                "Unsaved changes"
            } else {
                "All changes saved"
            };
            let _ = writeln!(out, "-- {}", hint);
        }
        out
    }

    pub fn render(&self, controller: &NotesController<impl NotesApi>) -> String {
        format!("{}\n{}", self.render_list(controller), self.render_detail(controller))
    }
}
