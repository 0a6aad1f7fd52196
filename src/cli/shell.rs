// src/cli/shell.rs
use crate::application::{NotesApi, NotesController};
use crate::cli::commands::confirm;
use crate::domain::NoteId;
use crate::infrastructure::editor;
use crate::ports::TerminalPresenter;
use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

const PROMPT: &str = "notes> ";

const HELP: &str = "\
Commands:
  list | ls           show the note list
  show                show the selected note
  select <id>         select a note
  title <text>        replace the draft title
  content <text>      replace the draft content
  append <text>       add a line to the draft content
  edit                edit the draft in $VISUAL/$EDITOR
  revert              drop unsaved changes
  save                save the draft
  new                 create a note
  delete | rm         delete the selected note
  help                this text
  quit | exit         leave
";

enum Flow {
    Continue,
    Quit,
}

/// Interactive list/detail session.
///
/// Every line is one user action; the error banner only survives until the next one.
pub struct Shell<A: NotesApi, R: BufRead, W: Write> {
    controller: NotesController<A>,
    input: R,
    output: W,
    presenter: TerminalPresenter,
}

impl<A: NotesApi, R: BufRead, W: Write> Shell<A, R, W> {
    pub fn new(controller: NotesController<A>, input: R, output: W) -> Self {
        Self {
            controller,
            input,
            output,
            presenter: TerminalPresenter::new(),
        }
    }

    pub fn into_inner(self) -> (NotesController<A>, W) {
        (self.controller, self.output)
    }

    /// Mount (initial load), then read commands until `quit` or end of input
    pub fn run(&mut self) -> Result<()> {
        write!(self.output, "{}", self.presenter.render_header())?;
        // a failed load ends up in the banner
        let _ = self.controller.load();
        self.render_all()?;

        loop {
            write!(self.output, "{}", PROMPT)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                break;
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Flow::Quit = self.dispatch(line)? {
                break;
            }
        }
        info!("Shell closed");
        Ok(())
    }

    fn dispatch(&mut self, line: &str) -> Result<Flow> {
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };
        debug!(command, rest, "Shell command");
        self.controller.dismiss_error();

        match command {
            "quit" | "exit" | "q" => return Ok(Flow::Quit),
            "help" | "?" => write!(self.output, "{}", HELP)?,
            "list" | "ls" => self.render_list()?,
            "show" => self.render_detail()?,
            "select" | "s" => {
                if rest.is_empty() {
                    writeln!(self.output, "usage: select <id>")?;
                } else {
                    let id: NoteId = rest.parse()?;
                    self.controller.select(&id);
                    self.render_detail()?;
                }
            }
            "title" => {
                if self.controller.edit_title(rest) {
                    self.render_detail()?;
                } else {
                    self.nothing_selected()?;
                }
            }
            "content" => {
                if self.controller.edit_content(rest) {
                    self.render_detail()?;
                } else {
                    self.nothing_selected()?;
                }
            }
            "append" => {
                let mut content = self.controller.draft().content.clone();
                if !content.is_empty() {
                    content.push('\n');
                }
                content.push_str(rest);
                if self.controller.edit_content(content) {
                    self.render_detail()?;
                } else {
                    self.nothing_selected()?;
                }
            }
            "edit" => {
                if !self.controller.can_edit() {
                    self.nothing_selected()?;
                } else {
                    match editor::edit_draft(self.controller.draft()) {
                        Ok(edited) => {
                            self.controller.edit_title(edited.title);
                            self.controller.edit_content(edited.content);
                            self.render_detail()?;
                        }
                        Err(e) => writeln!(self.output, "! {:#}", e)?,
                    }
                }
            }
            "revert" => {
                self.controller.revert();
                self.render_detail()?;
            }
            "save" => {
                if self.controller.can_save() {
                    // failures end up in the banner
                    if let Err(e) = self.controller.save() {
                        debug!("Save failed: {}", e);
                    }
                    self.render_all()?;
                } else {
                    writeln!(self.output, "Nothing to save.")?;
                }
            }
            "new" => {
                if let Err(e) = self.controller.new_note() {
                    debug!("Create failed: {}", e);
                }
                self.render_all()?;
            }
            "delete" | "rm" => {
                if self.controller.can_delete() {
                    let Self { controller, input, output, .. } = self;
                    let deleted = controller.delete(|question| {
                        confirm(question, input, output).unwrap_or_else(|e| {
                            warn!("Confirmation prompt failed, treating as refusal: {:#}", e);
                            false
                        })
                    });
                    if let Err(e) = deleted {
                        debug!("Delete failed: {}", e);
                    }
                    self.render_all()?;
                } else {
                    self.nothing_selected()?;
                }
            }
            other => writeln!(self.output, "Unknown command `{}`. Type `help`.", other)?,
        }
        Ok(Flow::Continue)
    }

    fn nothing_selected(&mut self) -> Result<()> {
        writeln!(self.output, "Select a note first.")?;
        Ok(())
    }

    fn render_list(&mut self) -> Result<()> {
        write!(self.output, "{}", self.presenter.render_list(&self.controller))?;
        Ok(())
    }

    fn render_detail(&mut self) -> Result<()> {
        write!(self.output, "{}", self.presenter.render_detail(&self.controller))?;
        Ok(())
    }

    fn render_all(&mut self) -> Result<()> {
        write!(self.output, "{}", self.presenter.render(&self.controller))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ApiError;
    use crate::util::testing::{sample_note, MockNotesApi};
    use std::io::Cursor;

    fn session(api: MockNotesApi, script: &str) -> (NotesController<MockNotesApi>, String) {
        let controller = NotesController::new(api);
        let input = Cursor::new(script.as_bytes().to_vec());
        let mut shell = Shell::new(controller, input, Vec::new());
        shell.run().expect("Shell should run");
        let (controller, output) = shell.into_inner();
        (controller, String::from_utf8(output).unwrap())
    }

    #[test]
    fn given_empty_backend_when_starting_then_shows_empty_state() {
        let (controller, out) = session(MockNotesApi::builder().build(), "quit\n");

        assert!(out.contains("Notes (0 total)"));
        assert!(out.contains("No notes yet."));
        assert!(out.contains("[No note selected]"));
        assert!(controller.selected().is_none());
    }

    #[test]
    fn given_load_failure_when_starting_then_shows_banner_and_keeps_running() {
        let api = MockNotesApi::builder()
            .with_list_failure(ApiError::transport("connection refused"))
            .build();

        let (_, out) = session(api, "help\n");

        assert!(out.contains("! connection refused"));
        assert!(out.contains("Commands:"));
    }

    #[test]
    fn given_new_edit_save_script_then_server_has_saved_note() {
        let script = "new\ntitle Shopping\ncontent milk\nappend eggs\nsave\nquit\n";

        let (controller, out) = session(MockNotesApi::builder().build(), script);

        let saved = &controller.api().notes()[0];
        assert_eq!(saved.title, "Shopping");
        assert_eq!(saved.content, "milk\neggs");
        assert!(!controller.is_dirty());
        assert!(out.contains("-- Unsaved changes"));
        assert!(out.contains("-- All changes saved"));
    }

    #[test]
    fn given_clean_draft_when_saving_then_nothing_to_save() {
        let api = MockNotesApi::builder()
            .with_note(sample_note(1, "First", "one"))
            .build();

        let (controller, out) = session(api, "save\n");

        assert!(out.contains("Nothing to save."));
        assert_eq!(controller.api().calls(), &["list".to_string()]);
    }

    #[test]
    fn given_delete_confirmed_then_selects_remaining_note() {
        let api = MockNotesApi::builder()
            .with_note(sample_note(1, "First", "one"))
            .with_note(sample_note(2, "Second", "two"))
            .build();

        let (controller, out) = session(api, "delete\ny\nquit\n");

        assert!(out.contains("Delete \"First\"? [y/N] "));
        assert_eq!(controller.notes().len(), 1);
        assert_eq!(controller.selected().unwrap().title, "Second");
    }

    #[test]
    fn given_failed_save_then_banner_clears_on_next_command() {
        let api = MockNotesApi::builder()
            .with_note(sample_note(1, "First", "one"))
            .with_update_failure(ApiError::from_status(500, None))
            .build();

        let (controller, out) = session(api, "title Other\nsave\nshow\n");

        assert!(out.contains("! Request failed (500)"));
        assert_eq!(controller.error(), None);
        assert_eq!(controller.draft().title, "Other");
    }

    #[test]
    fn given_failed_create_then_shows_banner_and_keeps_running() {
        let api = MockNotesApi::builder()
            .with_note(sample_note(1, "First", "one"))
            .with_create_failure(ApiError::transport(""))
            .build();

        let (controller, out) = session(api, "new
new
quit
");

        assert!(out.contains("! Failed to create note"));
        assert_eq!(controller.notes().len(), 2);
        assert_eq!(controller.selected().unwrap().title, "Untitled Note");
        assert_eq!(controller.error(), None);
    }

    #[test]
    fn given_select_and_revert_then_draft_matches_selection() {
        let api = MockNotesApi::builder()
            .with_note(sample_note(1, "First", "one"))
            .with_note(sample_note(2, "Second", "two"))
            .build();

        let (controller, _) = session(api, "select 2\ntitle Changed\nrevert\n");

        assert_eq!(controller.selected().unwrap().title, "Second");
        assert_eq!(controller.draft().title, "Second");
        assert!(!controller.is_dirty());
    }

    #[test]
    fn given_unknown_command_then_hints_help() {
        let (_, out) = session(MockNotesApi::builder().build(), "frobnicate\n");

        assert!(out.contains("Unknown command `frobnicate`. Type `help`."));
    }

    #[test]
    fn given_no_selection_when_editing_title_then_asks_to_select() {
        let (_, out) = session(MockNotesApi::builder().build(), "title x\n");

        assert!(out.contains("Select a note first."));
    }
}
