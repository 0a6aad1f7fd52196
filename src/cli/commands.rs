// src/cli/commands.rs
use crate::application::{NotesApi, NotesController};
use crate::cli::args::Command;
use crate::domain::{NoteFields, NoteId};
use crate::infrastructure::editor;
use crate::ports::TerminalPresenter;
use anyhow::{anyhow, bail, Context, Result};
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

/// Ask a yes/no question on `output`, answer read from `input`. Anything but
/// `y`/`yes` is a no.
pub fn confirm<R: BufRead, W: Write>(question: &str, input: &mut R, output: &mut W) -> Result<bool> {
    write!(output, "{} [y/N] ", question)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer).context("Failed to read answer")?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Run a one-shot command against a freshly mounted controller
pub fn execute<A, R, W>(
    controller: &mut NotesController<A>,
    command: Command,
    input: &mut R,
    output: &mut W,
) -> Result<()>
where
    A: NotesApi,
    R: BufRead,
    W: Write,
{
    debug!(?command, "Executing command");
    let presenter = TerminalPresenter::new();
    controller.load()?;

    match command {
        Command::List { json } => {
            if json {
                writeln!(output, "{}", serde_json::to_string_pretty(controller.notes())?)?;
            } else {
                write!(output, "{}", presenter.render_list(controller))?;
            }
        }
        Command::Show { id, json } => {
            select(controller, &id)?;
            if json {
                let note = controller.selected().context("Selected note vanished")?;
                writeln!(output, "{}", serde_json::to_string_pretty(note)?)?;
            } else {
                write!(output, "{}", presenter.render_detail(controller))?;
            }
        }
        Command::New { title, content } => {
            let placeholder = controller.new_note_fields().clone();
            let fields = NoteFields::new(
                title.unwrap_or(placeholder.title),
                content.unwrap_or(placeholder.content),
            );
            controller.create_note(fields)?;
            let note = controller.selected().context("Created note is not selected")?;
            info!(id = %note.id, "Created note from command line");
            writeln!(output, "Created note #{}", note.id)?;
            write!(output, "{}", presenter.render_detail(controller))?;
        }
        Command::Edit { id, title, content } => {
            select(controller, &id)?;
            if title.is_none() && content.is_none() {
                let edited = editor::edit_draft(controller.draft())?;
                controller.edit_title(edited.title);
                controller.edit_content(edited.content);
            } else {
                if let Some(title) = title {
                    controller.edit_title(title);
                }
                if let Some(content) = content {
                    controller.edit_content(content);
                }
            }

            if !controller.is_dirty() {
                writeln!(output, "No changes to note #{}", id)?;
                return Ok(());
            }
            controller.save()?;
            writeln!(output, "Saved note #{}", id)?;
        }
        Command::Delete { id, yes } => {
            select(controller, &id)?;
            let deleted = controller.delete(|question| {
                yes || confirm(question, &mut *input, &mut *output).unwrap_or_else(|e| {
                    warn!("Confirmation prompt failed, treating as refusal: {:#}", e);
                    false
                })
            })?;
            if deleted {
                writeln!(output, "Deleted note #{}", id)?;
            } else {
                writeln!(output, "Aborted")?;
            }
        }
        other @ (Command::Shell | Command::Config) => {
            bail!("{:?} is not a one-shot command", other)
        }
    }
    Ok(())
}

fn select<A: NotesApi>(controller: &mut NotesController<A>, id: &NoteId) -> Result<()> {
    if controller.select(id) {
        return Ok(());
    }
    Err(anyhow!(controller
        .error()
        .map(str::to_string)
        .unwrap_or_else(|| format!("No note with id {}", id))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::{sample_note, MockNotesApi};
    use std::io::Cursor;

    fn run(api: MockNotesApi, command: Command, answers: &str) -> (Result<()>, NotesController<MockNotesApi>, String) {
        let mut controller = NotesController::new(api);
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut output = Vec::new();
        let result = execute(&mut controller, command, &mut input, &mut output);
        (result, controller, String::from_utf8(output).unwrap())
    }

    fn two_notes() -> MockNotesApi {
        MockNotesApi::builder()
            .with_note(sample_note(1, "First", "one"))
            .with_note(sample_note(2, "Second", "two"))
            .build()
    }

    #[test]
    fn given_yes_answer_when_confirming_then_true() {
        let mut input = Cursor::new(b"Y\n".to_vec());
        let mut output = Vec::new();

        assert!(confirm("Delete?", &mut input, &mut output).unwrap());
        assert_eq!(String::from_utf8(output).unwrap(), "Delete? [y/N] ");
    }

    #[test]
    fn given_empty_answer_when_confirming_then_false() {
        let mut input = Cursor::new(Vec::new());

        assert!(!confirm("Delete?", &mut input, &mut Vec::new()).unwrap());
    }

    #[test]
    fn given_list_json_when_executing_then_prints_array() {
        let (result, _, out) = run(two_notes(), Command::List { json: true }, "");

        result.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
    }

    #[test]
    fn given_unknown_id_when_showing_then_fails() {
        let command = Command::Show { id: NoteId::Int(42), json: false };

        let (result, _, _) = run(two_notes(), command, "");

        assert_eq!(result.unwrap_err().to_string(), "No note with id 42");
    }

    #[test]
    fn given_title_only_when_creating_then_content_uses_placeholder() {
        let command = Command::New { title: Some("Groceries".to_string()), content: None };

        let (result, controller, out) = run(two_notes(), command, "");

        result.unwrap();
        assert!(out.starts_with("Created note #3"));
        let created = &controller.api().notes()[0];
        assert_eq!(created.title, "Groceries");
        assert_eq!(created.content, "Write something...");
    }

    #[test]
    fn given_content_flag_when_editing_then_saves_only_that_field() {
        let command = Command::Edit {
            id: NoteId::Int(2),
            title: None,
            content: Some("updated".to_string()),
        };

        let (result, controller, out) = run(two_notes(), command, "");

        result.unwrap();
        assert_eq!(out, "Saved note #2\n");
        let saved = &controller.api().notes()[1];
        assert_eq!(saved.title, "Second");
        assert_eq!(saved.content, "updated");
    }

    #[test]
    fn given_same_values_when_editing_then_no_request() {
        let command = Command::Edit {
            id: NoteId::Int(1),
            title: Some("First".to_string()),
            content: None,
        };

        let (result, controller, out) = run(two_notes(), command, "");

        result.unwrap();
        assert_eq!(out, "No changes to note #1\n");
        assert_eq!(controller.api().calls(), &["list".to_string()]);
    }

    #[test]
    fn given_declined_prompt_when_deleting_then_aborts() {
        let command = Command::Delete { id: NoteId::Int(1), yes: false };

        let (result, controller, out) = run(two_notes(), command, "n\n");

        result.unwrap();
        assert!(out.contains("Delete \"First\"? [y/N] "));
        assert!(out.ends_with("Aborted\n"));
        assert_eq!(controller.api().notes().len(), 2);
    }

    struct BrokenInput;

    impl std::io::Read for BrokenInput {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdin closed"))
        }
    }

    impl BufRead for BrokenInput {
        fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdin closed"))
        }

        fn consume(&mut self, _: usize) {}
    }

    #[test]
    fn given_unreadable_prompt_when_deleting_then_aborts_without_request() {
        let mut controller = NotesController::new(two_notes());
        let mut output = Vec::new();
        let command = Command::Delete { id: NoteId::Int(1), yes: false };

        let result = execute(&mut controller, command, &mut BrokenInput, &mut output);

        result.unwrap();
        assert!(String::from_utf8(output).unwrap().ends_with("Aborted\n"));
        assert_eq!(controller.api().notes().len(), 2);
        assert_eq!(controller.api().calls(), &["list".to_string()]);
    }

    #[test]
    fn given_yes_flag_when_deleting_then_skips_prompt() {
        let command = Command::Delete { id: NoteId::Int(2), yes: true };

        let (result, controller, out) = run(two_notes(), command, "");

        result.unwrap();
        assert_eq!(out, "Deleted note #2\n");
        assert_eq!(controller.api().notes().len(), 1);
    }

    #[test]
    fn given_backend_error_when_listing_then_propagates_message() {
        let api = MockNotesApi::builder()
            .with_list_failure(crate::domain::ApiError::from_status(503, None))
            .build();

        let (result, _, _) = run(api, Command::List { json: false }, "");

        assert_eq!(result.unwrap_err().to_string(), "Request failed (503)");
    }
}
