//! Interactive session over a [`RosterView`]: drafts live only as long as the shell.

use std::io::{BufRead, Write};

use anyhow::Result;
use client_core::{
    CreationDialog, EmployeeForm, NotificationLevel, RosterView, SaveOutcome, ViewEvent,
};
use shared::domain::EmployeeId;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::debug;

use crate::table::render_table;

const CANCEL_WORD: &str = ":cancel";

const HELP: &str = "\
commands:
  load              reload employees from the backend
  new               add an unsaved employee
  select [ID ...]   select rows by id (no ids clears the selection)
  save              save selected unsaved employees, or all of them
  show              print the table
  quit              leave the shell (unsaved employees are discarded)";

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> Result<Option<String>> {
    write!(output, "{label}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let line = line.trim_end_matches(&['\r', '\n'][..]);
    if line.trim() == CANCEL_WORD {
        return Ok(None);
    }
    Ok(Some(line.to_string()))
}

/// Line-based creation dialog; re-prompts until the form is valid or cancelled.
struct PromptDialog<'a, R, W> {
    input: &'a mut R,
    output: &'a mut W,
}

impl<R: BufRead, W: Write> CreationDialog for PromptDialog<'_, R, W> {
    fn open(&mut self) -> Result<Option<EmployeeForm>> {
        writeln!(self.output, "New employee ({CANCEL_WORD} to abort)")?;
        loop {
            let Some(full_name) = prompt(&mut *self.input, &mut *self.output, "Full name: ")?
            else {
                return Ok(None);
            };
            let Some(department) =
                prompt(&mut *self.input, &mut *self.output, "Department: ")?
            else {
                return Ok(None);
            };
            let form = EmployeeForm::new(full_name, department);
            match form.validate() {
                Ok(_) => return Ok(Some(form)),
                Err(err) => writeln!(self.output, "{err}, try again")?,
            }
        }
    }
}

pub struct Shell<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub async fn run(&mut self, view: &mut RosterView) -> Result<()> {
        let mut events = view.subscribe_events();
        writeln!(self.output, "Employee roster. Type `help` for commands.")?;

        if let Err(err) = view.load().await {
            debug!(error = %err, "initial load failed");
        }
        self.print_table(view)?;
        self.flush_notifications(&mut events)?;

        loop {
            write!(self.output, "{}> ", view.save_label())?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            let mut words = line.split_whitespace();
            let Some(command) = words.next() else {
                continue;
            };

            match command {
                "help" => writeln!(self.output, "{HELP}")?,
                "load" => {
                    if view.load().await.is_ok() {
                        self.print_table(view)?;
                    }
                }
                "new" => {
                    let mut dialog = PromptDialog {
                        input: &mut self.input,
                        output: &mut self.output,
                    };
                    match view.begin_creation(&mut dialog) {
                        Ok(Some(id)) => writeln!(self.output, "added unsaved employee {id}")?,
                        Ok(None) => writeln!(self.output, "cancelled")?,
                        Err(err) => writeln!(self.output, "error: {err}")?,
                    }
                }
                "select" => match words.map(str::parse::<i64>).collect::<Result<Vec<_>, _>>() {
                    Ok(ids) => {
                        view.select(ids.into_iter().map(EmployeeId));
                        let selected = view.state().selection().len();
                        writeln!(self.output, "{selected} row(s) selected")?;
                    }
                    Err(err) => writeln!(self.output, "invalid id: {err}")?,
                },
                "save" => {
                    let report = view.save().await;
                    if report.is_empty() {
                        writeln!(self.output, "nothing to save")?;
                    }
                    for draft_id in report.saved_ids().into_iter().chain(report.failed_ids()) {
                        match report.outcome(draft_id) {
                            Some(SaveOutcome::Saved(created)) => {
                                let created_id = created
                                    .id
                                    .map(|id| id.to_string())
                                    .unwrap_or_else(|| "?".into());
                                writeln!(self.output, "saved {draft_id} as {created_id}")?;
                            }
                            Some(SaveOutcome::Failed(reason)) => {
                                writeln!(self.output, "not saved {draft_id}: {reason}")?;
                            }
                            None => {}
                        }
                    }
                    if let Some(reason) = report.reload_error() {
                        writeln!(self.output, "table not refreshed: {reason}")?;
                    }
                }
                "show" => self.print_table(view)?,
                "quit" | "exit" => break,
                other => writeln!(self.output, "unknown command `{other}`, type `help`")?,
            }

            self.flush_notifications(&mut events)?;
        }

        if view.has_unsaved() {
            writeln!(
                self.output,
                "discarding {} unsaved employee(s)",
                view.state().drafts().len()
            )?;
        }
        Ok(())
    }

    fn print_table(&mut self, view: &RosterView) -> Result<()> {
        let state = view.state();
        write!(self.output, "{}", render_table(state.rows(), state.selection()))?;
        Ok(())
    }

    fn flush_notifications(&mut self, events: &mut broadcast::Receiver<ViewEvent>) -> Result<()> {
        loop {
            match events.try_recv() {
                Ok(ViewEvent::Notification(notification)) => {
                    let tag = match notification.level {
                        NotificationLevel::Success => "ok",
                        NotificationLevel::Error => "error",
                    };
                    writeln!(self.output, "[{tag}] {}", notification.message)?;
                }
                Ok(_) | Err(TryRecvError::Lagged(_)) => {}
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return Ok(()),
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
