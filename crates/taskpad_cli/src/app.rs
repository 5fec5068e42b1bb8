//! Command loop and dispatch.
//!
//! # Responsibility
//! - Read commands, route them to note/task/ask handlers.
//! - Turn core failures into user-facing messages.
//!
//! # Invariants
//! - One command in flight; nothing runs between prompts.
//! - Store writes happen only inside core services, after the core
//!   operation (including any gateway call) has succeeded.

use crate::command::{parse_command, Command, NoteCommand, TaskCommand};
use crate::console::Console;
use log::{error, info};
use rusqlite::Connection;
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use taskpad_core::{
    parse_record_id, Clock, NoteService, RewriteGateway, SqliteNoteRepository,
    SqliteTaskRepository, TaskService,
};

pub const PROMPT: &str = "taskpad> ";
pub const ASK_INSTRUCTION: &str = "You are a helpful assistant.";

pub const HELP_TEXT: &str = "\
Commands:
 help                        - show this message
 notes create                - create a note
 notes list                  - list notes
 notes view <id>             - show a note
 notes edit <id>             - edit a note (whole or by line)
 notes delete <id>           - delete a note

 tasks create                - create a task
 tasks list                  - list open tasks (overdue ones are marked missed)
 tasks list all              - list all tasks
 tasks view <id>             - show a task
 tasks edit <id>             - edit description/deadline
 tasks done <id>             - mark a task done
 tasks delete <id>           - delete a task

 ask <question>              - ask the text generator
 exit / quit                 - leave
";

/// Whether the loop keeps running after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct App<'a, R, W> {
    conn: &'a Connection,
    gateway: &'a dyn RewriteGateway,
    clock: &'a dyn Clock,
    pub(crate) console: Console<R, W>,
}

impl<'a, R: BufRead, W: Write> App<'a, R, W> {
    pub fn new(
        conn: &'a Connection,
        gateway: &'a dyn RewriteGateway,
        clock: &'a dyn Clock,
        console: Console<R, W>,
    ) -> Self {
        Self {
            conn,
            gateway,
            clock,
            console,
        }
    }

    /// Runs until `exit`/`quit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        self.console
            .say("taskpad ready. Type 'help' for the list of commands.")?;
        loop {
            let Some(line) = self.console.prompt(PROMPT)? else {
                self.console.say("")?;
                self.console.say("Exiting.")?;
                return Ok(());
            };
            if self.execute(&line)? == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Executes one command line.
    pub fn execute(&mut self, line: &str) -> io::Result<Flow> {
        match parse_command(line) {
            Command::Empty => {}
            Command::Exit => {
                self.console.say("Bye.")?;
                return Ok(Flow::Exit);
            }
            Command::Help => self.console.say(HELP_TEXT)?,
            Command::Usage(usage) => self.console.say(usage)?,
            Command::Unknown(_) => self.console.say("Unknown command. Type 'help'.")?,
            Command::Ask(question) => self.ask(&question)?,
            Command::Notes(command) => self.dispatch_notes(command)?,
            Command::Tasks(command) => self.dispatch_tasks(command)?,
        }
        Ok(Flow::Continue)
    }

    pub fn console(&self) -> &Console<R, W> {
        &self.console
    }

    fn dispatch_notes(&mut self, command: NoteCommand) -> io::Result<()> {
        match command {
            NoteCommand::Create => self.create_note(),
            NoteCommand::List => self.list_notes(),
            NoteCommand::View(id) => self.view_note(id),
            NoteCommand::Edit(id) => self.edit_note(id),
            NoteCommand::Delete(id) => self.delete_note(id),
            NoteCommand::Unknown(_) => self.console.say("Unknown notes subcommand."),
        }
    }

    fn dispatch_tasks(&mut self, command: TaskCommand) -> io::Result<()> {
        if let Err(err) = self.tasks().normalize() {
            return self.report(&err);
        }
        match command {
            TaskCommand::Create => self.create_task(),
            TaskCommand::List { all } => self.list_tasks(all),
            TaskCommand::View(id) => self.view_task(id),
            TaskCommand::Edit(id) => self.edit_task(id),
            TaskCommand::Done(id) => self.complete_task(id),
            TaskCommand::Delete(id) => self.delete_task(id),
            TaskCommand::Unknown(_) => self.console.say("Unknown tasks subcommand."),
        }
    }

    fn ask(&mut self, question: &str) -> io::Result<()> {
        self.console.say("Sending the question...")?;
        let reply = self.gateway.rewrite(question, Some(ASK_INSTRUCTION));
        info!(
            "event=ask module=cli status=ok question_chars={}",
            question.chars().count()
        );
        self.console.say("--- answer ---")?;
        self.console.say(reply)?;
        self.console.say("--------------")
    }

    pub(crate) fn notes(&self) -> NoteService<'a, SqliteNoteRepository<'a>> {
        NoteService::new(SqliteNoteRepository::new(self.conn), self.clock)
    }

    pub(crate) fn tasks(&self) -> TaskService<'a, SqliteTaskRepository<'a>> {
        TaskService::new(SqliteTaskRepository::new(self.conn), self.clock)
    }

    pub(crate) fn gateway(&self) -> &'a dyn RewriteGateway {
        self.gateway
    }

    /// Uses `raw` or prompts with `label`, then parses the id.
    ///
    /// Returns `None` (after telling the user) for EOF or an invalid id.
    pub(crate) fn resolve_id(&mut self, raw: Option<String>, label: &str) -> io::Result<Option<i64>> {
        let raw = match raw {
            Some(raw) => raw,
            None => match self.console.prompt(label)? {
                Some(raw) => raw,
                None => return Ok(None),
            },
        };
        match parse_record_id(&raw) {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                self.console.say("Invalid id.")?;
                Ok(None)
            }
        }
    }

    /// Prints an unexpected failure and logs it.
    pub(crate) fn report(&mut self, err: &dyn Display) -> io::Result<()> {
        error!("event=command module=cli status=error error={err}");
        self.console.say(format!("Error: {err}"))
    }
}
