//! `tasks ...` handlers.
//!
//! Every handler runs after `App::dispatch_tasks` has normalized overdue
//! tasks, so printed statuses are current.

use crate::app::App;
use std::io::{self, BufRead, Write};
use taskpad_core::{
    format_deadline, parse_deadline, LifecycleError, Task, TaskId, TaskServiceError,
};

const DEADLINE_HINT: &str =
    "Enter deadline (YYYY-MM-DD, YYYY-MM-DD HH:MM, 'tomorrow 18:00', 'in 3 days'): ";

impl<'a, R: BufRead, W: Write> App<'a, R, W> {
    pub(crate) fn create_task(&mut self) -> io::Result<()> {
        let description = self.console.prompt("Task description: ")?.unwrap_or_default();
        if description.trim().is_empty() {
            return self.console.say("Empty description, cancelled.");
        }

        let mut deadline = None;
        if self.console.confirm("Has a deadline? (y/n): ")? {
            loop {
                let Some(text) = self.console.prompt(DEADLINE_HINT)? else {
                    return self.console.say("Cancelled.");
                };
                match parse_deadline(&text, self.tasks().now()) {
                    Ok(parsed) => {
                        deadline = Some(parsed);
                        break;
                    }
                    Err(_) => self.console.say("Could not parse the date. Try again.")?,
                }
            }
        }

        match self.tasks().create_task(&description, deadline) {
            Ok(task) => self.console.say(format!("Task created [{}].", task.id)),
            Err(err) => self.task_failure(err),
        }
    }

    pub(crate) fn list_tasks(&mut self, all: bool) -> io::Result<()> {
        let tasks = match self.tasks().list_tasks(all) {
            Ok(tasks) => tasks,
            Err(err) => return self.report(&err),
        };
        if tasks.is_empty() {
            return self.console.say("No tasks.");
        }
        for task in &tasks {
            self.console.say(format!(
                "[{}] ({}) {}  | deadline: {} | updated: {}",
                task.id,
                task.status,
                task.description,
                deadline_text(task),
                task.updated_at.format("%Y-%m-%d %H:%M:%S")
            ))?;
        }
        Ok(())
    }

    pub(crate) fn view_task(&mut self, raw_id: Option<String>) -> io::Result<()> {
        let Some(id) = self.resolve_id(raw_id, "Task id: ")? else {
            return Ok(());
        };
        let task = match self.tasks().get_task(TaskId(id)) {
            Ok(task) => task,
            Err(err) => return self.task_failure(err),
        };
        self.console.say(format!("--- Task [{}] ---", task.id))?;
        self.console.say("Description:")?;
        self.console.say(&task.description)?;
        self.console.say(format!("Status: {}", task.status))?;
        self.console.say(format!("Deadline: {}", deadline_text(&task)))?;
        self.console.say(format!("Created: {}", format_deadline(task.created_at)))?;
        self.console.say(format!("Updated: {}", format_deadline(task.updated_at)))?;
        self.console.say("--- end ---")
    }

    pub(crate) fn complete_task(&mut self, raw_id: Option<String>) -> io::Result<()> {
        let Some(id) = self.resolve_id(raw_id, "Task id to mark done: ")? else {
            return Ok(());
        };
        match self.tasks().complete_task(TaskId(id)) {
            Ok(_) => self.console.say("Marked done."),
            Err(err) => self.task_failure(err),
        }
    }

    pub(crate) fn delete_task(&mut self, raw_id: Option<String>) -> io::Result<()> {
        let Some(id) = self.resolve_id(raw_id, "Task id to delete: ")? else {
            return Ok(());
        };
        match self.tasks().delete_task(TaskId(id)) {
            Ok(()) => self.console.say("Deleted."),
            Err(err) => self.task_failure(err),
        }
    }

    pub(crate) fn edit_task(&mut self, raw_id: Option<String>) -> io::Result<()> {
        let Some(id) = self.resolve_id(raw_id, "Task id to edit: ")? else {
            return Ok(());
        };
        let id = TaskId(id);
        let task = match self.tasks().require_task(id) {
            Ok(task) => task,
            Err(err) => return self.task_failure(err),
        };

        self.console.say("Current description:")?;
        self.console.say(&task.description)?;
        if self.console.confirm("Edit description? (y/n): ")? {
            let text = self.console.prompt("New description: ")?.unwrap_or_default();
            match self.tasks().edit_description(id, &text) {
                Ok((_, true)) => self.console.say("Description updated.")?,
                Ok((_, false)) => self.console.say("Description unchanged.")?,
                // Rejected text keeps the old description; the deadline is still offered.
                Err(err @ TaskServiceError::Lifecycle(LifecycleError::Validation(_))) => {
                    self.task_failure(err)?
                }
                Err(err) => return self.task_failure(err),
            }
        }

        self.console
            .say(format!("Current deadline: {}", deadline_text(&task)))?;
        if self.console.confirm("Edit deadline? (y/n): ")? {
            let text = self
                .console
                .prompt("Enter new deadline (empty to remove): ")?
                .unwrap_or_default();
            let deadline = if text.trim().is_empty() {
                None
            } else {
                match parse_deadline(&text, self.tasks().now()) {
                    Ok(parsed) => Some(parsed),
                    Err(err) => {
                        return self
                            .console
                            .say(format!("Bad date ({err}). Deadline kept."));
                    }
                }
            };
            match self.tasks().edit_deadline(id, deadline) {
                Ok((_, true)) if deadline.is_none() => self.console.say("Deadline removed.")?,
                Ok((_, true)) => self.console.say("Deadline updated.")?,
                Ok((_, false)) => self.console.say("Deadline unchanged.")?,
                Err(err) => return self.task_failure(err),
            }
        }
        Ok(())
    }

    fn task_failure(&mut self, err: TaskServiceError) -> io::Result<()> {
        match err {
            TaskServiceError::TaskNotFound(_) => self.console.say("Not found."),
            TaskServiceError::Lifecycle(LifecycleError::AlreadyDone(_)) => {
                self.console.say("Task is already done.")
            }
            TaskServiceError::Lifecycle(LifecycleError::Validation(_)) => {
                self.console.say(format!("Rejected: {err}."))
            }
            TaskServiceError::Repo(_) => self.report(&err),
        }
    }
}

fn deadline_text(task: &Task) -> String {
    task.deadline
        .map(format_deadline)
        .unwrap_or_else(|| "-".to_string())
}
