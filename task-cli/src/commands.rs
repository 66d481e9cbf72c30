//! Command dispatcher.
//!
//! Turns a command word and its positional arguments into repository calls
//! and writes the user-facing lines. Mistakes in user input are reported as
//! text and are not errors; only storage failures, unparsable ids and a
//! broken output stream come back as [`CommandError`].

use crate::repository::{RepositoryError, TaskRepository};
use crate::task::Status;
use log::info;
use std::io::Write;
use std::num::ParseIntError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("'{value}' is not a valid task id")]
    InvalidId {
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("Cannot write output: {0}")]
    Output(#[from] std::io::Error),
}

pub struct TaskService<REPO: TaskRepository, OUT: Write> {
    repository: REPO,
    out: OUT,
}

impl<REPO: TaskRepository, OUT: Write> TaskService<REPO, OUT> {
    pub fn new(repository: REPO, out: OUT) -> Self {
        Self { repository, out }
    }

    /// Runs `command`.
    ///
    /// `args[0]` is the command word itself; parameters start at `args[1]`.
    pub fn execute(&mut self, command: &str, args: &[String]) -> Result<(), CommandError> {
        info!("Running command '{command}' with {} argument(s)", args.len());
        match command {
            "add" => self.add(args),
            "list" => self.list(args),
            "update" => self.update(args),
            "delete" => self.delete(args),
            "mark-in-progress" => self.update_status(args, Status::InProgress),
            "mark-done" => self.update_status(args, Status::Done),
            _ => self.print("Unknown command"),
        }
    }

    pub fn into_inner(self) -> (REPO, OUT) {
        (self.repository, self.out)
    }

    fn add(&mut self, args: &[String]) -> Result<(), CommandError> {
        if args.len() < 2 {
            return self.print("Please provide a description for the task");
        }
        let id = self.repository.add(&args[1..].join(" "))?;
        self.print(&format!("Task added successfully (ID: {id})"))
    }

    fn list(&mut self, args: &[String]) -> Result<(), CommandError> {
        let status = match args.get(1).map(String::as_str) {
            None | Some("") => None,
            Some(value) => match value.parse::<Status>() {
                Ok(status) => Some(status),
                Err(_) => return self.print("Invalid status"),
            },
        };

        let tasks = self.repository.list(status)?;
        if tasks.is_empty() {
            return self.print("No tasks found");
        }
        for task in tasks {
            self.print(&format!(
                "{} - {} - {}",
                task.id(),
                task.description(),
                task.status()
            ))?;
        }
        Ok(())
    }

    fn update(&mut self, args: &[String]) -> Result<(), CommandError> {
        if args.len() < 3 {
            return self.print("Please provide a task id and a description");
        }
        let Some(id) = self.existing_id(&args[1])? else {
            return self.print("Task not found");
        };
        self.repository.update_description(id, &args[2..].join(" "))?;
        Ok(())
    }

    fn delete(&mut self, args: &[String]) -> Result<(), CommandError> {
        if args.len() < 2 {
            return self.print("Please provide a task id");
        }
        let Some(id) = self.existing_id(&args[1])? else {
            return self.print("Task not found");
        };
        self.repository.delete(id)?;
        Ok(())
    }

    fn update_status(&mut self, args: &[String], status: Status) -> Result<(), CommandError> {
        if args.len() < 2 {
            return self.print("Please provide a task id");
        }
        let Some(id) = self.existing_id(&args[1])? else {
            return self.print("Task not found");
        };
        self.repository.update_status(id, status)?;
        Ok(())
    }

    /// Parses `value` as an id and returns it if a task with that id exists.
    ///
    /// Integers outside the `u32` range, negative ones included, can never
    /// name a task and are reported as missing without asking the repository.
    fn existing_id(&self, value: &str) -> Result<Option<u32>, CommandError> {
        let id = value.parse::<i64>().map_err(|source| CommandError::InvalidId {
            value: value.to_string(),
            source,
        })?;
        let Ok(id) = u32::try_from(id) else {
            return Ok(None);
        };
        Ok(self.repository.exists(id)?.then_some(id))
    }

    fn print(&mut self, line: &str) -> Result<(), CommandError> {
        writeln!(self.out, "{line}")?;
        Ok(())
    }
}
