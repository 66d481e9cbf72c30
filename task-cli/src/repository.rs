//! Persistence for the task collection.
//!
//! Every operation reads the whole collection from storage, works on an
//! in-memory copy and, when it mutates anything, writes the whole collection
//! back. There is no locking between processes.

use crate::task::{Status, Task};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Content written to a freshly created task file.
const EMPTY_STORE: &str = "{}";

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Cannot access task file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("No task ids left to assign")]
    IdsExhausted,
}

/// Store contract used by the command dispatcher.
///
/// Ids are assigned by the store and never reused. Updating or deleting an id
/// that does not exist is a no-op; callers check [`TaskRepository::exists`]
/// first when they need to report a missing task.
#[cfg_attr(test, mockall::automock)]
pub trait TaskRepository {
    /// Appends a new `todo` task and returns its id.
    fn add(&self, description: &str) -> Result<u32, RepositoryError>;
    /// Returns every task, or only those with exactly the given status.
    fn list(&self, status: Option<Status>) -> Result<Vec<Task>, RepositoryError>;
    fn exists(&self, id: u32) -> Result<bool, RepositoryError>;
    fn update_status(&self, id: u32, status: Status) -> Result<(), RepositoryError>;
    fn update_description(&self, id: u32, description: &str) -> Result<(), RepositoryError>;
    fn delete(&self, id: u32) -> Result<(), RepositoryError>;
}

/// On-disk layout of the task file.
///
/// `next_id` is a high-water mark so that ids of deleted tasks are never
/// handed out again. Both fields default, which lets the empty `{}` marker
/// read as an empty collection. A bare array of tasks is accepted on read
/// but the file is always written back in this layout.
#[derive(Debug, Default, Serialize, Deserialize)]
struct TaskFile {
    #[serde(default)]
    next_id: u32,
    #[serde(default)]
    tasks: Vec<Task>,
}

impl TaskFile {
    fn next_id(&self) -> Result<u32, RepositoryError> {
        let after_highest = match self.tasks.iter().map(|task| task.id).max() {
            Some(max) => max.checked_add(1).ok_or(RepositoryError::IdsExhausted)?,
            None => 1,
        };
        Ok(after_highest.max(self.next_id))
    }

    fn position(&self, id: u32) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }
}

/// Accepted task file contents: the full document, or a bare list of tasks.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredTasks {
    File(TaskFile),
    List(Vec<Task>),
}

impl From<StoredTasks> for TaskFile {
    fn from(stored: StoredTasks) -> Self {
        match stored {
            StoredTasks::File(file) => file,
            StoredTasks::List(tasks) => TaskFile { next_id: 0, tasks },
        }
    }
}

/// A [`TaskRepository`] backed by a single JSON file.
///
/// Updated tasks are moved to the end of the stored sequence, so listing
/// order is insertion order with the most recently touched tasks last.
#[derive(Debug, Clone)]
pub struct JsonTaskRepository {
    path: PathBuf,
}

impl JsonTaskRepository {
    /// Binds the repository to `path`, creating an empty task file there if
    /// none exists yet.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            debug!("Initialising empty task file at {}", path.display());
            fs::write(&path, EMPTY_STORE)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<TaskFile, RepositoryError> {
        if !self.path.exists() {
            return Ok(TaskFile::default());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(TaskFile::default());
        }
        let file: TaskFile = serde_json::from_str::<StoredTasks>(&contents)?.into();
        debug!("Loaded {} tasks from {}", file.tasks.len(), self.path.display());
        Ok(file)
    }

    fn save(&self, file: &TaskFile) -> Result<(), RepositoryError> {
        let json = serde_json::to_string_pretty(file)?;
        fs::write(&self.path, json)?;
        debug!("Saved {} tasks to {}", file.tasks.len(), self.path.display());
        Ok(())
    }

    /// Applies `change` to the task with `id`, stamps it and moves it to the end.
    fn modify(&self, id: u32, change: impl FnOnce(&mut Task)) -> Result<(), RepositoryError> {
        let mut file = self.load()?;
        let Some(index) = file.position(id) else {
            debug!("No task with id {id}, nothing to update");
            return Ok(());
        };
        let mut task = file.tasks.remove(index);
        change(&mut task);
        task.touch();
        file.tasks.push(task);
        self.save(&file)
    }
}

impl TaskRepository for JsonTaskRepository {
    fn add(&self, description: &str) -> Result<u32, RepositoryError> {
        let mut file = self.load()?;
        let id = file.next_id()?;
        let next_id = id.checked_add(1).ok_or(RepositoryError::IdsExhausted)?;
        file.tasks.push(Task::new(id, description.to_string()));
        file.next_id = next_id;
        self.save(&file)?;
        debug!("Added task {id}");
        Ok(id)
    }

    fn list(&self, status: Option<Status>) -> Result<Vec<Task>, RepositoryError> {
        let tasks = self.load()?.tasks;
        Ok(match status {
            Some(status) => tasks.into_iter().filter(|task| task.status == status).collect(),
            None => tasks,
        })
    }

    fn exists(&self, id: u32) -> Result<bool, RepositoryError> {
        Ok(self.load()?.position(id).is_some())
    }

    fn update_status(&self, id: u32, status: Status) -> Result<(), RepositoryError> {
        self.modify(id, |task| task.status = status)
    }

    fn update_description(&self, id: u32, description: &str) -> Result<(), RepositoryError> {
        self.modify(id, |task| task.description = description.to_string())
    }

    fn delete(&self, id: u32) -> Result<(), RepositoryError> {
        let mut file = self.load()?;
        let Some(index) = file.position(id) else {
            debug!("No task with id {id}, nothing to delete");
            return Ok(());
        };
        file.tasks.remove(index);
        self.save(&file)
    }
}
