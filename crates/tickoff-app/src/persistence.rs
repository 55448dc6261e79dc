//! Durable storage for the task list.
//!
//! The whole list is written to a single named slot as a JSON array. Loading is
//! forgiving: an absent, unreadable or malformed slot yields an empty list, and
//! individual records that fail validation are dropped.

use anyhow::{Context, Error};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::convert::Infallible;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tickoff_core::{DueDate, Task, TaskId, TaskStatus, normalize_text};
use tracing::{debug, warn};

use crate::error::PersistError;

/// Slot key used when none is configured.
pub const DEFAULT_SLOT: &str = "tasks";

/// Persistence contract required by [`TaskStore`](crate::TaskStore).
pub trait TaskPersistence {
    /// Load the stored task list. Never fails: unusable data yields an empty list.
    fn load(&self) -> Vec<Task>;

    /// Replace the stored task list with `tasks`.
    ///
    /// # Errors
    /// Returns [`PersistError`] when encoding or writing fails.
    fn save(&self, tasks: &[Task]) -> Result<(), PersistError>;
}

/// Minimal key-value storage used by [`SlotPersistence`].
pub trait SlotBackend {
    /// Error type bubbled up from the backend.
    type Error: Into<Error>;

    /// Read a slot. Absent slots yield `Ok(None)`.
    ///
    /// # Errors
    /// Returns a backend-specific error when the slot exists but cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Overwrite a slot with `contents`.
    ///
    /// # Errors
    /// Returns a backend-specific error when the write fails.
    fn write(&self, key: &str, contents: &str) -> Result<(), Self::Error>;
}

/// Slots stored as `<dir>/<key>.json` files.
#[derive(Debug, Clone)]
pub struct FileSlots {
    dir: PathBuf,
}

impl FileSlots {
    /// Use `dir` as the slot directory. It is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the slot files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing the slot `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SlotBackend for FileSlots {
    type Error = Error;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key);
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;

        // Write next to the target and rename so a crash never leaves a torn file.
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("failed to create temp file in {}", self.dir.display()))?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path)
            .map_err(|err| err.error)
            .with_context(|| format!("failed to replace {}", path.display()))?;

        debug!(path = %path.display(), bytes = contents.len(), "Wrote slot");
        Ok(())
    }
}

/// In-memory slots, used for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemorySlots {
    slots: Mutex<HashMap<String, String>>,
}

impl MemorySlots {
    /// Create an empty set of slots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot with raw contents.
    #[must_use]
    pub fn with_slot(self, key: &str, contents: &str) -> Self {
        self.put(key, contents);
        self
    }

    /// Current raw contents of a slot.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn put(&self, key: &str, contents: &str) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), contents.to_owned());
    }
}

impl SlotBackend for MemorySlots {
    type Error = Infallible;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.get(key))
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), Self::Error> {
        self.put(key, contents);
        Ok(())
    }
}

impl<B> SlotBackend for &B
where
    B: SlotBackend + ?Sized,
{
    type Error = B::Error;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        (*self).read(key)
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), Self::Error> {
        (*self).write(key, contents)
    }
}

impl<B> SlotBackend for Arc<B>
where
    B: SlotBackend + ?Sized,
{
    type Error = B::Error;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        (**self).read(key)
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), Self::Error> {
        (**self).write(key, contents)
    }
}

/// Stored shape of a task. Field names are shared with existing task files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    /// Task identifier.
    pub id: TaskId,
    /// Task text.
    pub task: String,
    /// `MM/dd/yyyy` or the "No due date" sentinel.
    pub due_date: DueDate,
    /// Completion flag.
    pub completed: bool,
    /// Redundant status string kept for compatibility.
    pub status: TaskStatus,
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            task: task.text.clone(),
            due_date: task.due,
            completed: task.completed,
            status: task.status(),
        }
    }
}

/// Reasons a stored record is rejected on load.
#[derive(thiserror::Error, Debug)]
pub enum RecordError {
    /// Missing or ill-typed field.
    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),
    /// Text is empty after trimming.
    #[error("record {0} has blank text")]
    BlankText(TaskId),
}

impl TryFrom<TaskRecord> for Task {
    type Error = RecordError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let text = normalize_text(&record.task).ok_or(RecordError::BlankText(record.id))?;
        if record.status != TaskStatus::from_completed(record.completed) {
            debug!(id = %record.id, status = %record.status, "Status disagrees with completed flag; using completed");
        }
        Ok(Self {
            id: record.id,
            text,
            due: record.due_date,
            completed: record.completed,
        })
    }
}

/// Encode tasks into the slot format.
///
/// # Errors
/// Returns an error if JSON serialization fails.
pub fn encode_tasks(tasks: &[Task]) -> Result<String, serde_json::Error> {
    let records: Vec<TaskRecord> = tasks.iter().map(TaskRecord::from).collect();
    serde_json::to_string_pretty(&records)
}

/// Decode slot contents, dropping anything that does not validate.
#[must_use]
pub fn decode_tasks(contents: &str) -> Vec<Task> {
    let values: Vec<serde_json::Value> = match serde_json::from_str(contents) {
        Ok(values) => values,
        Err(err) => {
            warn!(%err, "Stored task list is not a JSON array; starting empty");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut tasks = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match decode_record(value) {
            Ok(task) if seen.insert(task.id) => tasks.push(task),
            Ok(task) => warn!(index, id = %task.id, "Dropping duplicate task record"),
            Err(err) => warn!(index, %err, "Dropping invalid task record"),
        }
    }
    tasks
}

fn decode_record(value: serde_json::Value) -> Result<Task, RecordError> {
    let record: TaskRecord = serde_json::from_value(value)?;
    Task::try_from(record)
}

/// [`TaskPersistence`] writing the task list to one slot of a [`SlotBackend`].
#[derive(Debug, Clone)]
pub struct SlotPersistence<B> {
    backend: B,
    key: String,
}

impl<B> SlotPersistence<B> {
    /// Persist under [`DEFAULT_SLOT`].
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, DEFAULT_SLOT)
    }

    /// Persist under a custom slot key.
    pub fn with_key(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Slot key in use.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrow the backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: SlotBackend> TaskPersistence for SlotPersistence<B> {
    fn load(&self) -> Vec<Task> {
        match self.backend.read(&self.key) {
            Ok(Some(contents)) => decode_tasks(&contents),
            Ok(None) => Vec::new(),
            Err(err) => {
                let err: Error = err.into();
                warn!(key = %self.key, "Failed to read task slot, starting empty: {err:#}");
                Vec::new()
            }
        }
    }

    fn save(&self, tasks: &[Task]) -> Result<(), PersistError> {
        let contents = encode_tasks(tasks)?;
        self.backend
            .write(&self.key, &contents)
            .map_err(|err| PersistError::Slot {
                key: self.key.clone(),
                source: err.into(),
            })?;
        debug!(key = %self.key, count = tasks.len(), "Saved tasks");
        Ok(())
    }
}
