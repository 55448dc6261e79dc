//! Ordered, persisted task list.

use tickoff_core::{DueDate, FilterMode, Task, TaskId, filter, normalize_text};
use time::Date;
use tracing::info;

use crate::error::TaskError;
use crate::persistence::TaskPersistence;

/// Owns the task list and writes it through `P` after every mutation.
///
/// Each operation is all-or-nothing: the new list is saved first and only then
/// replaces the in-memory one, so a failed save leaves the store untouched.
#[derive(Debug)]
pub struct TaskStore<P> {
    persistence: P,
    tasks: Vec<Task>,
}

impl<P: TaskPersistence> TaskStore<P> {
    /// Load the persisted list (empty when nothing usable is stored).
    pub fn open(persistence: P) -> Self {
        let tasks = persistence.load();
        info!(count = tasks.len(), "Loaded tasks");
        Self { persistence, tasks }
    }

    /// Append a new pending task.
    ///
    /// # Errors
    /// Returns [`TaskError::EmptyText`] for blank text and [`TaskError::Persist`]
    /// when the list cannot be saved.
    pub fn create(&mut self, text: &str, due: Option<Date>) -> Result<Task, TaskError> {
        let text = normalize_text(text).ok_or(TaskError::EmptyText)?;
        let task = Task::pending(text, DueDate::from_date(due));

        let mut next = self.tasks.clone();
        next.push(task.clone());
        self.commit(next)?;

        info!(id = %task.id, "Created task");
        Ok(task)
    }

    /// Replace text and due date of a task and return it to pending.
    ///
    /// # Errors
    /// Returns [`TaskError::NotFound`] for an unknown id, [`TaskError::EmptyText`]
    /// for blank text and [`TaskError::Persist`] when the list cannot be saved.
    pub fn update(&mut self, id: TaskId, text: &str, due: Option<Date>) -> Result<Task, TaskError> {
        self.position(id)?;
        let text = normalize_text(text).ok_or(TaskError::EmptyText)?;

        let updated = self.replace(id, |task| {
            task.text = text;
            task.due = DueDate::from_date(due);
            task.completed = false;
        })?;

        info!(%id, "Updated task");
        Ok(updated)
    }

    /// Flip the completion state of a task.
    ///
    /// # Errors
    /// Returns [`TaskError::NotFound`] for an unknown id and [`TaskError::Persist`]
    /// when the list cannot be saved.
    pub fn toggle_complete(&mut self, id: TaskId) -> Result<Task, TaskError> {
        let toggled = self.replace(id, |task| task.completed = !task.completed)?;

        info!(%id, status = %toggled.status(), "Toggled task");
        Ok(toggled)
    }

    /// Remove a task, keeping the order of the others.
    ///
    /// Unknown ids are an error rather than a silent no-op.
    ///
    /// # Errors
    /// Returns [`TaskError::NotFound`] for an unknown id and [`TaskError::Persist`]
    /// when the list cannot be saved.
    pub fn remove(&mut self, id: TaskId) -> Result<Task, TaskError> {
        let index = self.position(id)?;

        let mut next = self.tasks.clone();
        let removed = next.remove(index);
        self.commit(next)?;

        info!(%id, "Removed task");
        Ok(removed)
    }

    /// Remove every task. Succeeds on an empty list too.
    ///
    /// # Errors
    /// Returns [`TaskError::Persist`] when the list cannot be saved.
    pub fn clear(&mut self) -> Result<(), TaskError> {
        let removed = self.tasks.len();
        self.commit(Vec::new())?;

        info!(removed, "Cleared tasks");
        Ok(())
    }

    fn position(&self, id: TaskId) -> Result<usize, TaskError> {
        self.tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(TaskError::NotFound(id))
    }

    fn replace(&mut self, id: TaskId, edit: impl FnOnce(&mut Task)) -> Result<Task, TaskError> {
        let mut next = self.tasks.clone();
        let task = next
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(TaskError::NotFound(id))?;
        edit(task);
        let edited = task.clone();
        self.commit(next)?;
        Ok(edited)
    }

    fn commit(&mut self, next: Vec<Task>) -> Result<(), TaskError> {
        self.persistence.save(&next)?;
        self.tasks = next;
        Ok(())
    }
}

impl<P> TaskStore<P> {
    /// Tasks in insertion order.
    #[must_use]
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task by id.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Tasks visible under `mode`.
    #[must_use]
    pub fn view(&self, mode: FilterMode) -> Vec<&Task> {
        filter::apply(&self.tasks, mode)
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the store holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Borrow the persistence adapter.
    pub const fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Consume the store and return its persistence adapter.
    pub fn into_persistence(self) -> P {
        self.persistence
    }
}
