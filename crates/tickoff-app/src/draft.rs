//! Caller-held editing state.
//!
//! The store has no idea which task is being edited. A front end keeps an
//! [`EditDraft`] instead and submits it when the user confirms.

use tickoff_core::{Task, TaskId};
use time::Date;

use crate::error::TaskError;
use crate::persistence::TaskPersistence;
use crate::task_store::TaskStore;

/// Text and due date being typed, plus the task they will overwrite (if any).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditDraft {
    /// Text as typed, not yet trimmed.
    pub text: String,
    /// Chosen due date.
    pub due: Option<Date>,
    /// Task being edited; `None` means the draft creates a new task.
    pub target: Option<TaskId>,
}

impl EditDraft {
    /// Draft for a new task.
    pub fn new(text: impl Into<String>, due: Option<Date>) -> Self {
        Self {
            text: text.into(),
            due,
            target: None,
        }
    }

    /// Load an existing task for editing.
    #[must_use]
    pub fn for_task(task: &Task) -> Self {
        Self {
            text: task.text.clone(),
            due: task.due.as_date(),
            target: Some(task.id),
        }
    }

    /// Whether submitting will update an existing task.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.target.is_some()
    }

    /// Create or update a task from the draft, then reset the draft.
    ///
    /// The draft is kept as-is when the store rejects it.
    ///
    /// # Errors
    /// Propagates the [`TaskError`] returned by [`TaskStore::create`] or
    /// [`TaskStore::update`].
    pub fn submit<P: TaskPersistence>(&mut self, store: &mut TaskStore<P>) -> Result<Task, TaskError> {
        let task = match self.target {
            Some(id) => store.update(id, &self.text, self.due)?,
            None => store.create(&self.text, self.due)?,
        };
        *self = Self::default();
        Ok(task)
    }
}
