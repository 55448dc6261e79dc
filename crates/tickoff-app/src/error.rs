//! Error types for task store operations.

use thiserror::Error;
use tickoff_core::TaskId;

/// Errors surfaced by [`TaskStore`](crate::TaskStore) operations.
#[derive(Error, Debug)]
pub enum TaskError {
    /// Task text was empty or whitespace only.
    #[error("task text must not be empty")]
    EmptyText,

    /// No task with this identifier exists.
    #[error("task {0} not found")]
    NotFound(TaskId),

    /// Writing the task list to its slot failed.
    #[error("failed to persist tasks: {0}")]
    Persist(#[from] PersistError),
}

/// Errors raised while saving the task list.
#[derive(Error, Debug)]
pub enum PersistError {
    /// Tasks could not be encoded as JSON.
    #[error("failed to encode tasks: {0}")]
    Encode(#[from] serde_json::Error),

    /// The slot backend rejected the write.
    #[error("failed to write slot '{key}': {source}")]
    Slot {
        /// Slot key that was being written.
        key: String,
        /// Backend error.
        #[source]
        source: anyhow::Error,
    },
}
