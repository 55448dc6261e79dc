use serde::{Deserialize, Serialize};
use std::fmt;

use crate::due_date::DueDate;
use crate::id::TaskId;

/// Completion status as shown to the user and written to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not done yet.
    Pending,
    /// Marked as done.
    Completed,
}

impl TaskStatus {
    /// String representation used in persisted records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// Capitalized label used by list views.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
        }
    }

    /// Status matching a completion flag.
    #[must_use]
    pub const fn from_completed(completed: bool) -> Self {
        if completed { Self::Completed } else { Self::Pending }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single to-do item.
///
/// The status is derived from `completed`, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Identifier assigned at creation.
    pub id: TaskId,
    /// Trimmed, non-empty text.
    pub text: String,
    /// Optional due date.
    pub due: DueDate,
    /// Completion flag.
    pub completed: bool,
}

impl Task {
    /// Build a pending task with a fresh identifier.
    ///
    /// Callers are responsible for passing already-validated text.
    #[must_use]
    pub fn pending(text: impl Into<String>, due: DueDate) -> Self {
        Self {
            id: TaskId::new(),
            text: text.into(),
            due,
            completed: false,
        }
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        TaskStatus::from_completed(self.completed)
    }

    /// Due date in its display form (`MM/dd/yyyy` or the sentinel).
    #[must_use]
    pub fn due_display(&self) -> String {
        self.due.to_string()
    }
}

/// Normalize user-entered task text; blank input yields `None`.
#[must_use]
pub fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
