//! Domain types for tickoff: tasks, identifiers, due dates and list filters.

/// Due date formatting and parsing.
pub mod due_date;
/// List filtering.
pub mod filter;
/// Identifier types.
pub mod id;
/// The task entity.
pub mod task;

pub use due_date::{DueDate, NO_DUE_DATE};
pub use filter::FilterMode;
pub use id::TaskId;
pub use task::{Task, TaskStatus, normalize_text};
