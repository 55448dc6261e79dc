use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::task::Task;

/// Named predicate selecting the visible subset of tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilterMode {
    /// Every task.
    #[default]
    All,
    /// Only completed tasks.
    Completed,
    /// Only tasks that are not completed.
    Pending,
}

impl FilterMode {
    /// Resolve a user-facing label. Unknown labels fall back to [`FilterMode::All`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("completed") {
            Self::Completed
        } else if label.eq_ignore_ascii_case("pending") {
            Self::Pending
        } else {
            Self::All
        }
    }

    /// Canonical label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Completed => "Completed",
            Self::Pending => "Pending",
        }
    }

    /// Whether a task is visible under this mode.
    #[must_use]
    pub const fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Completed => task.completed,
            Self::Pending => !task.completed,
        }
    }
}

impl FromStr for FilterMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Select the tasks visible under `mode`, keeping their relative order.
#[must_use]
pub fn apply(tasks: &[Task], mode: FilterMode) -> Vec<&Task> {
    tasks.iter().filter(|task| mode.matches(task)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::due_date::DueDate;

    fn sample() -> Vec<Task> {
        ["a", "b", "c", "d", "e"]
            .into_iter()
            .enumerate()
            .map(|(idx, text)| {
                let mut task = Task::pending(text, DueDate::Unset);
                task.completed = idx % 2 == 0;
                task
            })
            .collect()
    }

    fn texts(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|task| task.text.clone()).collect()
    }

    #[test]
    fn all_returns_everything_in_order() {
        let tasks = sample();
        assert_eq!(texts(&apply(&tasks, FilterMode::All)), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn completed_and_pending_partition_tasks() {
        let tasks = sample();
        let done = apply(&tasks, FilterMode::Completed);
        let open = apply(&tasks, FilterMode::Pending);
        assert_eq!(texts(&done), ["a", "c", "e"]);
        assert_eq!(texts(&open), ["b", "d"]);
        assert_eq!(done.len() + open.len(), tasks.len());
        assert!(done.iter().all(|task| !open.iter().any(|other| other.id == task.id)));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        for mode in [FilterMode::All, FilterMode::Completed, FilterMode::Pending] {
            assert!(apply(&[], mode).is_empty());
        }
    }

    #[test]
    fn unknown_label_behaves_as_all() {
        assert_eq!(FilterMode::from_label("Archived"), FilterMode::All);
        assert_eq!(FilterMode::from_label(""), FilterMode::All);
        assert_eq!(FilterMode::from_label(" pending "), FilterMode::Pending);
        assert_eq!(FilterMode::from_label("COMPLETED"), FilterMode::Completed);
        assert_eq!("whatever".parse::<FilterMode>(), Ok(FilterMode::All));
    }

    #[test]
    fn label_roundtrips() {
        for mode in [FilterMode::All, FilterMode::Completed, FilterMode::Pending] {
            assert_eq!(FilterMode::from_label(mode.label()), mode);
        }
    }
}
