use std::io::Write;

use anyhow::{Result, bail};
use tickoff_app::{EditDraft, TaskError, TaskPersistence, TaskRecord, TaskStore};
use tickoff_core::{FilterMode, TaskId};

use crate::view::render_task_table;
use crate::{Command, LsFormat};

pub fn run<P: TaskPersistence>(command: Command, store: &mut TaskStore<P>, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Add { text, due } => {
            let task = EditDraft::new(text, due).submit(store)?;
            writeln!(out, "Todo Added successfully ({})", task.id)?;
        }
        Command::Edit {
            task,
            text,
            due,
            no_due,
        } => {
            let id = resolve_task_id(store, &task)?;
            let current = store.get(id).ok_or(TaskError::NotFound(id))?;
            let mut draft = EditDraft::for_task(current);
            if let Some(text) = text {
                draft.text = text;
            }
            if no_due {
                draft.due = None;
            } else if due.is_some() {
                draft.due = due;
            }
            let updated = draft.submit(store)?;
            writeln!(out, "Todo Updated successfully ({})", updated.id)?;
        }
        Command::Toggle { task } => {
            let id = resolve_task_id(store, &task)?;
            let toggled = store.toggle_complete(id)?;
            writeln!(out, "{}: {}", toggled.id, toggled.status().label())?;
        }
        Command::Rm { task } => {
            let id = resolve_task_id(store, &task)?;
            store.remove(id)?;
            writeln!(out, "Todo Removed successfully")?;
        }
        Command::Clear => {
            store.clear()?;
            writeln!(out, "Todo Cleared successfully")?;
        }
        Command::Ls { filter, format } => {
            let mode = FilterMode::from_label(&filter);
            let tasks = store.view(mode);
            match format {
                LsFormat::Json => {
                    let records: Vec<TaskRecord> = tasks.into_iter().map(TaskRecord::from).collect();
                    writeln!(out, "{}", serde_json::to_string_pretty(&records)?)?;
                }
                LsFormat::Table if tasks.is_empty() => {
                    if mode == FilterMode::All {
                        writeln!(out, "No tasks found")?;
                    } else {
                        writeln!(out, "No {} tasks", mode.label().to_lowercase())?;
                    }
                }
                LsFormat::Table => render_task_table(&tasks, out)?,
            }
        }
    }
    Ok(())
}

/// Accept a full id or a prefix that matches exactly one task.
fn resolve_task_id<P>(store: &TaskStore<P>, raw: &str) -> Result<TaskId> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<TaskId>() {
        return Ok(id);
    }
    if raw.is_empty() {
        bail!("task id must not be empty");
    }

    let needle = raw.to_ascii_lowercase();
    let mut matches = store
        .list()
        .iter()
        .filter(|task| task.id.to_string().starts_with(&needle))
        .map(|task| task.id);
    match (matches.next(), matches.next()) {
        (Some(id), None) => Ok(id),
        (None, _) => bail!("no task matches '{raw}'"),
        (Some(_), Some(_)) => bail!("task id prefix '{raw}' is ambiguous"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tickoff_app::{FileSlots, MemorySlots, SlotPersistence};
    use tickoff_core::DueDate;
    use time::macros::date;

    type MemoryStore = TaskStore<SlotPersistence<MemorySlots>>;

    fn memory_store() -> MemoryStore {
        TaskStore::open(SlotPersistence::new(MemorySlots::new()))
    }

    fn run_captured(command: Command, store: &mut MemoryStore) -> Result<String> {
        let mut out = Vec::new();
        run(command, store, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn add_reports_success() -> Result<()> {
        let mut store = memory_store();
        let output = run_captured(
            Command::Add {
                text: "Buy milk".into(),
                due: None,
            },
            &mut store,
        )?;
        assert!(output.starts_with("Todo Added successfully"));
        assert_eq!(store.len(), 1);
        Ok(())
    }

    #[test]
    fn add_blank_text_fails_without_output() {
        let mut store = memory_store();
        let mut out = Vec::new();
        let err = run(
            Command::Add {
                text: "  ".into(),
                due: None,
            },
            &mut store,
            &mut out,
        )
        .err();
        assert!(matches!(
            err.as_ref().and_then(|err| err.downcast_ref::<TaskError>()),
            Some(TaskError::EmptyText)
        ));
        assert!(out.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn edit_keeps_due_date_unless_told_otherwise() -> Result<()> {
        let mut store = memory_store();
        let task = store.create("Pay rent", Some(date!(2025 - 01 - 01)))?;
        store.toggle_complete(task.id)?;

        run_captured(
            Command::Edit {
                task: task.id.to_string(),
                text: Some("Pay rent early".into()),
                due: None,
                no_due: false,
            },
            &mut store,
        )?;
        let edited = store.get(task.id).cloned().unwrap_or_else(|| unreachable!());
        assert_eq!(edited.text, "Pay rent early");
        assert_eq!(edited.due, DueDate::On(date!(2025 - 01 - 01)));
        assert!(!edited.completed);

        run_captured(
            Command::Edit {
                task: task.id.to_string(),
                text: None,
                due: None,
                no_due: true,
            },
            &mut store,
        )?;
        assert_eq!(store.get(task.id).map(|task| task.due), Some(DueDate::Unset));
        Ok(())
    }

    #[test]
    fn toggle_accepts_unique_prefix() -> Result<()> {
        let mut store = memory_store();
        let task = store.create("Prefix me", None)?;
        let prefix: String = task.id.to_string().chars().take(8).collect();

        let output = run_captured(Command::Toggle { task: prefix }, &mut store)?;

        assert!(output.ends_with("Completed\n"));
        assert_eq!(store.get(task.id).map(|task| task.completed), Some(true));
        Ok(())
    }

    #[test]
    fn unknown_id_is_reported() -> Result<()> {
        let mut store = memory_store();
        store.create("only one", None)?;
        let missing = TaskId::new().to_string();

        let err = run_captured(Command::Rm { task: missing }, &mut store).err();
        assert!(matches!(
            err.as_ref().and_then(|err| err.downcast_ref::<TaskError>()),
            Some(TaskError::NotFound(_))
        ));
        assert!(run_captured(Command::Rm { task: "zzzz".into() }, &mut store).is_err());
        assert_eq!(store.len(), 1);
        Ok(())
    }

    #[test]
    fn ambiguous_prefix_is_rejected() -> Result<()> {
        let mut store = memory_store();
        for idx in 0..40 {
            store.create(&format!("task {idx}"), None)?;
        }
        // With forty random ids at least two share their first hex digit.
        let counts = ('0'..='9').chain('a'..='f').map(|digit| {
            let prefix = digit.to_string();
            let hits = store
                .list()
                .iter()
                .filter(|task| task.id.to_string().starts_with(&prefix))
                .count();
            (prefix, hits)
        });
        let (prefix, _) = counts
            .into_iter()
            .find(|(_, hits)| *hits > 1)
            .unwrap_or_else(|| unreachable!("pigeonhole"));

        let err = resolve_task_id(&store, &prefix).err().map(|err| err.to_string());
        assert!(err.is_some_and(|msg| msg.contains("ambiguous")));
        Ok(())
    }

    #[test]
    fn ls_filters_and_formats() -> Result<()> {
        let mut store = memory_store();
        let done = store.create("Done thing", None)?;
        store.create("Open thing", Some(date!(2024 - 12 - 25)))?;
        store.toggle_complete(done.id)?;

        let table = run_captured(
            Command::Ls {
                filter: "Pending".into(),
                format: LsFormat::Table,
            },
            &mut store,
        )?;
        assert!(table.contains("Open thing"));
        assert!(table.contains("12/25/2024"));
        assert!(!table.contains("Done thing"));

        let json = run_captured(
            Command::Ls {
                filter: "Completed".into(),
                format: LsFormat::Json,
            },
            &mut store,
        )?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(value.as_array().map(Vec::len), Some(1));
        assert_eq!(value[0]["task"], "Done thing");
        assert_eq!(value[0]["status"], "completed");
        Ok(())
    }

    #[test]
    fn ls_reports_empty_lists() -> Result<()> {
        let mut store = memory_store();
        let all = run_captured(
            Command::Ls {
                filter: "whatever".into(),
                format: LsFormat::Table,
            },
            &mut store,
        )?;
        assert_eq!(all, "No tasks found\n");

        store.create("still open", None)?;
        let completed = run_captured(
            Command::Ls {
                filter: "Completed".into(),
                format: LsFormat::Table,
            },
            &mut store,
        )?;
        assert_eq!(completed, "No completed tasks\n");
        Ok(())
    }

    #[test]
    fn clear_reports_success_on_empty_store() -> Result<()> {
        let mut store = memory_store();
        let output = run_captured(Command::Clear, &mut store)?;
        assert_eq!(output, "Todo Cleared successfully\n");
        Ok(())
    }

    #[test]
    fn commands_write_through_to_task_file() -> Result<()> {
        let temp = TempDir::new()?;
        let open = || TaskStore::open(SlotPersistence::new(FileSlots::new(temp.path())));

        let mut store = open();
        let mut out = Vec::new();
        run(
            Command::Add {
                text: "Water plants".into(),
                due: Some(date!(2024 - 12 - 25)),
            },
            &mut store,
            &mut out,
        )?;
        let id = store.list()[0].id;
        run(Command::Toggle { task: id.to_string() }, &mut store, &mut out)?;

        let mut reopened = open();
        assert_eq!(reopened.list(), store.list());
        assert_eq!(reopened.get(id).map(|task| task.completed), Some(true));

        out.clear();
        run(
            Command::Ls {
                filter: "Completed".into(),
                format: LsFormat::Table,
            },
            &mut reopened,
            &mut out,
        )?;
        let table = String::from_utf8(out)?;
        assert!(table.contains("| Water plants | 12/25/2024 | Completed"));

        run(Command::Clear, &mut reopened, &mut Vec::new())?;
        assert!(open().is_empty());
        assert!(temp.path().join("tasks.json").is_file());
        Ok(())
    }
}
