use std::io::{self, Write};

use tickoff_core::Task;

const SHORT_ID_LEN: usize = 8;

/// Print tasks as a pipe-separated table: short id, text, due date, status.
pub fn render_task_table(tasks: &[&Task], out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "ID | Task | Due Date | Status")?;
    writeln!(out, "-- | ---- | -------- | ------")?;

    for task in tasks {
        let id = task.id.to_string();
        let short_id = id.get(..SHORT_ID_LEN).unwrap_or(&id);
        writeln!(
            out,
            "{short_id} | {} | {} | {}",
            task.text,
            task.due_display(),
            task.status().label()
        )?;
    }
    Ok(())
}
